//! Scripted provider for tests and dry runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
use crate::{Error, Result};

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Reply with this text.
    Text(String),
    /// Fail as if the server answered with this status.
    HttpError(u16),
    /// Fail as if the request timed out.
    Timeout,
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        MockReply::Text(text)
    }
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    requests: Vec<CompletionRequest>,
}

/// Provider that replays scripted replies in order.
///
/// Every request is recorded so tests can inspect what was sent.
#[derive(Debug)]
pub struct MockLlmProvider {
    state: Mutex<MockState>,
    repeat: Option<String>,
}

impl MockLlmProvider {
    /// Replies with `responses` in order, then fails.
    pub fn new(responses: Vec<String>) -> Self {
        Self::scripted(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Replies with `response` to every request.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            repeat: Some(response.into()),
        }
    }

    /// Plays back a script that may include failures.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            state: Mutex::new(MockState {
                replies: replies.into(),
                requests: Vec::new(),
            }),
            repeat: None,
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let prompt_tokens = request
            .wire_messages()
            .iter()
            .map(|m| word_count(&m.content))
            .sum();
        let model = request.model.clone();

        let reply = {
            let mut state = self.lock();
            state.requests.push(request);
            match &self.repeat {
                Some(text) => Some(MockReply::Text(text.clone())),
                None => state.replies.pop_front(),
            }
        };

        match reply {
            Some(MockReply::Text(content)) => Ok(CompletionResponse {
                tokens_used: TokenUsage {
                    prompt_tokens,
                    completion_tokens: word_count(&content),
                },
                content,
                model,
            }),
            Some(MockReply::HttpError(status)) => {
                Err(Error::http(status, "scripted failure"))
            }
            Some(MockReply::Timeout) => Err(Error::Timeout { seconds: 0 }),
            None => Err(Error::Validation {
                field: None,
                message: "mock responses exhausted".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
