//! A seat at the table: one model, one persona, bounded memory.

use observe_core::Speaker;
use observe_core::llm::{
    CompletionRequest, CompletionResponse, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, LlmProvider,
    Message,
};
use observe_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Exchanges remembered by default (20 messages).
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// One prompt and the reply it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the participant was asked
    pub prompt: String,
    /// What it answered
    pub reply: String,
}

/// A named model with its own persona and conversation memory.
///
/// Each participant only remembers the exchanges it took part in, so the
/// two debaters see the dialogue from opposite sides.
#[derive(Debug, Clone)]
pub struct Participant {
    name: String,
    model: String,
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
    history_limit: usize,
    history: VecDeque<Exchange>,
}

impl Participant {
    /// Creates a participant with no persona.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            history: VecDeque::new(),
        }
    }

    /// Sets the persona.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the reply length cap.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets how many exchanges are remembered. Zero disables memory.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model identifier sent to the server.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Persona text (may be empty).
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Remembered exchanges, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.history.iter()
    }

    /// Number of remembered exchanges.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forgets every exchange.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Builds the request for `prompt`: persona, memory, then the prompt.
    pub fn request_for(&self, prompt: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(self.history.len() * 2 + 1);
        for exchange in &self.history {
            messages.push(Message::user(exchange.prompt.clone()));
            messages.push(Message::assistant(exchange.reply.clone()));
        }
        messages.push(Message::user(prompt));

        let mut request = CompletionRequest::new(messages)
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        if !self.system_prompt.is_empty() {
            request = request.with_system_prompt(self.system_prompt.clone());
        }
        request
    }

    /// Asks the model to answer `prompt`.
    ///
    /// The exchange is remembered only when the request succeeds.
    pub async fn respond(
        &mut self,
        llm: &dyn LlmProvider,
        prompt: &str,
    ) -> Result<CompletionResponse> {
        let response = llm.complete(self.request_for(prompt)).await?;
        self.history.push_back(Exchange {
            prompt: prompt.to_string(),
            reply: response.content.clone(),
        });
        self.trim_history();
        Ok(response)
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

/// The three participants of a dialogue.
#[derive(Debug, Clone)]
pub struct Cast {
    /// Opens each round
    pub model_a: Participant,
    /// Answers model A
    pub model_b: Participant,
    /// Comments on the exchange
    pub commentator: Participant,
}

impl Cast {
    /// Seats three participants.
    pub fn new(model_a: Participant, model_b: Participant, commentator: Participant) -> Self {
        Self {
            model_a,
            model_b,
            commentator,
        }
    }

    /// Participant in the given seat.
    pub fn get(&self, speaker: Speaker) -> &Participant {
        match speaker {
            Speaker::ModelA => &self.model_a,
            Speaker::ModelB => &self.model_b,
            Speaker::Commentator => &self.commentator,
        }
    }

    /// Mutable participant in the given seat.
    pub fn get_mut(&mut self, speaker: Speaker) -> &mut Participant {
        match speaker {
            Speaker::ModelA => &mut self.model_a,
            Speaker::ModelB => &mut self.model_b,
            Speaker::Commentator => &mut self.commentator,
        }
    }

    /// Forgets every seat's past exchanges.
    pub fn clear_history(&mut self) {
        self.model_a.clear_history();
        self.model_b.clear_history();
        self.commentator.clear_history();
    }
}
