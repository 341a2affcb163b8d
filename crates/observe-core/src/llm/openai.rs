//! Provider for servers speaking the OpenAI chat-completions API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, Message, TokenUsage};
use crate::{Error, Result};

/// Model name sent when a request does not name one.
pub const DEFAULT_MODEL: &str = "local-model";

/// Sampling temperature used when a request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion cap used when a request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP provider for OpenAI-compatible servers (LM Studio, llama.cpp, vLLM, ...).
///
/// A single provider instance serves every participant; the model is chosen
/// per request.
#[derive(Debug, Clone)]
pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiCompatProvider {
    /// Creates a provider for the server at `base_url`.
    ///
    /// Both `http://host:1234` and `http://host:1234/v1/` are accepted.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::build(normalize_base_url(base_url.as_ref())?, None, DEFAULT_TIMEOUT)
    }

    /// Sends `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        Self::build(self.base_url, self.api_key, timeout)
    }

    /// Normalized server root, without the `/v1` suffix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::llm_with_source("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            base_url,
            api_key,
            timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Lists the model ids the server currently exposes.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = self.endpoint("models");
        tracing::debug!(url = %url, "Listing models");

        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let body = self.send(builder, &url).await?;

        let list: ModelList = serde_json::from_str(&body)
            .map_err(|e| Error::protocol_with_source("malformed model list", e))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    async fn send(&self, builder: reqwest::RequestBuilder, url: &str) -> Result<String> {
        let response = builder.send().await.map_err(|e| self.transport_error(url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Model server returned an error");
            return Err(Error::http(status.as_u16(), error_message(&body)));
        }
        Ok(body)
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            Error::llm_with_source(format!("request to {url} failed"), err)
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = self.endpoint("chat/completions");
        let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let body = ChatCompletionBody {
            model,
            messages: request.wire_messages(),
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream: false,
        };

        tracing::debug!(
            url = %url,
            model = %model,
            messages = body.messages.len(),
            "Sending chat completion"
        );

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let raw = self.send(builder, &url).await?;

        let reply: ChatCompletionReply = serde_json::from_str(&raw)
            .map_err(|e| Error::protocol_with_source("malformed chat completion reply", e))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::protocol("model server returned no content"))?;

        let tokens_used = reply
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: reply.model,
            tokens_used,
        })
    }

    fn name(&self) -> &str {
        "openai-compat"
    }
}

/// Strips trailing slashes and a trailing `/v1` segment.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/v1").unwrap_or(trimmed);
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::validation_field(
            "base_url",
            format!("expected an http(s) URL, got '{raw}'"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Pulls a readable message out of an error body.
///
/// Servers disagree on the shape: OpenAI nests it under `error.message`,
/// LM Studio sometimes sends `error` as a plain string.
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|v| {
        v["error"]["message"]
            .as_str()
            .or_else(|| v["error"].as_str())
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}
