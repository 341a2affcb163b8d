//! Language-model provider abstraction.
//!
//! Every participant in a dialogue talks to its model through
//! [`LlmProvider`]. The HTTP implementation speaks the OpenAI
//! chat-completions format that local servers such as LM Studio expose.

mod mock;
mod openai;
mod provider;
mod retry;

pub use mock::{MockLlmProvider, MockReply};
pub use openai::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, OpenAiCompatProvider};
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, Message, Role, TokenUsage};
pub use retry::RetryWrapper;
