#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Dialogue Observe core library
//!
//! Shared types, errors, and the language-model provider seam used by the
//! dialogue orchestrator and the CLI.

pub mod error;
pub mod llm;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use types::{
    DialogueId, DialogueState, Speaker, Transcript, Turn, TurnKind, TurnMetadata, TurnOutcome,
};
