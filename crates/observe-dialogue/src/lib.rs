#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Dialogue Observe orchestration library
//!
//! Participants, the round loop, prompts, observers and transcript export.

pub mod export;
pub mod observer;
pub mod orchestrator;
pub mod participant;
pub mod prompts;

pub use export::{TranscriptFormat, write_transcript};
pub use observer::{DialogueEvent, DialogueObserver, NoopObserver, TracingObserver};
pub use orchestrator::{
    DEFAULT_COMMENTARY_FREQUENCY, DEFAULT_PACE, DEFAULT_ROUNDS, DialogueInput,
    DialogueOrchestrator, FailurePolicy,
};
pub use participant::{Cast, DEFAULT_HISTORY_LIMIT, Exchange, Participant};

// Re-export core types
pub use observe_core::{Error, Result};
