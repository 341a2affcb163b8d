//! Core types for dialogue runs.

mod dialogue_state;
mod ids;
mod proptests;
mod transcript;
mod turn;

pub use dialogue_state::DialogueState;
pub use ids::DialogueId;
pub use transcript::Transcript;
pub use turn::{Speaker, Turn, TurnKind, TurnMetadata, TurnOutcome};
