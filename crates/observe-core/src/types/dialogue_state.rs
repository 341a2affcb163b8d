//! Dialogue lifecycle state.

use serde::{Deserialize, Serialize};

/// The current state of a dialogue run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DialogueState {
    /// Created but not yet started.
    Pending,

    /// Rounds are being played.
    Running,

    /// All rounds and the final commentary have been attempted.
    Completed,

    /// Aborted on a failed turn.
    Failed,
}

impl DialogueState {
    /// Returns `true` if the dialogue is in a terminal state (Completed or Failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, DialogueState::Completed | DialogueState::Failed)
    }

    /// Returns `true` if the dialogue is running.
    pub fn is_active(&self) -> bool {
        matches!(self, DialogueState::Running)
    }
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialogueState::Pending => write!(f, "pending"),
            DialogueState::Running => write!(f, "running"),
            DialogueState::Completed => write!(f, "completed"),
            DialogueState::Failed => write!(f, "failed"),
        }
    }
}
