//! Speakers and the turns they take.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three seats in a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Opens every round by answering the current prompt.
    ModelA,
    /// Answers model A's reply.
    ModelB,
    /// Observes the exchange and comments on it.
    Commentator,
}

impl Speaker {
    /// Returns the stable role key (`model_a`, `model_b`, `commentator`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::ModelA => "model_a",
            Speaker::ModelB => "model_b",
            Speaker::Commentator => "commentator",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a turn contributes to the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// A conversational reply from model A or B.
    Reply,
    /// Commentary on the exchange of a single round.
    Commentary,
    /// The closing analysis of the whole dialogue.
    FinalCommentary,
}

/// The result of asking a model for a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TurnOutcome {
    /// The model produced text.
    Spoken(String),

    /// The request failed after any retries.
    Failed {
        /// Rendered error
        error: String,
        /// Whether the underlying error was transient
        retryable: bool,
    },
}

impl TurnOutcome {
    /// Returns `true` if the model produced text.
    pub fn is_spoken(&self) -> bool {
        matches!(self, TurnOutcome::Spoken(_))
    }

    /// Returns `true` if the turn failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, TurnOutcome::Failed { .. })
    }

    /// Returns `true` if the turn failed with a transient error.
    pub fn is_retryable(&self) -> bool {
        match self {
            TurnOutcome::Failed { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns the spoken text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnOutcome::Spoken(text) => Some(text),
            TurnOutcome::Failed { .. } => None,
        }
    }

    /// Builds a failed outcome from an error.
    pub fn from_error(error: &crate::Error) -> Self {
        TurnOutcome::Failed {
            error: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

/// Timing and accounting data for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    /// Model identifier the request was sent to
    pub model: String,

    /// When the request was issued
    pub started_at: DateTime<Utc>,

    /// When the reply (or failure) arrived
    pub completed_at: Option<DateTime<Utc>>,

    /// Tokens reported by the server, if any
    pub tokens_used: Option<u64>,
}

impl TurnMetadata {
    /// Creates metadata for a turn starting now.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            started_at: Utc::now(),
            completed_at: None,
            tokens_used: None,
        }
    }

    /// Marks this turn as completed.
    pub fn mark_completed(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Returns how long the turn took.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at
            .map(|end| end.signed_duration_since(self.started_at))
    }

    /// Returns `true` if the turn has completed.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A single contribution to a dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Round number (1-indexed). The final commentary carries the last round.
    pub round: u32,

    /// Seat that spoke
    pub speaker: Speaker,

    /// Display name of the participant in that seat
    pub name: String,

    /// Reply, commentary or final commentary
    pub kind: TurnKind,

    /// What came back
    pub outcome: TurnOutcome,

    /// Timing and token accounting
    pub metadata: TurnMetadata,
}

impl Turn {
    /// Returns the spoken text, if the turn succeeded.
    pub fn text(&self) -> Option<&str> {
        self.outcome.text()
    }
}
