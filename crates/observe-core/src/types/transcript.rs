//! The record a dialogue run leaves behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::types::{DialogueId, DialogueState, Turn, TurnKind, TurnOutcome};

/// Everything said during one dialogue, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Dialogue that produced this transcript
    pub dialogue_id: DialogueId,

    /// Opening topic handed to model A
    pub topic: String,

    /// Number of rounds requested
    pub rounds: u32,

    /// Commentary cadence in rounds
    pub commentary_frequency: u32,

    /// Lifecycle state at the time the transcript was taken
    pub state: DialogueState,

    /// Replies and commentaries in the order they were produced
    pub turns: Vec<Turn>,

    /// When the first request was issued
    pub started_at: DateTime<Utc>,

    /// When the run ended
    pub finished_at: Option<DateTime<Utc>>,
}

impl Transcript {
    /// Creates an empty transcript in the `Pending` state.
    pub fn new(
        dialogue_id: DialogueId,
        topic: impl Into<String>,
        rounds: u32,
        commentary_frequency: u32,
    ) -> Self {
        Self {
            dialogue_id,
            topic: topic.into(),
            rounds,
            commentary_frequency,
            state: DialogueState::Pending,
            turns: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Appends a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Moves the transcript into a terminal state and stamps the end time.
    pub fn finish(&mut self, state: DialogueState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }

    /// Conversational replies from models A and B.
    pub fn replies(&self) -> impl Iterator<Item = &Turn> {
        self.of_kind(TurnKind::Reply)
    }

    /// Per-round commentaries (excluding the final analysis).
    pub fn commentaries(&self) -> impl Iterator<Item = &Turn> {
        self.of_kind(TurnKind::Commentary)
    }

    /// The closing analysis, if it was attempted.
    pub fn final_commentary(&self) -> Option<&Turn> {
        self.of_kind(TurnKind::FinalCommentary).next()
    }

    /// Turns whose request failed.
    pub fn failed_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.outcome.is_failed())
    }

    /// Sum of tokens reported across all turns.
    pub fn total_tokens(&self) -> u64 {
        self.turns
            .iter()
            .filter_map(|t| t.metadata.tokens_used)
            .sum()
    }

    /// Renders the transcript as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the transcript as a Markdown document.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.render_markdown(&mut out);
        out
    }

    fn render_markdown(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "# Dialogue: {}\n", self.topic)?;
        writeln!(out, "- Dialogue ID: `{}`", self.dialogue_id)?;
        writeln!(
            out,
            "- Rounds: {} (commentary every {})",
            self.rounds, self.commentary_frequency
        )?;
        writeln!(out, "- State: {}", self.state)?;
        writeln!(out, "- Tokens: {}", self.total_tokens())?;

        let mut current_round = 0;
        for turn in &self.turns {
            match turn.kind {
                TurnKind::Reply => {
                    if turn.round != current_round {
                        current_round = turn.round;
                        writeln!(out, "\n## Round {current_round}")?;
                    }
                    writeln!(out, "\n**{}** ({}):\n", turn.name, turn.speaker)?;
                }
                TurnKind::Commentary => {
                    writeln!(out, "\n### Commentary from {}\n", turn.name)?;
                }
                TurnKind::FinalCommentary => {
                    writeln!(out, "\n## Final commentary from {}\n", turn.name)?;
                }
            }
            match &turn.outcome {
                TurnOutcome::Spoken(text) => writeln!(out, "{}", text.trim())?,
                TurnOutcome::Failed { error, .. } => writeln!(out, "_failed: {error}_")?,
            }
        }
        Ok(())
    }

    fn of_kind(&self, kind: TurnKind) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(move |t| t.kind == kind)
    }
}
