//! Hooks for watching a dialogue as it unfolds.

use observe_core::{DialogueId, Speaker, Transcript, Turn, TurnKind, TurnOutcome};

/// Something that happened during a run.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum DialogueEvent<'a> {
    /// The run began.
    Started {
        /// Dialogue being run
        dialogue_id: DialogueId,
        /// Opening topic
        topic: &'a str,
        /// Rounds to play
        rounds: u32,
    },
    /// A new round began.
    RoundStarted {
        /// Round number (1-indexed)
        round: u32,
        /// Rounds to play
        rounds: u32,
    },
    /// A request is about to be sent.
    TurnStarted {
        /// Round number
        round: u32,
        /// Seat about to speak
        speaker: Speaker,
        /// Participant name
        name: &'a str,
        /// Reply or commentary
        kind: TurnKind,
    },
    /// A turn finished, successfully or not.
    TurnCompleted(&'a Turn),
    /// The run reached a terminal state.
    Finished(&'a Transcript),
}

/// Receives events from the orchestrator.
///
/// Called inline on the orchestrator's task; implementations should not block.
pub trait DialogueObserver: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: &DialogueEvent<'_>);
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DialogueObserver for NoopObserver {
    fn on_event(&self, _event: &DialogueEvent<'_>) {}
}

/// Emits every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DialogueObserver for TracingObserver {
    fn on_event(&self, event: &DialogueEvent<'_>) {
        match event {
            DialogueEvent::Started {
                dialogue_id,
                topic,
                rounds,
            } => {
                tracing::info!(dialogue_id = %dialogue_id, topic = %topic, rounds, "Dialogue started");
            }
            DialogueEvent::RoundStarted { round, rounds } => {
                tracing::info!(round, rounds, "Round started");
            }
            DialogueEvent::TurnStarted {
                round,
                speaker,
                name,
                kind,
            } => {
                tracing::debug!(round, speaker = %speaker, name = %name, kind = ?kind, "Turn started");
            }
            DialogueEvent::TurnCompleted(turn) => match &turn.outcome {
                TurnOutcome::Spoken(text) => tracing::info!(
                    round = turn.round,
                    speaker = %turn.speaker,
                    name = %turn.name,
                    chars = text.len(),
                    "{}",
                    text
                ),
                TurnOutcome::Failed { error, .. } => tracing::warn!(
                    round = turn.round,
                    speaker = %turn.speaker,
                    error = %error,
                    "Turn failed"
                ),
                #[allow(unreachable_patterns)]
                _ => {}
            },
            DialogueEvent::Finished(transcript) => {
                tracing::info!(
                    dialogue_id = %transcript.dialogue_id,
                    state = %transcript.state,
                    turns = transcript.turns.len(),
                    tokens = transcript.total_tokens(),
                    "Dialogue finished"
                );
            }
        }
    }
}
