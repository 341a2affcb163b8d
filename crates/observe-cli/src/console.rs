//! Live terminal rendering of a dialogue.

use observe_core::{TurnKind, TurnOutcome};
use observe_dialogue::{DialogueEvent, DialogueObserver};
use std::io::{self, Write};
use std::sync::Mutex;

/// Prints each event as it arrives.
pub struct ConsoleObserver<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleObserver<io::Stdout> {
    /// Observer writing to stdout.
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    /// Observer writing to `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn render(out: &mut W, event: &DialogueEvent<'_>) -> io::Result<()> {
        match event {
            DialogueEvent::Started { topic, .. } => {
                writeln!(out, "Starting dialogue on topic: {topic}")?;
                writeln!(out, "{}", "=".repeat(60))?;
            }
            DialogueEvent::RoundStarted { round, .. } => {
                writeln!(out, "\nRound {round}")?;
                writeln!(out, "{}", "-".repeat(40))?;
            }
            DialogueEvent::TurnStarted { name, kind, .. } => match kind {
                TurnKind::Reply => writeln!(out, "\n{name}:")?,
                TurnKind::Commentary => writeln!(out, "\n{name} commentary:")?,
                TurnKind::FinalCommentary => {
                    writeln!(out, "\n{}", "=".repeat(60))?;
                    writeln!(out, "Final commentary from {name}:")?;
                }
            },
            DialogueEvent::TurnCompleted(turn) => match &turn.outcome {
                TurnOutcome::Spoken(text) => writeln!(out, "{text}")?,
                TurnOutcome::Failed { error, .. } => writeln!(out, "[failed: {error}]")?,
                _ => {}
            },
            DialogueEvent::Finished(transcript) => {
                writeln!(out, "{}", "=".repeat(60))?;
                writeln!(
                    out,
                    "Dialogue {}: {} turns, {} failed, {} tokens",
                    transcript.state,
                    transcript.turns.len(),
                    transcript.failed_turns().count(),
                    transcript.total_tokens()
                )?;
            }
            _ => {}
        }
        out.flush()
    }
}

impl<W: Write + Send> DialogueObserver for ConsoleObserver<W> {
    fn on_event(&self, event: &DialogueEvent<'_>) {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = Self::render(&mut *out, event) {
            tracing::warn!(error = %e, "Failed to write dialogue output");
        }
    }
}
