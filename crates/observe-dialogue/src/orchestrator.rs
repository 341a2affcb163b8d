//! Round loop: two models converse, a third comments.

use observe_core::llm::LlmProvider;
use observe_core::{
    DialogueId, DialogueState, Error, Result, Speaker, Transcript, Turn, TurnKind, TurnMetadata,
    TurnOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::observer::{DialogueEvent, DialogueObserver, NoopObserver};
use crate::participant::Cast;
use crate::prompts::{commentary_prompt, final_analysis_prompt};

/// Rounds played when the input does not say.
pub const DEFAULT_ROUNDS: u32 = 5;

/// Commentary cadence when the input does not say.
pub const DEFAULT_COMMENTARY_FREQUENCY: u32 = 2;

/// Pause between rounds so a single local server is not saturated.
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// What to do when a turn fails after retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going.
    #[default]
    Continue,
    /// Stop the dialogue at the first failure.
    Abort,
}

/// Input for a dialogue run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueInput {
    /// Unique dialogue ID
    pub dialogue_id: DialogueId,

    /// Opening topic handed to model A
    pub topic: String,

    /// Rounds to play (defaults to DEFAULT_ROUNDS)
    pub rounds: Option<u32>,

    /// Comment every N rounds (defaults to DEFAULT_COMMENTARY_FREQUENCY)
    pub commentary_frequency: Option<u32>,
}

impl DialogueInput {
    /// Creates a new dialogue input.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            dialogue_id: DialogueId::new(),
            topic: topic.into(),
            rounds: None,
            commentary_frequency: None,
        }
    }

    /// Sets the number of rounds.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Sets the commentary cadence.
    pub fn with_commentary_frequency(mut self, every: u32) -> Self {
        self.commentary_frequency = Some(every);
        self
    }

    /// Validates the input and returns `(rounds, commentary_frequency)`.
    pub fn resolve(&self) -> Result<(u32, u32)> {
        if self.topic.trim().is_empty() {
            return Err(Error::validation_field("topic", "must not be empty"));
        }
        let frequency = self
            .commentary_frequency
            .unwrap_or(DEFAULT_COMMENTARY_FREQUENCY);
        if frequency == 0 {
            return Err(Error::validation_field(
                "commentary_frequency",
                "must be at least 1",
            ));
        }
        Ok((self.rounds.unwrap_or(DEFAULT_ROUNDS), frequency))
    }
}

/// Drives a dialogue between the members of a [`Cast`].
pub struct DialogueOrchestrator {
    llm: Arc<dyn LlmProvider>,
    cast: Cast,
    observer: Arc<dyn DialogueObserver>,
    pace: Duration,
    policy: FailurePolicy,
    state: DialogueState,
    last_transcript: Option<Transcript>,
}

impl DialogueOrchestrator {
    /// Creates an orchestrator for `cast`, all seats sharing `llm`.
    pub fn new(llm: Arc<dyn LlmProvider>, cast: Cast) -> Self {
        Self {
            llm,
            cast,
            observer: Arc::new(NoopObserver),
            pace: DEFAULT_PACE,
            policy: FailurePolicy::default(),
            state: DialogueState::Pending,
            last_transcript: None,
        }
    }

    /// Attaches an observer.
    pub fn with_observer(mut self, observer: Arc<dyn DialogueObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the pause between rounds.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Sets the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lifecycle state of the most recent run.
    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// Transcript of the most recent run that got past validation.
    ///
    /// After an aborted run this is the partial, `Failed` transcript that
    /// [`run`](Self::run) could not return.
    pub fn last_transcript(&self) -> Option<&Transcript> {
        self.last_transcript.as_ref()
    }

    /// The participants, including their accumulated memory.
    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    /// Plays every round, then asks for the closing analysis.
    ///
    /// Each run starts with empty participant memory.
    pub async fn run(&mut self, input: DialogueInput) -> Result<Transcript> {
        let (rounds, frequency) = input.resolve()?;
        self.cast.clear_history();
        self.last_transcript = None;

        tracing::info!(
            dialogue_id = %input.dialogue_id,
            topic = %input.topic,
            rounds,
            commentary_frequency = frequency,
            provider = self.llm.name(),
            "Starting dialogue"
        );

        let mut transcript = Transcript::new(input.dialogue_id, &input.topic, rounds, frequency);
        transcript.state = DialogueState::Running;
        self.state = DialogueState::Running;
        self.observer.on_event(&DialogueEvent::Started {
            dialogue_id: input.dialogue_id,
            topic: &input.topic,
            rounds,
        });

        let mut prompt = input.topic.clone();

        for round in 1..=rounds {
            if round > 1 && !self.pace.is_zero() {
                tokio::time::sleep(self.pace).await;
            }
            self.observer
                .on_event(&DialogueEvent::RoundStarted { round, rounds });

            let Some(reply_a) = self
                .take_turn(&mut transcript, round, Speaker::ModelA, TurnKind::Reply, &prompt)
                .await?
            else {
                continue;
            };

            let Some(reply_b) = self
                .take_turn(&mut transcript, round, Speaker::ModelB, TurnKind::Reply, &reply_a)
                .await?
            else {
                continue;
            };

            if round % frequency == 0 {
                let request = commentary_prompt(
                    self.cast.model_a.name(),
                    &reply_a,
                    self.cast.model_b.name(),
                    &reply_b,
                );
                self.take_turn(
                    &mut transcript,
                    round,
                    Speaker::Commentator,
                    TurnKind::Commentary,
                    &request,
                )
                .await?;
            }

            prompt = reply_b;
        }

        let closing = final_analysis_prompt(
            self.cast.model_a.name(),
            self.cast.model_b.name(),
            &input.topic,
        );
        self.take_turn(
            &mut transcript,
            rounds,
            Speaker::Commentator,
            TurnKind::FinalCommentary,
            &closing,
        )
        .await?;

        transcript.finish(DialogueState::Completed);
        self.state = DialogueState::Completed;
        self.observer.on_event(&DialogueEvent::Finished(&transcript));
        self.last_transcript = Some(transcript.clone());

        tracing::info!(
            dialogue_id = %transcript.dialogue_id,
            turns = transcript.turns.len(),
            failed = transcript.failed_turns().count(),
            "Dialogue completed"
        );

        Ok(transcript)
    }

    /// Runs one request and records it.
    ///
    /// Returns the spoken text, `None` for a tolerated failure, or an error
    /// when the policy is [`FailurePolicy::Abort`].
    async fn take_turn(
        &mut self,
        transcript: &mut Transcript,
        round: u32,
        speaker: Speaker,
        kind: TurnKind,
        prompt: &str,
    ) -> Result<Option<String>> {
        let participant = self.cast.get_mut(speaker);
        let name = participant.name().to_string();
        let mut metadata = TurnMetadata::new(participant.model());

        self.observer.on_event(&DialogueEvent::TurnStarted {
            round,
            speaker,
            name: &name,
            kind,
        });

        let participant = self.cast.get_mut(speaker);
        let result = participant.respond(self.llm.as_ref(), prompt).await;
        metadata.mark_completed();

        let (outcome, spoken, failure) = match result {
            Ok(response) => {
                metadata.tokens_used = Some(response.tokens_used.total());
                (
                    TurnOutcome::Spoken(response.content.clone()),
                    Some(response.content),
                    None,
                )
            }
            Err(err) => {
                tracing::warn!(round, speaker = %speaker, error = %err, "Turn failed");
                (TurnOutcome::from_error(&err), None, Some(err))
            }
        };

        transcript.push(Turn {
            round,
            speaker,
            name,
            kind,
            outcome,
            metadata,
        });
        if let Some(turn) = transcript.turns.last() {
            self.observer.on_event(&DialogueEvent::TurnCompleted(turn));
        }

        match failure {
            Some(err) if self.policy == FailurePolicy::Abort => {
                transcript.finish(DialogueState::Failed);
                self.state = DialogueState::Failed;
                self.observer.on_event(&DialogueEvent::Finished(transcript));
                self.last_transcript = Some(transcript.clone());
                Err(Error::turn_failed(round, speaker.as_str(), err))
            }
            _ => Ok(spoken),
        }
    }
}
