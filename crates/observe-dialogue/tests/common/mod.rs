//! Common test utilities and harness for dialogue integration tests.

#![allow(dead_code)]

use observe_core::llm::{MockLlmProvider, MockReply};
use observe_dialogue::{
    Cast, DialogueEvent, DialogueObserver, DialogueOrchestrator, Participant, prompts,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Test harness bundling a scripted provider with an orchestrator.
pub struct TestHarness {
    /// Mock LLM provider for testing
    pub llm: Arc<MockLlmProvider>,
    /// Observer recording every event
    pub recorder: Arc<RecordingObserver>,
}

impl TestHarness {
    /// Creates a harness whose provider replies with `responses` in order.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self::with_llm(Arc::new(MockLlmProvider::new(
            responses.into_iter().map(String::from).collect(),
        )))
    }

    /// Creates a harness playing back a script with failures.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self::with_llm(Arc::new(MockLlmProvider::scripted(replies)))
    }

    /// Creates a harness around an existing provider.
    pub fn with_llm(llm: Arc<MockLlmProvider>) -> Self {
        Self {
            llm,
            recorder: Arc::new(RecordingObserver::default()),
        }
    }

    /// Orchestrator over the stock cast, no pacing, recording events.
    pub fn orchestrator(&self) -> DialogueOrchestrator {
        DialogueOrchestrator::new(self.llm.clone(), stock_cast())
            .with_pace(Duration::ZERO)
            .with_observer(self.recorder.clone())
    }
}

/// Philosopher, Analyst and Observer on three distinct models.
pub fn stock_cast() -> Cast {
    Cast::new(
        prompts::philosopher("qwen3-30b-a3b"),
        prompts::analyst("gemma-3-27b-it-qat"),
        prompts::observer("deepseek-r1-distill-qwen-7b"),
    )
}

/// A cast without personas, handy for inspecting raw message lists.
pub fn bare_cast() -> Cast {
    Cast::new(
        Participant::new("A", "ma"),
        Participant::new("B", "mb"),
        Participant::new("C", "mc"),
    )
}

/// Script for a failure-free run: `rounds` rounds commenting every `every`.
///
/// Replies are labelled `A1`, `B1`, `C1`, ... and the closing analysis is `FINAL`.
pub fn full_script(rounds: u32, every: u32) -> Vec<String> {
    let mut script = Vec::new();
    for round in 1..=rounds {
        script.push(format!("A{round}"));
        script.push(format!("B{round}"));
        if round % every == 0 {
            script.push(format!("C{round}"));
        }
    }
    script.push("FINAL".to_string());
    script
}

/// Compact, comparable rendering of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Started(u32),
    Round(u32),
    TurnStarted(String),
    TurnCompleted(String, bool),
    Finished(String),
}

/// Observer that records every event it sees.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Seen>>,
}

impl RecordingObserver {
    /// Events seen so far.
    pub fn events(&self) -> Vec<Seen> {
        self.events.lock().unwrap().clone()
    }
}

impl DialogueObserver for RecordingObserver {
    fn on_event(&self, event: &DialogueEvent<'_>) {
        let seen = match event {
            DialogueEvent::Started { rounds, .. } => Seen::Started(*rounds),
            DialogueEvent::RoundStarted { round, .. } => Seen::Round(*round),
            DialogueEvent::TurnStarted { name, .. } => Seen::TurnStarted(name.to_string()),
            DialogueEvent::TurnCompleted(turn) => {
                Seen::TurnCompleted(turn.name.clone(), turn.outcome.is_spoken())
            }
            DialogueEvent::Finished(transcript) => Seen::Finished(transcript.state.to_string()),
            _ => return,
        };
        self.events.lock().unwrap().push(seen);
    }
}
