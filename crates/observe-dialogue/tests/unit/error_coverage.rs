//! Error handling across the provider and orchestration layers.

use observe_core::Error;
use observe_core::llm::{MockLlmProvider, MockReply};
use observe_dialogue::{
    Cast, DialogueInput, DialogueOrchestrator, FailurePolicy, Participant, TranscriptFormat,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn orchestrator(llm: Arc<MockLlmProvider>, policy: FailurePolicy) -> DialogueOrchestrator {
    let cast = Cast::new(
        Participant::new("A", "ma"),
        Participant::new("B", "mb"),
        Participant::new("C", "mc"),
    );
    DialogueOrchestrator::new(llm, cast)
        .with_pace(Duration::ZERO)
        .with_failure_policy(policy)
}

#[test]
fn test_validation_error_messages() {
    let err = DialogueInput::new("").resolve().unwrap_err();
    assert_eq!(err.to_string(), "Validation error: must not be empty");
    assert!(!err.is_retryable());

    let err = DialogueInput::new("t")
        .with_commentary_frequency(0)
        .resolve()
        .unwrap_err();
    assert_eq!(err.to_string(), "Validation error: must be at least 1");
}

#[test]
fn test_failure_policy_default_is_continue() {
    assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
    assert_eq!(
        serde_json::to_string(&FailurePolicy::Abort).unwrap(),
        "\"abort\""
    );
}

#[tokio::test]
async fn test_exhausted_provider_fails_every_remaining_turn() {
    let llm = Arc::new(MockLlmProvider::new(vec![]));
    let mut orchestrator = orchestrator(llm.clone(), FailurePolicy::Continue);

    let transcript = orchestrator
        .run(DialogueInput::new("t").with_rounds(2))
        .await
        .unwrap();

    // Model A fails in both rounds, then the final commentary fails.
    assert_eq!(transcript.failed_turns().count(), 3);
    assert_eq!(llm.call_count(), 3);
    assert!(transcript.turns.iter().all(|t| !t.outcome.is_retryable()));
}

#[tokio::test]
async fn test_abort_wraps_source_error() {
    let llm = Arc::new(MockLlmProvider::scripted(vec![MockReply::HttpError(404)]));
    let mut orchestrator = orchestrator(llm, FailurePolicy::Abort);

    let err = orchestrator
        .run(DialogueInput::new("t"))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Turn failed in round 1 (model_a): HTTP 404: scripted failure"
    );
    let std_err: &dyn std::error::Error = &err;
    assert!(std_err.source().is_some());
    assert!(!err.is_retryable());
}

#[test]
fn test_error_debug_formatting() {
    let err = Error::turn_failed(3, "model_b", Error::Timeout { seconds: 10 });
    let debug_str = format!("{:?}", err);
    assert!(debug_str.contains("TurnFailed"));
    assert!(debug_str.contains("Timeout"));
}

#[test]
fn test_transcript_format_is_json_without_extension() {
    assert_eq!(
        TranscriptFormat::from_path(Path::new("/tmp/run")),
        TranscriptFormat::Json
    );
}
