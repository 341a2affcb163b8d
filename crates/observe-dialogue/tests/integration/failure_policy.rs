//! Integration tests for failed turns under both failure policies.

use observe_core::llm::MockReply;
use observe_core::{DialogueState, Error, Speaker, TurnKind};
use observe_dialogue::{DialogueInput, FailurePolicy, TranscriptFormat, write_transcript};

use crate::common::{Seen, TestHarness};

#[tokio::test]
async fn test_continue_skips_rest_of_round_after_model_a_fails() {
    let harness = TestHarness::scripted(vec![
        MockReply::HttpError(500),
        "A2".into(),
        "B2".into(),
        "FINAL".into(),
    ]);
    let mut orchestrator = harness.orchestrator();

    let transcript = orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(2)
                .with_commentary_frequency(3),
        )
        .await
        .expect("Continue policy should complete the dialogue");

    assert_eq!(transcript.state, DialogueState::Completed);
    assert_eq!(transcript.failed_turns().count(), 1);

    let failed = transcript.failed_turns().next().unwrap();
    assert_eq!(failed.round, 1);
    assert_eq!(failed.speaker, Speaker::ModelA);
    assert!(failed.outcome.is_retryable());

    // Round 2 reuses the opening prompt because round 1 never finished.
    let requests = harness.llm.requests();
    assert_eq!(requests[1].messages.last().unwrap().content, "Opening");
    assert_eq!(harness.llm.call_count(), 4);
}

#[tokio::test]
async fn test_continue_skips_commentary_when_model_b_fails() {
    let harness = TestHarness::scripted(vec![
        "A1".into(),
        MockReply::HttpError(400),
        "FINAL".into(),
    ]);
    let mut orchestrator = harness.orchestrator();

    let transcript = orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(1)
                .with_commentary_frequency(1),
        )
        .await
        .unwrap();

    assert_eq!(transcript.commentaries().count(), 0);
    assert_eq!(transcript.replies().count(), 2);
    assert!(transcript.final_commentary().unwrap().outcome.is_spoken());
}

#[tokio::test]
async fn test_continue_records_failed_final_commentary() {
    let harness = TestHarness::scripted(vec!["A1".into(), "B1".into(), MockReply::Timeout]);
    let mut orchestrator = harness.orchestrator();

    let transcript = orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(1)
                .with_commentary_frequency(2),
        )
        .await
        .unwrap();

    let closing = transcript.final_commentary().unwrap();
    assert_eq!(closing.kind, TurnKind::FinalCommentary);
    assert!(closing.outcome.is_failed());
    assert_eq!(transcript.state, DialogueState::Completed);
}

#[tokio::test]
async fn test_abort_on_failed_commentary() {
    let harness = TestHarness::scripted(vec![
        "A1".into(),
        "B1".into(),
        MockReply::HttpError(503),
    ]);
    let mut orchestrator = harness
        .orchestrator()
        .with_failure_policy(FailurePolicy::Abort);

    let err = orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(4)
                .with_commentary_frequency(1),
        )
        .await
        .unwrap_err();

    let Error::TurnFailed {
        round,
        speaker,
        source,
    } = &err
    else {
        unreachable!("Expected TurnFailed error");
    };
    assert_eq!(*round, 1);
    assert_eq!(speaker, "commentator");
    assert!(matches!(**source, Error::Http { status: 503, .. }));
    assert!(err.is_retryable());

    assert_eq!(orchestrator.state(), DialogueState::Failed);
    assert_eq!(
        harness.recorder.events().last(),
        Some(&Seen::Finished("failed".to_string()))
    );
}

#[tokio::test]
async fn test_abort_keeps_partial_transcript_for_export() {
    let harness = TestHarness::scripted(vec!["A1".into(), "B1".into(), MockReply::HttpError(400)]);
    let mut orchestrator = harness
        .orchestrator()
        .with_failure_policy(FailurePolicy::Abort);

    let result = orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(3)
                .with_commentary_frequency(1),
        )
        .await;
    assert!(result.is_err());

    let partial = orchestrator
        .last_transcript()
        .expect("aborted run should leave its transcript behind");
    assert_eq!(partial.state, DialogueState::Failed);
    assert_eq!(partial.replies().count(), 2);
    assert_eq!(partial.failed_turns().count(), 1);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("aborted.json");
    let format = write_transcript(&path, partial).unwrap();
    assert_eq!(format, TranscriptFormat::Json);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["state"], "failed");
    assert_eq!(value["turns"].as_array().unwrap().len(), 3);
}
