//! Integration tests for complete dialogue runs.

use observe_core::llm::{MockLlmProvider, Role};
use observe_core::{DialogueState, Speaker, Turn, TurnKind};
use observe_dialogue::{DialogueInput, DialogueOrchestrator, prompts};
use std::sync::Arc;
use std::time::Duration;

use crate::common::{TestHarness, bare_cast, full_script};

#[tokio::test]
async fn test_six_rounds_comment_every_second_round() {
    let script = full_script(6, 2);
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::new(script.clone())));
    let mut orchestrator = harness.orchestrator();

    let input = DialogueInput::new(prompts::DEFAULT_TOPIC)
        .with_rounds(6)
        .with_commentary_frequency(2);

    let transcript = orchestrator
        .run(input.clone())
        .await
        .expect("Dialogue should complete");

    assert_eq!(transcript.dialogue_id, input.dialogue_id);
    assert_eq!(transcript.state, DialogueState::Completed);
    assert_eq!(transcript.replies().count(), 12);

    let commentary_rounds: Vec<u32> = transcript.commentaries().map(|t| t.round).collect();
    assert_eq!(commentary_rounds, vec![2, 4, 6]);

    let closing = transcript.final_commentary().expect("final commentary");
    assert_eq!(closing.text(), Some("FINAL"));
    assert_eq!(closing.speaker, Speaker::Commentator);
    assert_eq!(closing.round, 6);

    assert_eq!(harness.llm.call_count(), script.len());
}

#[tokio::test]
async fn test_model_b_reply_becomes_next_prompt() {
    let harness = TestHarness::with_responses(vec!["A1", "B1", "A2", "B2", "FINAL"]);
    let mut orchestrator = harness.orchestrator();

    orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(2)
                .with_commentary_frequency(5),
        )
        .await
        .expect("Dialogue should complete");

    let prompts_sent: Vec<String> = harness
        .llm
        .requests()
        .iter()
        .map(|r| r.messages.last().unwrap().content.clone())
        .collect();

    assert_eq!(prompts_sent[0], "Opening");
    assert_eq!(prompts_sent[1], "A1");
    assert_eq!(prompts_sent[2], "B1");
    assert_eq!(prompts_sent[3], "A2");
    assert!(prompts_sent[4].contains("on the topic: Opening"));
}

#[tokio::test]
async fn test_each_model_sees_its_own_history() {
    let harness = TestHarness::with_responses(vec!["A1", "B1", "A2", "B2", "FINAL"]);
    let mut orchestrator = DialogueOrchestrator::new(harness.llm.clone(), bare_cast())
        .with_pace(Duration::ZERO);

    orchestrator
        .run(
            DialogueInput::new("Opening")
                .with_rounds(2)
                .with_commentary_frequency(3),
        )
        .await
        .unwrap();

    let requests = harness.llm.requests();

    // Model A in round 2: its own first exchange, then B's reply as the prompt.
    let a2 = &requests[2];
    assert_eq!(a2.model.as_deref(), Some("ma"));
    let a2_messages: Vec<(Role, &str)> = a2
        .messages
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        a2_messages,
        vec![
            (Role::User, "Opening"),
            (Role::Assistant, "A1"),
            (Role::User, "B1"),
        ]
    );

    // Model B in round 2 remembers only its own exchange.
    let b2 = &requests[3];
    assert_eq!(b2.model.as_deref(), Some("mb"));
    assert_eq!(b2.messages.len(), 3);
    assert_eq!(b2.messages[0].content, "A1");
    assert_eq!(b2.messages[1].content, "B1");

    assert_eq!(orchestrator.cast().model_a.history_len(), 2);
    assert_eq!(orchestrator.cast().commentator.history_len(), 1);
}

#[tokio::test]
async fn test_personas_are_sent_as_system_prompts() {
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::new(full_script(1, 1))));
    let mut orchestrator = harness.orchestrator();

    orchestrator
        .run(
            DialogueInput::new("Topic")
                .with_rounds(1)
                .with_commentary_frequency(1),
        )
        .await
        .unwrap();

    let requests = harness.llm.requests();
    assert_eq!(
        requests[0].system_prompt.as_deref(),
        Some(prompts::PHILOSOPHER_PROMPT)
    );
    assert_eq!(
        requests[1].system_prompt.as_deref(),
        Some(prompts::ANALYST_PROMPT)
    );
    assert_eq!(
        requests[2].system_prompt.as_deref(),
        Some(prompts::OBSERVER_PROMPT)
    );
    assert!(
        requests[2].messages.last().unwrap().content.contains("Philosopher: A1"),
        "Commentary prompt should quote model A by name"
    );
}

#[tokio::test]
async fn test_zero_rounds_only_final_commentary() {
    let harness = TestHarness::with_responses(vec!["Nothing was said."]);
    let mut orchestrator = harness.orchestrator();

    let transcript = orchestrator
        .run(DialogueInput::new("Silence").with_rounds(0))
        .await
        .unwrap();

    assert_eq!(transcript.turns.len(), 1);
    assert_eq!(transcript.turns[0].kind, TurnKind::FinalCommentary);
    assert_eq!(transcript.turns[0].round, 0);
    assert_eq!(
        transcript.final_commentary().and_then(Turn::text),
        Some("Nothing was said.")
    );
}

#[tokio::test]
async fn test_token_accounting_is_recorded() {
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::new(full_script(1, 1))));
    let mut orchestrator = harness.orchestrator();

    let transcript = orchestrator
        .run(
            DialogueInput::new("Topic")
                .with_rounds(1)
                .with_commentary_frequency(1),
        )
        .await
        .unwrap();

    assert!(
        transcript
            .turns
            .iter()
            .all(|t| t.metadata.tokens_used.is_some() && t.metadata.is_completed())
    );
    assert!(transcript.total_tokens() > 0);
}

#[tokio::test(start_paused = true)]
async fn test_rounds_are_paced() {
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::with_response("ok")));
    let mut orchestrator = harness.orchestrator().with_pace(Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    orchestrator
        .run(DialogueInput::new("Topic").with_rounds(3))
        .await
        .unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "two pauses between three rounds");
    assert!(elapsed < Duration::from_secs(3), "no pause after the last round");
}

#[tokio::test]
async fn test_orchestrator_can_run_again() {
    let harness = TestHarness::with_llm(Arc::new(MockLlmProvider::with_response("ok")));
    let mut orchestrator = harness.orchestrator();

    let first = orchestrator
        .run(DialogueInput::new("One").with_rounds(1))
        .await
        .unwrap();
    let calls_after_first = harness.llm.call_count();
    let second = orchestrator
        .run(DialogueInput::new("Two").with_rounds(1))
        .await
        .unwrap();

    assert_ne!(first.dialogue_id, second.dialogue_id);
    assert_eq!(second.topic, "Two");
    assert_eq!(orchestrator.state(), DialogueState::Completed);

    // The second dialogue starts without memory of the first.
    let requests = harness.llm.requests();
    let opening = &requests[calls_after_first];
    assert_eq!(opening.messages.len(), 1);
    assert_eq!(opening.messages[0].content, "Two");
    assert!(
        requests[calls_after_first..]
            .iter()
            .flat_map(|r| r.messages.iter())
            .all(|m| m.content != "One")
    );
    assert_eq!(orchestrator.cast().model_a.history_len(), 1);
}
