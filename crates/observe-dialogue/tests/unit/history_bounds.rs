//! Property tests for participant memory.

use observe_core::llm::MockLlmProvider;
use observe_dialogue::Participant;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_history_never_exceeds_limit(limit in 0usize..8, turns in 0usize..20) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let llm = MockLlmProvider::with_response("reply");
        let mut participant = Participant::new("A", "m").with_history_limit(limit);

        for i in 0..turns {
            runtime.block_on(participant.respond(&llm, &format!("q{i}"))).unwrap();
            prop_assert!(participant.history_len() <= limit);
        }

        prop_assert_eq!(participant.history_len(), turns.min(limit));

        // The newest exchanges survive.
        if turns > 0 && limit > 0 {
            let last = participant.history().last().unwrap();
            prop_assert_eq!(&last.prompt, &format!("q{}", turns - 1));
        }
    }
}
