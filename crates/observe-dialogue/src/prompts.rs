//! Prompt templates and stock personas.

use crate::participant::Participant;

/// Persona for the default model A seat.
pub const PHILOSOPHER_PROMPT: &str = "You are a thoughtful philosopher who enjoys deep discussions. \
You ask probing questions and explore ideas from multiple angles. \
Keep responses conversational and engaging, around 100-200 words.";

/// Persona for the default model B seat.
pub const ANALYST_PROMPT: &str = "You are an analytical thinker who values evidence and logic. \
You provide structured reasoning and like to examine assumptions. \
Keep responses clear and well-reasoned, around 100-200 words.";

/// Persona for the default commentator seat.
pub const OBSERVER_PROMPT: &str = "You are an insightful observer who analyzes conversations. \
Provide thoughtful commentary on dialogue quality, key insights, and interesting dynamics. \
Be constructive and highlight both strengths and areas for improvement.";

/// Default opening topic.
pub const DEFAULT_TOPIC: &str =
    "What role should artificial intelligence play in creative endeavors?";

/// Creative, question-asking participant.
pub fn philosopher(model: impl Into<String>) -> Participant {
    Participant::new("Philosopher", model).with_system_prompt(PHILOSOPHER_PROMPT)
}

/// Evidence-driven participant.
pub fn analyst(model: impl Into<String>) -> Participant {
    Participant::new("Analyst", model).with_system_prompt(ANALYST_PROMPT)
}

/// Commentator persona.
pub fn observer(model: impl Into<String>) -> Participant {
    Participant::new("Observer", model).with_system_prompt(OBSERVER_PROMPT)
}

/// Asks the commentator to analyse a single round.
pub fn commentary_prompt(a_name: &str, a_reply: &str, b_name: &str, b_reply: &str) -> String {
    format!(
        "Recent exchange:\n\
         {a_name}: {a_reply}\n\n\
         {b_name}: {b_reply}\n\n\
         Please provide commentary on this exchange, analyzing the dialogue quality, \
         key points, areas of agreement/disagreement, and interesting developments."
    )
}

/// Asks the commentator for the closing analysis.
pub fn final_analysis_prompt(a_name: &str, b_name: &str, topic: &str) -> String {
    format!(
        "Please provide a comprehensive analysis of the entire dialogue between \
         {a_name} and {b_name} on the topic: {topic}\n\n\
         Key aspects to analyze:\n\
         - Overall dialogue quality and coherence\n\
         - Main themes and arguments presented\n\
         - Evolution of the discussion\n\
         - Notable insights or interesting points\n\
         - Areas where the models complemented or challenged each other"
    )
}
