//! Canned study assistant: a fixed table of trigger phrases and replies.

pub const WELCOME_MESSAGE: &str = "Welcome to Smart Study Planner!
You can ask me about:
  - study tips
  - schedule organization
  - break timing
  - motivation
  - focus techniques

How can I help you today?";

pub const FALLBACK_RESPONSE: &str = "To get suggestions, try asking about 'task suggestions', 'schedule organization', 'study tips', 'breaks', 'motivation', or 'focus'.";

const RESPONSES: &[(&str, &str)] = &[
    (
        "suggest task",
        "Try reviewing notes, working on high-priority tasks, or preparing summaries.",
    ),
    (
        "organize schedule",
        "Start with high-priority tasks, allocate breaks, and adjust as needed.",
    ),
    (
        "study tips",
        "Use the Pomodoro method: 25 mins study, 5 mins rest. Adjust to your needs.",
    ),
    (
        "break",
        "Take regular breaks: 15 minutes after each hour of study helps maintain focus.",
    ),
    (
        "motivation",
        "Remember your goals! Each study session brings you closer to success.",
    ),
    (
        "focus",
        "Try the 5-4-3-2-1 grounding technique or meditation before studying.",
    ),
    (
        "help",
        "You can ask about: 'suggest task', 'organize schedule', 'study tips', 'break', 'motivation', or 'focus'.",
    ),
];

/// Returns the canned reply for `input`, or `None` for blank input.
///
/// Matching is exact after trimming and lower-casing.
pub fn respond(input: &str) -> Option<&'static str> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    let reply = RESPONSES
        .iter()
        .find(|(trigger, _)| *trigger == normalized)
        .map_or(FALLBACK_RESPONSE, |(_, reply)| *reply);
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_phrases_are_case_and_space_insensitive() {
        assert_eq!(
            respond("  Study Tips "),
            Some("Use the Pomodoro method: 25 mins study, 5 mins rest. Adjust to your needs.")
        );
    }

    #[test]
    fn unknown_phrase_gets_fallback() {
        assert_eq!(respond("what is the meaning of life"), Some(FALLBACK_RESPONSE));
    }

    #[test]
    fn partial_match_is_not_a_match() {
        assert_eq!(respond("breaks please"), Some(FALLBACK_RESPONSE));
    }

    #[test]
    fn blank_input_has_no_reply() {
        assert_eq!(respond("   "), None);
    }
}
