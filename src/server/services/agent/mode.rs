/// Per-invocation conversation mode. Classification is stateless: each call
/// looks only at the current message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Conversational,
    TaskAssignment,
}

const TASK_TRIGGERS: [&str; 3] = [
    "updated the goals",
    "share the revised tasks",
    "share tasks",
];

pub const AGENT_NAME_UPDATE_PREFIX: &str = "Updated the name of the agent to ";

pub fn classify(message: Option<&str>) -> AgentMode {
    let Some(message) = message else {
        return AgentMode::Conversational;
    };
    let lowered = message.to_lowercase();
    if TASK_TRIGGERS.iter().any(|t| lowered.contains(t)) {
        AgentMode::TaskAssignment
    } else {
        AgentMode::Conversational
    }
}

/// Recognizes the frontend's "Updated the name of the agent to <name>"
/// notification; returns the new name when the message matches.
pub fn agent_name_update(message: &str) -> Option<&str> {
    message
        .strip_prefix(AGENT_NAME_UPDATE_PREFIX)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_update_triggers_task_mode() {
        assert_eq!(
            classify(Some("Updated the goals. Share the revised tasks.")),
            AgentMode::TaskAssignment
        );
    }

    #[test]
    fn trigger_match_is_case_insensitive() {
        assert_eq!(
            classify(Some("SHARE TASKS please")),
            AgentMode::TaskAssignment
        );
        assert_eq!(
            classify(Some("share tasks please")),
            AgentMode::TaskAssignment
        );
    }

    #[test]
    fn questions_stay_conversational() {
        assert_eq!(
            classify(Some("What skills do I need for a data science role?")),
            AgentMode::Conversational
        );
    }

    #[test]
    fn missing_message_is_conversational() {
        assert_eq!(classify(None), AgentMode::Conversational);
    }

    #[test]
    fn name_update_extraction() {
        assert_eq!(
            agent_name_update("Updated the name of the agent to Ada"),
            Some("Ada")
        );
        assert_eq!(agent_name_update("Updated the name of the agent to  "), None);
        assert_eq!(agent_name_update("hello"), None);
    }
}
