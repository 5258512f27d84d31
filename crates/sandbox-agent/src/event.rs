//! Events produced by an agent query.

use serde_json::Value;

/// One unit of agent output, in the order the agent produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A chunk of assistant text.
    TextDelta(String),

    /// The agent invoked one of its tools.
    ToolInvocation {
        /// Tool name (e.g. `Bash`)
        name: String,
        /// Tool input, passed through as sent
        input: Value,
    },

    /// The response finished. Always the last event of a query.
    Completion(Completion),
}

impl AgentEvent {
    /// Whether this is the final event of a query.
    pub const fn is_completion(&self) -> bool {
        matches!(self, Self::Completion(_))
    }
}

/// Final status of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Result subtype (e.g. `success`, `error_max_turns`)
    pub subtype: String,
    /// Whether the agent reported the turn as failed
    pub is_error: bool,
    /// Final result text, if the agent sent one
    pub result: Option<String>,
    /// Conversation ID assigned by the agent
    pub session_id: Option<String>,
}

impl Completion {
    /// Whether the turn finished normally.
    pub fn is_success(&self) -> bool {
        !self.is_error && self.subtype == "success"
    }
}
