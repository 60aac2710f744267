//! Hook events and results.

/// Tool lifecycle events delivered by the host.
#[derive(Debug, Clone)]
pub enum HookEvent {
    /// Before a tool executes. A `Block` result must prevent execution.
    BeforeTool {
        /// Opaque host-supplied session identifier.
        session_id: String,
        /// Agent that issued the call.
        agent_name: String,
        /// Name of the tool being called.
        tool_name: String,
        /// Raw JSON argument payload.
        arguments: String,
    },

    /// After a tool has executed.
    AfterTool {
        /// Opaque host-supplied session identifier.
        session_id: String,
        /// Name of the tool that was called.
        tool_name: String,
        /// Result payload; absent when the tool produced none.
        result: Option<String>,
    },
}

/// Result of executing a hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HookResult {
    /// Continue with normal execution.
    #[default]
    Continue,

    /// Block the action (for `BeforeTool` hooks).
    Block {
        /// Reason for blocking.
        reason: String,
    },
}
