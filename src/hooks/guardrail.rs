//! Guardrail adapter for the hook registry.

use super::registry::Hook;
use super::types::{HookEvent, HookResult};
use crate::service::GuardrailService;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Hook that routes tool lifecycle events into the guardrail service.
pub struct GuardrailHook {
    service: Arc<GuardrailService>,
}

impl GuardrailHook {
    /// Adapter over a shared guardrail service.
    #[must_use]
    pub fn new(service: Arc<GuardrailService>) -> Self {
        Self { service }
    }
}

impl Hook for GuardrailHook {
    fn name(&self) -> &'static str {
        "guardrail"
    }

    fn handle(&self, event: &HookEvent) -> HookResult {
        match event {
            HookEvent::BeforeTool {
                session_id,
                agent_name,
                tool_name,
                arguments,
            } => {
                // Unparseable payloads degrade to the sentinel fingerprint.
                let args = serde_json::from_str::<Value>(arguments).unwrap_or_else(|err| {
                    debug!(session_id = %session_id, error = %err, "guardrail hook: arguments are not JSON");
                    Value::Null
                });
                match self
                    .service
                    .before_tool_call(session_id, agent_name, tool_name, &args)
                {
                    Ok(()) => HookResult::Continue,
                    Err(block) => HookResult::Block {
                        reason: block.to_string(),
                    },
                }
            }
            HookEvent::AfterTool {
                session_id, result, ..
            } => {
                self.service.after_tool_call(session_id, result.as_deref());
                HookResult::Continue
            }
        }
    }
}
