//! Hook registry - manages and executes hooks.

use super::types::{HookEvent, HookResult};
use tracing::{debug, info};

/// Trait for implementing hooks.
pub trait Hook: Send + Sync {
    /// Name of the hook for logging and debugging.
    fn name(&self) -> &'static str;

    /// Handle a hook event and return the result.
    ///
    /// Hooks should return `HookResult::Continue` if they don't need to
    /// affect execution.
    fn handle(&self, event: &HookEvent) -> HookResult;
}

/// Registry that manages multiple hooks.
pub struct HookRegistry {
    hooks: Vec<Box<dyn Hook>>,
}

impl HookRegistry {
    /// Create a new empty hook registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a new hook.
    pub fn register(&mut self, hook: Box<dyn Hook>) {
        info!(hook = hook.name(), "Registered hook");
        self.hooks.push(hook);
    }

    /// Execute all hooks for an event.
    ///
    /// Hooks run in registration order; the first `Block` stops the chain
    /// and is returned.
    pub fn execute(&self, event: &HookEvent) -> HookResult {
        for hook in &self.hooks {
            match hook.handle(event) {
                HookResult::Continue => {
                    debug!(hook = hook.name(), "Hook returned Continue");
                }
                HookResult::Block { reason } => {
                    info!(hook = hook.name(), reason = %reason, "Hook blocking action");
                    return HookResult::Block { reason };
                }
            }
        }

        HookResult::Continue
    }

    /// Check if any hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
