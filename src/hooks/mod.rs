//! Host integration hooks.
//!
//! A host agent loop mounts the guardrail through the [`Hook`] trait and
//! [`HookRegistry`], the same shape as its other lifecycle interceptors.
//! Message annotation is not part of the registry: hosts call
//! [`crate::GuardrailService::annotate_messages`] before each outgoing
//! batch.

pub mod guardrail;
pub mod registry;
pub mod types;

pub use guardrail::GuardrailHook;
pub use registry::{Hook, HookRegistry};
pub use types::{HookEvent, HookResult};
