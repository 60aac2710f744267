//! Per-agent-session resource guardrail engine.
//!
//! Watches an autonomous agent's tool-call stream and trips a circuit
//! breaker on runaway behavior: too many calls, too much wall-clock time,
//! tight loops of identical calls, or streaks of failing calls. A session
//! escalates from a sticky soft warning to a hard stop; once the circuit is
//! open, every further call for that session is blocked and the agent's next
//! outgoing message carries a stop banner.
//!
//! The host wires three interception points to one [`GuardrailService`]:
//! the pre-call gate, the post-call outcome recorder, and the outgoing
//! message annotator. Hosts with a hook registry can mount the gate and
//! recorder through [`hooks::GuardrailHook`] instead.
//!
//! ```
//! use oxide_guardrail::{GuardrailConfig, GuardrailService, SessionStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SessionStore::new());
//! let config = Arc::new(GuardrailConfig::default());
//! let guardrail = GuardrailService::new(store, config);
//!
//! let args = serde_json::json!({ "path": "README.md" });
//! assert!(guardrail
//!     .before_tool_call("session-1", "coder", "read_file", &args)
//!     .is_ok());
//! guardrail.after_tool_call("session-1", Some("file contents"));
//! ```

pub mod annotator;
pub mod config;
pub mod error;
mod evaluator;
pub mod fingerprint;
pub mod hooks;
pub mod outcome;
pub mod service;
pub mod session;
pub mod store;

pub use annotator::{OutboundMessage, HARD_LIMIT_BANNER, WARNING_BANNER};
pub use config::GuardrailConfig;
pub use error::{GuardrailError, TrippedLimit};
pub use service::GuardrailService;
pub use session::{Session, SessionStatus};
pub use store::SessionStore;
