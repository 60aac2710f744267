//! Guardrail hook surface shared by the host's interception points.

use crate::annotator::{self, OutboundMessage};
use crate::config::GuardrailConfig;
use crate::error::GuardrailError;
use crate::evaluator;
use crate::fingerprint::fingerprint;
use crate::outcome::is_error_outcome;
use crate::store::SessionStore;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Entry points for the three host interception hooks.
///
/// One service instance wraps one store; every hook constructed from the
/// same service observes the same sessions. With `enabled = false` each
/// entry point is a pass-through no-op (the service is still constructed,
/// nothing is skipped structurally).
pub struct GuardrailService {
    store: Arc<SessionStore>,
    config: Arc<GuardrailConfig>,
}

impl GuardrailService {
    /// Service over an injected store and a resolved configuration.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, config: Arc<GuardrailConfig>) -> Self {
        Self { store, config }
    }

    /// Shared session store, for hosts that manage session lifetime directly.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Pre-call gate. `Err` means the intercepted call must not execute.
    ///
    /// The session is created lazily on first sight of the id; creation
    /// sweeps stale sessions. A genuine limit trip is the only error path —
    /// internal anomalies degrade (sentinel fingerprint, recovered lock) and
    /// the call stays allowed.
    pub fn before_tool_call(
        &self,
        session_id: &str,
        agent_name: &str,
        tool_name: &str,
        args: &Value,
    ) -> Result<(), GuardrailError> {
        if !self.config.enabled {
            return Ok(());
        }

        let fp = fingerprint(args);
        let now = Utc::now();
        let verdict = self.store.upsert_with(session_id, agent_name, |session| {
            evaluator::admit_call(session, &self.config, tool_name, fp, now)
        });

        match verdict {
            Ok(()) => {
                debug!(session_id, tool_name, "guardrail: call allowed");
                Ok(())
            }
            Err(limit) => {
                warn!(session_id, tool_name, %limit, "guardrail: circuit OPEN, call blocked");
                Err(GuardrailError::CircuitOpen(limit))
            }
        }
    }

    /// Post-call recorder. Classifies the outcome and tracks error streaks.
    ///
    /// No-op when the session is unknown (guardrail disabled, or the session
    /// was swept between calls).
    pub fn after_tool_call(&self, session_id: &str, result: Option<&str>) {
        if !self.config.enabled {
            return;
        }

        let is_error = is_error_outcome(result);
        let errors = self.store.with_session(session_id, |session| {
            session.record_outcome(is_error);
            session.consecutive_errors
        });

        match errors {
            Some(count) if is_error => {
                debug!(
                    session_id,
                    consecutive_errors = count,
                    "guardrail: tool error recorded"
                );
            }
            Some(_) => {}
            None => debug!(session_id, "guardrail: outcome for unknown session ignored"),
        }
    }

    /// Message hook. Prepends a warning or stop banner for flagged sessions.
    pub fn annotate_messages(&self, messages: &mut [OutboundMessage]) {
        if !self.config.enabled {
            return;
        }
        annotator::annotate(&self.store, messages);
    }

    /// Explicitly end a session, clearing its state and any open circuit.
    pub fn end_session(&self, session_id: &str) -> bool {
        let removed = self.store.delete(session_id);
        if removed {
            debug!(session_id, "guardrail: session ended");
        }
        removed
    }
}
