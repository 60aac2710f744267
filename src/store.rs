//! Process-shared session store.

use crate::session::{Session, SessionStatus};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Default staleness threshold for abandoned sessions.
const DEFAULT_STALE_AFTER_MINUTES: i64 = 60;

/// Shared mapping from session id to guardrail state.
///
/// Constructed explicitly and injected into every hook that shares it,
/// instead of living as ambient global state. All mutation completes inside
/// a single lock hold, so an interleaved hook can never observe a
/// half-updated session.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    stale_after: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store with the default one-hour staleness threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stale_after(Duration::minutes(DEFAULT_STALE_AFTER_MINUTES))
    }

    /// Store with a custom staleness threshold.
    #[must_use]
    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            stale_after,
        }
    }

    /// Run `f` on the session, creating it first if absent.
    ///
    /// Creation sweeps stale sessions before inserting; with no end-of-
    /// conversation signal from the host, this is the store's only
    /// garbage-collection point.
    pub fn upsert_with<T>(
        &self,
        id: &str,
        agent_name: &str,
        f: impl FnOnce(&mut Session) -> T,
    ) -> T {
        let mut sessions = self.lock();
        if !sessions.contains_key(id) {
            let now = Utc::now();
            let before = sessions.len();
            sessions.retain(|_, session| now - session.last_seen <= self.stale_after);
            let swept = before - sessions.len();
            if swept > 0 {
                info!(swept, "guardrail store: evicted stale sessions");
            }
            debug!(session_id = %id, agent_name, "guardrail store: created session");
            sessions.insert(id.to_string(), Session::new(agent_name, now));
        }
        f(sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(agent_name, Utc::now())))
    }

    /// Run `f` on an existing session.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.lock();
        sessions.get_mut(id).map(f)
    }

    /// Current status of a session, if it exists.
    #[must_use]
    pub fn status_of(&self, id: &str) -> Option<SessionStatus> {
        self.lock().get(id).map(|session| session.status)
    }

    /// Status of the most recently flagged session, if any.
    ///
    /// Fallback for messages with no session id attached; when several
    /// sessions are flagged at once, the newest `flagged_at` wins.
    #[must_use]
    pub fn most_recent_flagged(&self) -> Option<SessionStatus> {
        self.lock()
            .values()
            .filter(|session| session.status.is_flagged())
            .max_by_key(|session| session.flagged_at)
            .map(|session| session.status)
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Drop every session. Test isolation only.
    pub fn reset_all(&self) {
        self.lock().clear();
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // A poisoned guard still holds a structurally intact map.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
