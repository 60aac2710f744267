//! Per-session guardrail state and the status state machine.

use crate::error::TrippedLimit;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Capacity of the per-session recent-call window.
///
/// Bounds both memory per session and the repetition scan.
pub const RECENT_CALLS_WINDOW: usize = 20;

/// One intercepted tool call in the recent-call window.
#[derive(Debug, Clone)]
pub struct RecentCall {
    /// Name of the intercepted tool.
    pub tool_name: String,
    /// Structural hash of the call arguments.
    pub fingerprint: u64,
    /// When the call was intercepted.
    pub at: DateTime<Utc>,
}

/// Guardrail status of a session.
///
/// One-way machine: `Normal -> Warned -> Blocked`, or `Normal -> Blocked`
/// when a hard limit trips without a prior warning. There is no transition
/// out of `Blocked`; the only recovery is session deletion or staleness
/// eviction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionStatus {
    /// No threshold crossed.
    Normal,
    /// Soft threshold crossed; sticky for the session lifetime.
    Warned,
    /// Circuit open; carries the limit that tripped it.
    Blocked(TrippedLimit),
}

impl SessionStatus {
    /// Whether the session needs an operator-visible banner.
    #[must_use]
    pub const fn is_flagged(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Mutable guardrail state for one agent session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Agent that owns the session. Informational only.
    pub agent_name: String,
    /// Session creation time; duration limits measure against this.
    pub started_at: DateTime<Utc>,
    /// Last gate activity; staleness eviction keys off this.
    pub last_seen: DateTime<Utc>,
    /// Calls admitted through the gate, including a call that trips.
    pub tool_call_count: u64,
    /// Current streak of failed tool calls.
    pub consecutive_errors: u32,
    /// Bounded window of the most recent calls, oldest first.
    pub recent_calls: VecDeque<RecentCall>,
    /// Current position in the status state machine.
    pub status: SessionStatus,
    /// When the session first left `Normal`; newest wins fallback lookups.
    pub flagged_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Fresh session for an agent.
    #[must_use]
    pub fn new(agent_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            started_at: now,
            last_seen: now,
            tool_call_count: 0,
            consecutive_errors: 0,
            recent_calls: VecDeque::with_capacity(RECENT_CALLS_WINDOW),
            status: SessionStatus::Normal,
            flagged_at: None,
        }
    }

    /// Count the call and append it to the recent-call window.
    pub fn record_call(&mut self, tool_name: &str, fingerprint: u64, now: DateTime<Utc>) {
        self.tool_call_count = self.tool_call_count.saturating_add(1);
        if self.recent_calls.len() == RECENT_CALLS_WINDOW {
            self.recent_calls.pop_front();
        }
        self.recent_calls.push_back(RecentCall {
            tool_name: tool_name.to_string(),
            fingerprint,
            at: now,
        });
    }

    /// Length of the trailing run of calls identical to the newest one.
    ///
    /// Scans backward from the end and stops at the first mismatch, so the
    /// cost is bounded by the window size.
    #[must_use]
    pub fn repetition_run(&self) -> usize {
        let Some(newest) = self.recent_calls.back() else {
            return 0;
        };
        self.recent_calls
            .iter()
            .rev()
            .take_while(|call| {
                call.fingerprint == newest.fingerprint && call.tool_name == newest.tool_name
            })
            .count()
    }

    /// Update the consecutive-error streak from a call outcome.
    pub fn record_outcome(&mut self, is_error: bool) {
        if is_error {
            self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        } else {
            self.consecutive_errors = 0;
        }
    }

    /// `Normal -> Warned`. Warned and Blocked sessions are left untouched.
    pub fn warn(&mut self, now: DateTime<Utc>) {
        if self.status == SessionStatus::Normal {
            self.status = SessionStatus::Warned;
            self.flagged_at = Some(now);
        }
    }

    /// `Normal`/`Warned -> Blocked`. A blocked session keeps its original limit.
    pub fn block(&mut self, limit: TrippedLimit, now: DateTime<Utc>) {
        if !matches!(self.status, SessionStatus::Blocked(_)) {
            self.status = SessionStatus::Blocked(limit);
            self.flagged_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionStatus, RECENT_CALLS_WINDOW};
    use crate::error::TrippedLimit;
    use chrono::Utc;

    #[test]
    fn recent_calls_stay_within_the_window() {
        let now = Utc::now();
        let mut session = Session::new("tester", now);
        for i in 0..(RECENT_CALLS_WINDOW + 10) {
            session.record_call("tool", i as u64, now);
        }
        assert_eq!(session.recent_calls.len(), RECENT_CALLS_WINDOW);
        assert_eq!(session.tool_call_count, (RECENT_CALLS_WINDOW + 10) as u64);
        // Oldest entries were evicted first.
        let front = session.recent_calls.front().expect("window is non-empty");
        assert_eq!(front.fingerprint, 10);
    }

    #[test]
    fn repetition_run_counts_the_trailing_run_only() {
        let now = Utc::now();
        let mut session = Session::new("tester", now);
        session.record_call("a", 1, now);
        session.record_call("a", 1, now);
        session.record_call("b", 2, now);
        assert_eq!(session.repetition_run(), 1);

        session.record_call("b", 2, now);
        session.record_call("b", 2, now);
        assert_eq!(session.repetition_run(), 3);
    }

    #[test]
    fn same_fingerprint_different_tool_breaks_the_run() {
        let now = Utc::now();
        let mut session = Session::new("tester", now);
        session.record_call("a", 7, now);
        session.record_call("b", 7, now);
        assert_eq!(session.repetition_run(), 1);
    }

    #[test]
    fn warn_is_sticky_and_block_is_terminal() {
        let now = Utc::now();
        let mut session = Session::new("tester", now);
        session.warn(now);
        assert_eq!(session.status, SessionStatus::Warned);

        let first = TrippedLimit::ToolCalls { current: 5, max: 5 };
        session.block(first, now);
        session.block(TrippedLimit::Repetitions { run: 3, max: 3 }, now);
        assert_eq!(session.status, SessionStatus::Blocked(first));

        // Warn after block must not regress the status.
        session.warn(now);
        assert_eq!(session.status, SessionStatus::Blocked(first));
    }

    #[test]
    fn outcome_resets_or_extends_the_error_streak() {
        let now = Utc::now();
        let mut session = Session::new("tester", now);
        session.record_outcome(true);
        session.record_outcome(true);
        assert_eq!(session.consecutive_errors, 2);
        session.record_outcome(false);
        assert_eq!(session.consecutive_errors, 0);
    }
}
