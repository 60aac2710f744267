//! Threshold evaluation for intercepted tool calls.

use crate::config::GuardrailConfig;
use crate::error::TrippedLimit;
use crate::session::{Session, SessionStatus};
use chrono::{DateTime, Utc};

/// Admit or reject a tool call against the session's limits.
///
/// Runs inside the store's critical section. The order is fixed: an already
/// open circuit rejects immediately with its original limit; otherwise the
/// call is counted first and every limit is evaluated against the state that
/// includes it.
pub(crate) fn admit_call(
    session: &mut Session,
    cfg: &GuardrailConfig,
    tool_name: &str,
    fingerprint: u64,
    now: DateTime<Utc>,
) -> Result<(), TrippedLimit> {
    session.last_seen = now;

    if let SessionStatus::Blocked(limit) = session.status {
        return Err(limit);
    }

    session.record_call(tool_name, fingerprint, now);

    let run = session.repetition_run();
    let elapsed_minutes = (now - session.started_at).num_seconds() as f64 / 60.0;

    if let Some(limit) = hard_trip(session, cfg, run, elapsed_minutes) {
        session.block(limit, now);
        return Err(limit);
    }

    if session.status == SessionStatus::Normal && soft_trip(session, cfg, run, elapsed_minutes) {
        session.warn(now);
    }

    Ok(())
}

/// First hard limit the session violates, in the fixed check order:
/// call count, duration, repetition run, consecutive errors.
fn hard_trip(
    session: &Session,
    cfg: &GuardrailConfig,
    run: usize,
    elapsed_minutes: f64,
) -> Option<TrippedLimit> {
    if session.tool_call_count >= cfg.max_tool_calls {
        return Some(TrippedLimit::ToolCalls {
            current: session.tool_call_count,
            max: cfg.max_tool_calls,
        });
    }
    if elapsed_minutes >= cfg.max_duration_minutes as f64 {
        return Some(TrippedLimit::Duration {
            elapsed_minutes,
            max_minutes: cfg.max_duration_minutes,
        });
    }
    if run >= cfg.max_repetitions {
        return Some(TrippedLimit::Repetitions {
            run,
            max: cfg.max_repetitions,
        });
    }
    if session.consecutive_errors >= cfg.max_consecutive_errors {
        return Some(TrippedLimit::ConsecutiveErrors {
            count: session.consecutive_errors,
            max: cfg.max_consecutive_errors,
        });
    }
    None
}

/// Whether any metric crossed `warning_threshold` of its hard limit.
///
/// Compared as a used fraction, so 4 of 5 calls crosses a 0.8 threshold
/// exactly.
fn soft_trip(session: &Session, cfg: &GuardrailConfig, run: usize, elapsed_minutes: f64) -> bool {
    let threshold = cfg.warning_threshold;
    fraction(session.tool_call_count as f64, cfg.max_tool_calls as f64) >= threshold
        || fraction(elapsed_minutes, cfg.max_duration_minutes as f64) >= threshold
        || fraction(run as f64, cfg.max_repetitions as f64) >= threshold
        || fraction(
            f64::from(session.consecutive_errors),
            f64::from(cfg.max_consecutive_errors),
        ) >= threshold
}

fn fraction(current: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        current / max
    }
}
