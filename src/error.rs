//! Guardrail error types.

use thiserror::Error;

/// The specific hard limit that opened a session's circuit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrippedLimit {
    /// Total tool calls for the session reached the cap.
    ToolCalls {
        /// Calls counted so far, including the one that tripped.
        current: u64,
        /// Configured cap.
        max: u64,
    },
    /// Session wall-clock duration reached the cap.
    Duration {
        /// Minutes elapsed since the session started.
        elapsed_minutes: f64,
        /// Configured cap in minutes.
        max_minutes: u64,
    },
    /// Trailing run of identical calls reached the cap.
    Repetitions {
        /// Length of the identical-call run ending at the newest call.
        run: usize,
        /// Configured cap.
        max: usize,
    },
    /// Consecutive failed tool calls reached the cap.
    ConsecutiveErrors {
        /// Current error streak.
        count: u32,
        /// Configured cap.
        max: u32,
    },
}

impl std::fmt::Display for TrippedLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToolCalls { current, max } => {
                write!(f, "tool call limit reached ({current}/{max} calls)")
            }
            Self::Duration {
                elapsed_minutes,
                max_minutes,
            } => write!(
                f,
                "session duration limit reached ({elapsed_minutes:.1}/{max_minutes} minutes)"
            ),
            Self::Repetitions { run, max } => {
                write!(f, "identical tool call repeated {run} times (max {max})")
            }
            Self::ConsecutiveErrors { count, max } => {
                write!(f, "{count} consecutive tool errors (max {max})")
            }
        }
    }
}

/// Errors surfaced to the host by the guardrail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardrailError {
    /// The session's circuit is open: the intercepted call must not execute.
    #[error("{0}. Stop calling tools and summarize your progress for the user.")]
    CircuitOpen(TrippedLimit),
}
