//! Guardrail configuration loaded from env/files.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Resource limits applied to every agent session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Global toggle; disabled turns every hook into a pass-through.
    #[serde(rename = "guardrail_enabled")]
    pub enabled: bool,

    /// Hard cap on tool calls per session.
    #[serde(rename = "guardrail_max_tool_calls")]
    pub max_tool_calls: u64,
    /// Hard cap on session wall-clock duration, in minutes.
    #[serde(rename = "guardrail_max_duration_minutes")]
    pub max_duration_minutes: u64,
    /// Hard cap on the trailing run of identical calls. Values beyond the
    /// recent-call window (20) can never trip.
    #[serde(rename = "guardrail_max_repetitions")]
    pub max_repetitions: usize,
    /// Hard cap on consecutive failed tool calls.
    #[serde(rename = "guardrail_max_consecutive_errors")]
    pub max_consecutive_errors: u32,

    /// Fraction of a hard limit that triggers the sticky soft warning.
    /// Must lie in (0, 1); out-of-range values fall back to the default.
    #[serde(rename = "guardrail_warning_threshold")]
    pub warning_threshold: f64,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tool_calls: 50,
            max_duration_minutes: 30,
            max_repetitions: 3,
            max_consecutive_errors: 3,
            warning_threshold: 0.8,
        }
    }
}

impl GuardrailConfig {
    /// Load guardrail settings from config files and environment variables.
    ///
    /// Priority: env vars → config files → defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Config::builder()
            .set_default("guardrail_enabled", defaults.enabled)
            .and_then(|b| b.set_default("guardrail_max_tool_calls", defaults.max_tool_calls))
            .and_then(|b| {
                b.set_default(
                    "guardrail_max_duration_minutes",
                    defaults.max_duration_minutes,
                )
            })
            .and_then(|b| {
                b.set_default("guardrail_max_repetitions", defaults.max_repetitions as u64)
            })
            .and_then(|b| {
                b.set_default(
                    "guardrail_max_consecutive_errors",
                    u64::from(defaults.max_consecutive_errors),
                )
            })
            .and_then(|b| b.set_default("guardrail_warning_threshold", defaults.warning_threshold))
            .map(|b| {
                b.add_source(File::with_name("config/default").required(false))
                    .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
                    .add_source(File::with_name("config/local").required(false))
                    .add_source(Environment::default().ignore_empty(true))
            });

        let config = match builder {
            Ok(builder) => builder.build(),
            Err(err) => return Self::warn_and_default(err),
        };

        match config.and_then(Config::try_deserialize::<Self>) {
            Ok(settings) => settings.validated(),
            Err(err) => Self::warn_and_default(err),
        }
    }

    /// Replace an out-of-range warning threshold with the default.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.warning_threshold <= 0.0 || self.warning_threshold >= 1.0 {
            warn!(
                warning_threshold = self.warning_threshold,
                "guardrail config: warning_threshold outside (0, 1), using default"
            );
            self.warning_threshold = Self::default().warning_threshold;
        }
        self
    }

    fn warn_and_default(err: ConfigError) -> Self {
        warn!(error = %err, "Failed to load guardrail config, using defaults");
        Self::default()
    }
}
