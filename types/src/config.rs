//! Request-scoped validation configuration.
//!
//! A config is an immutable value handed explicitly into every call. There is
//! no module-level mutable default: `ValidationConfig::default()` is the
//! process-wide baseline and callers that want something else build their own
//! value and pass it along.

use serde::{Deserialize, Serialize};

/// Tuning knobs for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationConfig {
    /// Largest acceptable gap between discipline level and tilt control.
    pub max_deviation_between_metrics: f64,
    /// Stability floor below which a warning is raised.
    pub min_psychological_stability_index: f64,
    /// Calculation/response time budget in milliseconds.
    pub max_calculation_time_ms: f64,
    /// Rebalance out-of-bounds metrics when the consistency check fails.
    pub enable_auto_correction: bool,
    /// Escalate the deviation and timing checks from warnings to errors.
    pub strict_mode: bool,
    /// Emit a structured log entry per completed validation run.
    pub log_validation_failures: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_deviation_between_metrics: DEFAULT_MAX_METRIC_DEVIATION,
            min_psychological_stability_index: DEFAULT_MIN_STABILITY_INDEX,
            max_calculation_time_ms: DEFAULT_MAX_CALCULATION_TIME_MS,
            enable_auto_correction: false,
            strict_mode: false,
            log_validation_failures: true,
        }
    }
}

/// Default deviation threshold the consistency validator enforces.
///
/// Deliberately distinct from the calculator's internal 30-point clamp
/// (`CALCULATOR_DEVIATION_CLAMP` in the engine): the two thresholds disagree
/// in the upstream system and which one is authoritative is an open product
/// question, so both are kept as separately named constants.
pub const DEFAULT_MAX_METRIC_DEVIATION: f64 = 15.0;

/// Default floor for the psychological stability index.
pub const DEFAULT_MIN_STABILITY_INDEX: f64 = 20.0;

/// Default timing budget, in milliseconds.
pub const DEFAULT_MAX_CALCULATION_TIME_MS: f64 = 1000.0;

impl ValidationConfig {
    /// Baseline config with strict mode and auto-correction enabled, the
    /// combination the upstream dashboard uses for pre-publish checks.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            enable_auto_correction: true,
            ..Self::default()
        }
    }
}
