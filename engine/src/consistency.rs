//! Metric consistency validation and optional auto-correction.
//!
//! Four independent checks over a discipline/control pair: range, deviation
//! against the configured threshold, impossible psychological states, and the
//! stability floor. No check short-circuits another; a pair can collect
//! findings from all four at once.

use serde::{Deserialize, Serialize};

use tiltguard_types::{
    ErrorKind, METRIC_MAX, METRIC_MIN, PsychologicalMetrics, Severity, ValidationConfig,
    ValidationError,
};

/// Outcome of validating one metric pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    pub discipline_level: f64,
    pub tilt_control: f64,
    pub psychological_stability_index: f64,
    pub deviation: f64,
    /// Rebalanced pair, present only when auto-correction ran. The original
    /// values above are never overwritten; adopting the correction is the
    /// caller's call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_data: Option<PsychologicalMetrics>,
}

/// Validate a metric pair against the given config.
///
/// When `config.enable_auto_correction` is set and any check produced an
/// error, a corrected pair is attached to the report.
#[must_use]
pub fn validate_metric_consistency(
    discipline_level: f64,
    tilt_control: f64,
    config: &ValidationConfig,
) -> MetricsReport {
    let metrics = PsychologicalMetrics::new(discipline_level, tilt_control);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    check_range(&metrics, &mut errors);
    check_deviation(&metrics, config, &mut errors, &mut warnings);
    check_impossible_state(&metrics, &mut errors);
    check_stability_floor(&metrics, config, &mut warnings);

    let corrected_data = if config.enable_auto_correction && !errors.is_empty() {
        Some(auto_correct(&metrics, config))
    } else {
        None
    };

    MetricsReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        discipline_level,
        tilt_control,
        psychological_stability_index: metrics.stability_index(),
        deviation: metrics.deviation(),
        corrected_data,
    }
}

/// Either metric outside [0,100] is critical.
fn check_range(metrics: &PsychologicalMetrics, errors: &mut Vec<ValidationError>) {
    for (field, value) in [
        ("disciplineLevel", metrics.discipline_level),
        ("tiltControl", metrics.tilt_control),
    ] {
        if !value.is_finite() || !(METRIC_MIN..=METRIC_MAX).contains(&value) {
            errors.push(
                ValidationError::new(
                    ErrorKind::Range,
                    Severity::Critical,
                    format!("{field} is {value}, outside [0,100]"),
                )
                .with_field(field)
                .with_value(value)
                .with_expected("0..=100"),
            );
        }
    }
}

/// Excess deviation blocks only in strict mode; otherwise it is a high
/// warning the caller may surface without failing the run.
fn check_deviation(
    metrics: &PsychologicalMetrics,
    config: &ValidationConfig,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationError>,
) {
    let deviation = metrics.deviation();
    if deviation <= config.max_deviation_between_metrics {
        return;
    }
    let finding = ValidationError::new(
        ErrorKind::Consistency,
        if config.strict_mode {
            Severity::Critical
        } else {
            Severity::High
        },
        format!(
            "deviation between metrics is {deviation:.2}, above the {} threshold",
            config.max_deviation_between_metrics
        ),
    )
    .with_value(deviation)
    .with_expected(config.max_deviation_between_metrics);
    if config.strict_mode {
        errors.push(finding);
    } else {
        warnings.push(finding);
    }
}

/// Very high discipline with very low tilt control (or the mirror image) is
/// treated as logically impossible and always blocks, strict mode or not.
fn check_impossible_state(metrics: &PsychologicalMetrics, errors: &mut Vec<ValidationError>) {
    let d = metrics.discipline_level;
    let t = metrics.tilt_control;
    let impossible = (d > 90.0 && t < 10.0) || (d < 10.0 && t > 90.0);
    if impossible {
        errors.push(
            ValidationError::new(
                ErrorKind::Consistency,
                Severity::Critical,
                format!("impossible psychological state: discipline {d}, tilt control {t}"),
            )
            .with_value(serde_json::json!({ "disciplineLevel": d, "tiltControl": t })),
        );
    }
}

/// A stability index under the configured floor is advisory only.
fn check_stability_floor(
    metrics: &PsychologicalMetrics,
    config: &ValidationConfig,
    warnings: &mut Vec<ValidationError>,
) {
    let psi = metrics.stability_index();
    if psi < config.min_psychological_stability_index {
        warnings.push(
            ValidationError::new(
                ErrorKind::Consistency,
                Severity::Medium,
                format!(
                    "psychological stability index {psi:.2} is below the {} floor",
                    config.min_psychological_stability_index
                ),
            )
            .with_field("psychologicalStabilityIndex")
            .with_value(psi)
            .with_expected(config.min_psychological_stability_index),
        );
    }
}

/// Rebalance an out-of-bounds pair: clamp both scores into [0,100], then if
/// the gap still exceeds the configured threshold, lift the lower score to
/// `higher - threshold`, floored at zero.
#[must_use]
pub fn auto_correct(
    metrics: &PsychologicalMetrics,
    config: &ValidationConfig,
) -> PsychologicalMetrics {
    let mut discipline = metrics.discipline_level.clamp(METRIC_MIN, METRIC_MAX);
    let mut control = metrics.tilt_control.clamp(METRIC_MIN, METRIC_MAX);
    if !discipline.is_finite() {
        discipline = METRIC_MIN;
    }
    if !control.is_finite() {
        control = METRIC_MIN;
    }

    let max_deviation = config.max_deviation_between_metrics;
    if (discipline - control).abs() > max_deviation {
        if discipline < control {
            discipline = (control - max_deviation).max(METRIC_MIN);
        } else {
            control = (discipline - max_deviation).max(METRIC_MIN);
        }
    }

    PsychologicalMetrics::new(discipline, control)
}
