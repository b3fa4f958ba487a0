//! Timing and memory budget checks.
//!
//! Purely retrospective: these checks flag a run that already blew its
//! budget, they never interrupt one in flight. There is no intrinsic timeout
//! anywhere in the engine.

use serde::{Deserialize, Serialize};

use tiltguard_types::{
    ErrorKind, PerformanceMetrics, Severity, ValidationConfig, ValidationError,
};

/// Fixed ceiling for per-run memory attribution: 50 MB.
pub const MAX_MEMORY_USAGE_BYTES: u64 = 50 * 1024 * 1024;

/// Outcome of the budget checks for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

/// Check recorded timing and memory against the configured budgets.
///
/// Absent measurements pass silently: a caller that never measured memory is
/// not in violation of the memory budget.
#[must_use]
pub fn validate_performance(
    performance: &PerformanceMetrics,
    config: &ValidationConfig,
) -> PerformanceReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(elapsed) = performance.calculation_time_ms {
        if elapsed > config.max_calculation_time_ms {
            let finding = ValidationError::new(
                ErrorKind::Performance,
                if config.strict_mode {
                    Severity::High
                } else {
                    Severity::Medium
                },
                format!(
                    "calculation took {elapsed:.1}ms, over the {:.1}ms budget",
                    config.max_calculation_time_ms
                ),
            )
            .with_field("calculationTimeMs")
            .with_value(elapsed)
            .with_expected(config.max_calculation_time_ms);
            if config.strict_mode {
                errors.push(finding);
            } else {
                warnings.push(finding);
            }
        }
    }

    if let Some(memory) = performance.memory_usage_bytes {
        if memory > MAX_MEMORY_USAGE_BYTES {
            warnings.push(
                ValidationError::new(
                    ErrorKind::Performance,
                    Severity::Medium,
                    format!("memory usage {memory} bytes exceeds {MAX_MEMORY_USAGE_BYTES}"),
                )
                .with_field("memoryUsageBytes")
                .with_value(memory)
                .with_expected(MAX_MEMORY_USAGE_BYTES),
            );
        }
    }

    PerformanceReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(elapsed_ms: Option<f64>, memory: Option<u64>) -> PerformanceMetrics {
        PerformanceMetrics {
            calculation_time_ms: elapsed_ms,
            memory_usage_bytes: memory,
            ..PerformanceMetrics::default()
        }
    }

    #[test]
    fn within_budget_is_clean() {
        let report = validate_performance(
            &perf(Some(12.0), Some(1024 * 1024)),
            &ValidationConfig::default(),
        );
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unmeasured_runs_pass_silently() {
        let report = validate_performance(&perf(None, None), &ValidationConfig::default());
        assert!(report.is_valid);
        assert!(report.errors.is_empty() && report.warnings.is_empty());
    }

    #[test]
    fn overrun_warns_by_default_and_blocks_in_strict_mode() {
        let lax = validate_performance(&perf(Some(2500.0), None), &ValidationConfig::default());
        assert!(lax.is_valid);
        assert_eq!(lax.warnings.len(), 1);
        assert_eq!(lax.warnings[0].kind, ErrorKind::Performance);

        let strict = validate_performance(
            &perf(Some(2500.0), None),
            &ValidationConfig {
                strict_mode: true,
                ..ValidationConfig::default()
            },
        );
        assert!(!strict.is_valid);
        assert_eq!(strict.errors[0].severity, Severity::High);
    }

    #[test]
    fn memory_over_50mb_is_a_medium_warning() {
        let report = validate_performance(
            &perf(None, Some(MAX_MEMORY_USAGE_BYTES + 1)),
            &ValidationConfig::default(),
        );
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, Severity::Medium);
    }
}
