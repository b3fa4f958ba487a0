//! Report aggregation.
//!
//! Merges the normalizer, consistency, payload, and performance results into
//! one comprehensive result plus a summarized report with recommendations.
//! The only side effect in the whole engine lives here: a structured log
//! entry per run, gated by `config.log_validation_failures`. Logging is
//! observational and never alters control flow.

use serde::{Deserialize, Serialize};

use tiltguard_types::{
    EmotionalDataSet, ErrorKind, PsychologicalMetrics, Severity, ValidationContext,
    ValidationError,
};

use crate::calculator::calculate_metrics;
use crate::consistency::{MetricsReport, validate_metric_consistency};
use crate::normalizer::{EmotionalDataReport, validate_emotional_data};
use crate::payload::{PayloadReport, TradeStatsPayload, validate_payload};
use crate::performance::{PerformanceReport, validate_performance};

/// Union of every sub-validator's findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    pub is_valid: bool,
    /// Error messages as plain strings, for display and log sinks.
    pub errors: Vec<String>,
    /// Warning messages as plain strings.
    pub warnings: Vec<String>,
    /// The full structured finding list, for programmatic handling.
    pub findings: Vec<ValidationError>,
}

/// Every sub-result plus the overall union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveValidationResult {
    pub emotional_data: EmotionalDataReport,
    pub metrics: MetricsReport,
    pub payload: PayloadReport,
    pub performance: PerformanceReport,
    pub overall: OverallResult,
}

impl ComprehensiveValidationResult {
    /// Merge four sub-results. Overall validity means no errors anywhere;
    /// warnings never count against it.
    #[must_use]
    pub fn aggregate(
        emotional_data: EmotionalDataReport,
        metrics: MetricsReport,
        payload: PayloadReport,
        performance: PerformanceReport,
    ) -> Self {
        let mut findings = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for (label, errs, warns) in [
            ("emotional data", &emotional_data.errors, &emotional_data.warnings),
            ("metrics", &metrics.errors, &metrics.warnings),
            ("payload", &payload.errors, &payload.warnings),
            ("performance", &performance.errors, &performance.warnings),
        ] {
            for finding in errs {
                errors.push(format!("{label}: {}", finding.message));
                findings.push(finding.clone());
            }
            for finding in warns {
                warnings.push(format!("{label}: {}", finding.message));
                findings.push(finding.clone());
            }
        }

        let is_valid = emotional_data.is_valid
            && metrics.is_valid
            && payload.is_valid
            && performance.is_valid;

        Self {
            emotional_data,
            metrics,
            payload,
            performance,
            overall: OverallResult {
                is_valid,
                errors,
                warnings,
                findings,
            },
        }
    }
}

/// Headline counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub critical_count: usize,
    pub performance_issue_count: usize,
    pub is_valid: bool,
}

/// Summary plus targeted recommendations, one report per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub request_id: uuid::Uuid,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub summary: ValidationSummary,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Build the summarized report for a comprehensive result.
    #[must_use]
    pub fn from_result(result: &ComprehensiveValidationResult, ctx: &ValidationContext) -> Self {
        let critical_count = result
            .overall
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        let performance_issue_count = result
            .overall
            .findings
            .iter()
            .filter(|f| f.kind == ErrorKind::Performance)
            .count();

        Self {
            request_id: ctx.request_id,
            generated_at: chrono::Utc::now(),
            summary: ValidationSummary {
                total_errors: result.overall.errors.len(),
                total_warnings: result.overall.warnings.len(),
                critical_count,
                performance_issue_count,
                is_valid: result.overall.is_valid,
            },
            recommendations: recommendations_for(result),
        }
    }
}

/// Pick recommendations by which sub-validator failed.
fn recommendations_for(result: &ComprehensiveValidationResult) -> Vec<String> {
    let mut out = Vec::new();
    if !result.emotional_data.is_valid {
        out.push(
            "Review emotional tag capture: entries were missing, malformed, or out of range."
                .to_string(),
        );
    }
    if !result.metrics.is_valid {
        out.push("Review calculation logic and input data for the composite metrics.".to_string());
    }
    if !result.payload.is_valid {
        out.push("Verify the upstream response payload against the data contract.".to_string());
    }
    if !result.performance.is_valid
        || result
            .overall
            .findings
            .iter()
            .any(|f| f.kind == ErrorKind::Performance)
    {
        out.push("Optimize calculation algorithms or consider caching results.".to_string());
    }
    if out.is_empty() {
        out.push("All validations passed; no action required.".to_string());
    }
    out
}

/// Everything a caller gets back from one full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub metrics: PsychologicalMetrics,
    pub result: ComprehensiveValidationResult,
    pub report: ValidationReport,
}

/// Run the full pipeline: normalize the tags, derive the metrics, check
/// consistency (auto-correcting if configured), validate the payload and the
/// recorded budgets, and merge everything into one outcome.
///
/// Finalizes the context (stamping completion time) before the performance
/// check so the run's own duration is subject to the budget.
#[must_use]
pub fn run_validation(
    input: &EmotionalDataSet,
    payload: Option<&TradeStatsPayload>,
    ctx: &mut ValidationContext,
) -> ValidationOutcome {
    let config = ctx.config;

    let emotional_data = validate_emotional_data(input);
    let metrics = calculate_metrics(input);
    let consistency =
        validate_metric_consistency(metrics.discipline_level, metrics.tilt_control, &config);
    let payload_report = validate_payload(payload, &config);

    ctx.finalize();
    let performance = validate_performance(&ctx.performance, &config);

    let result = ComprehensiveValidationResult::aggregate(
        emotional_data,
        consistency,
        payload_report,
        performance,
    );
    let report = ValidationReport::from_result(&result, ctx);
    log_outcome(&result, &report, ctx);

    ValidationOutcome {
        metrics,
        result,
        report,
    }
}

/// Structured log entry per run: error level on failure, warn level when only
/// warnings exist, info level (with timing) on a clean pass.
fn log_outcome(
    result: &ComprehensiveValidationResult,
    report: &ValidationReport,
    ctx: &ValidationContext,
) {
    if !ctx.config.log_validation_failures {
        return;
    }
    let summary = &report.summary;
    if !result.overall.is_valid {
        tracing::error!(
            request_id = %ctx.request_id,
            errors = summary.total_errors,
            warnings = summary.total_warnings,
            critical = summary.critical_count,
            "validation failed"
        );
    } else if summary.total_warnings > 0 {
        tracing::warn!(
            request_id = %ctx.request_id,
            warnings = summary.total_warnings,
            "validation passed with warnings"
        );
    } else {
        tracing::info!(
            request_id = %ctx.request_id,
            calculation_time_ms = ctx.performance.calculation_time_ms,
            "validation passed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltguard_types::{RawEmotionTag, ValidationConfig};

    fn clean_input() -> EmotionalDataSet {
        EmotionalDataSet::Tags(vec![
            RawEmotionTag::new("DISCIPLINE", 70.0),
            RawEmotionTag::new("TILT", 20.0),
        ])
    }

    fn clean_payload() -> TradeStatsPayload {
        TradeStatsPayload {
            total_trades: Some(12.0),
            total_pnl: Some(340.0),
            win_rate: Some(58.0),
            emotional_data: Some(vec![RawEmotionTag::new("DISCIPLINE", 70.0)]),
            response_time_ms: Some(45.0),
        }
    }

    #[test]
    fn clean_run_is_valid_everywhere() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let outcome = run_validation(&clean_input(), Some(&clean_payload()), &mut ctx);
        assert!(outcome.result.overall.is_valid);
        assert!(outcome.metrics.in_range());
        assert_eq!(outcome.report.summary.total_errors, 0);
        assert_eq!(
            outcome.report.recommendations,
            vec!["All validations passed; no action required.".to_string()]
        );
        assert!(ctx.performance.end_time.is_some());
    }

    #[test]
    fn one_failing_sub_validator_fails_the_overall_union() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let outcome = run_validation(&EmotionalDataSet::Missing, Some(&clean_payload()), &mut ctx);
        assert!(!outcome.result.overall.is_valid);
        assert!(!outcome.result.emotional_data.is_valid);
        assert!(outcome.result.payload.is_valid);
        // The neutral fallback metrics are themselves consistent.
        assert!(outcome.result.metrics.is_valid);
        assert_eq!(outcome.metrics, PsychologicalMetrics::NEUTRAL);
    }

    #[test]
    fn overall_lists_prefix_findings_with_their_source() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let outcome = run_validation(&EmotionalDataSet::Missing, None, &mut ctx);
        assert!(
            outcome
                .result
                .overall
                .errors
                .iter()
                .any(|message| message.starts_with("emotional data:"))
        );
        assert!(
            outcome
                .result
                .overall
                .errors
                .iter()
                .any(|message| message.starts_with("payload:"))
        );
    }

    #[test]
    fn recommendations_track_the_failing_validators() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let outcome = run_validation(&EmotionalDataSet::Missing, None, &mut ctx);
        let recs = outcome.report.recommendations.join(" ");
        assert!(recs.contains("emotional tag capture"));
        assert!(recs.contains("upstream response payload"));
        assert!(!recs.contains("calculation logic"));
    }

    #[test]
    fn summary_counts_critical_and_performance_findings() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let payload = TradeStatsPayload {
            response_time_ms: Some(10_000.0),
            ..clean_payload()
        };
        let outcome = run_validation(&EmotionalDataSet::Missing, Some(&payload), &mut ctx);
        assert!(outcome.report.summary.critical_count >= 1);
        assert!(outcome.report.summary.performance_issue_count >= 1);
        assert!(outcome.report.summary.total_warnings >= 1);
    }

    #[test]
    fn comprehensive_result_serializes_to_camel_case() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        let outcome = run_validation(&clean_input(), Some(&clean_payload()), &mut ctx);
        let json = serde_json::to_value(&outcome.result).unwrap();
        assert!(json["emotionalData"]["isValid"].as_bool().unwrap());
        assert!(json["overall"]["isValid"].as_bool().unwrap());
        assert!(json["metrics"]["psychologicalStabilityIndex"].is_number());
    }

    #[test]
    fn aggregation_is_pure_over_its_sub_results() {
        let emotional = validate_emotional_data(&clean_input());
        let metrics = validate_metric_consistency(60.0, 55.0, &ValidationConfig::default());
        let payload = validate_payload(Some(&clean_payload()), &ValidationConfig::default());
        let performance = validate_performance(
            &tiltguard_types::PerformanceMetrics::default(),
            &ValidationConfig::default(),
        );
        let a = ComprehensiveValidationResult::aggregate(
            emotional.clone(),
            metrics.clone(),
            payload.clone(),
            performance.clone(),
        );
        let b = ComprehensiveValidationResult::aggregate(emotional, metrics, payload, performance);
        assert_eq!(a, b);
    }
}
