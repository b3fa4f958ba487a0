//! Psychological metrics engine for Tiltguard.
//!
//! Turns recorded emotional-state tags into two coupled composite scores
//! (discipline level and tilt control) and validates the scores, the raw tag
//! set, the upstream response payload, and the run's timing budgets. Every
//! operation is synchronous and side-effect-free apart from the optional
//! structured log entry the report aggregator emits.
//!
//! Control flow for a full run:
//!
//! ```text
//! tags -> normalizer -> calculator -> consistency (+ auto-correct)
//!                                        |
//!            payload validator ----------+--> report aggregator -> outcome
//!            performance validator ------+
//! ```
//!
//! Failures are data: no component raises across its public boundary, and
//! the calculator is total by construction.

mod calculator;
mod consistency;
mod normalizer;
mod payload;
mod performance;
mod report;

pub use calculator::{CALCULATOR_DEVIATION_CLAMP, calculate_metrics};
pub use consistency::{MetricsReport, auto_correct, validate_metric_consistency};
pub use normalizer::{EmotionalDataReport, validate_emotional_data};
pub use payload::{PayloadReport, TradeStatsPayload, validate_payload};
pub use performance::{MAX_MEMORY_USAGE_BYTES, PerformanceReport, validate_performance};
pub use report::{
    ComprehensiveValidationResult, OverallResult, ValidationOutcome, ValidationReport,
    ValidationSummary, run_validation,
};

// Re-export the domain types so most callers need only this crate.
pub use tiltguard_types::{
    DEFAULT_MAX_CALCULATION_TIME_MS, DEFAULT_MAX_METRIC_DEVIATION, DEFAULT_MIN_STABILITY_INDEX,
    EmotionKind, EmotionalDataSet, ErrorKind, MalformedReason, ParsedTag, PerformanceMetrics,
    Polarity, PsychologicalMetrics, RawEmotionTag, Severity, ValidationConfig, ValidationContext,
    ValidationError, normalize_subject,
};
