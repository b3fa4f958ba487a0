//! Core domain types for Tiltguard.
//!
//! This crate contains pure domain types with no IO and no async: the
//! emotional tag vocabulary and its loose/parsed boundary, the two composite
//! psychological scores, the validation error taxonomy, and the per-request
//! config and context values. Everything here can be used from any layer.

mod config;
mod context;
mod error;
mod metrics;
mod tag;

pub use config::{
    DEFAULT_MAX_CALCULATION_TIME_MS, DEFAULT_MAX_METRIC_DEVIATION, DEFAULT_MIN_STABILITY_INDEX,
    ValidationConfig,
};
pub use context::{PerformanceMetrics, ValidationContext};
pub use error::{ErrorKind, Severity, ValidationError};
pub use metrics::{PsychologicalMetrics, round2};
pub use tag::{
    EmotionKind, EmotionalDataSet, METRIC_MAX, METRIC_MIN, MalformedReason, ParsedTag, Polarity,
    RawEmotionTag, normalize_subject,
};
