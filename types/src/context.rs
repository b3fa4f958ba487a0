//! Per-request validation context.
//!
//! One context is created per validation run and never shared across
//! concurrent runs. It carries the request identity, the immutable config
//! snapshot, and the timing record the performance validator inspects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ValidationConfig;

/// Timing and resource usage observed for one run.
///
/// Purely retrospective: a budget overrun recorded here is flagged after the
/// fact, never interrupted in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Wall-clock duration of the run, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_time_ms: Option<f64>,
    /// Resident memory attributed to the run, in bytes, when the caller
    /// measures it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_bytes: Option<u64>,
}

/// Identity, config, and timing for a single validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationContext {
    pub request_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub config: ValidationConfig,
    pub performance: PerformanceMetrics,
}

impl ValidationContext {
    /// Start a new context, stamping the start time now.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        let now = Utc::now();
        Self {
            request_id: Uuid::new_v4(),
            user_id: None,
            timestamp: now,
            config,
            performance: PerformanceMetrics {
                start_time: Some(now),
                ..PerformanceMetrics::default()
            },
        }
    }

    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Stamp completion: records the end time and derives the elapsed
    /// duration from the start stamp. Idempotent in effect; calling it twice
    /// just moves the end stamp forward.
    pub fn finalize(&mut self) {
        let end = Utc::now();
        self.performance.end_time = Some(end);
        if let Some(start) = self.performance.start_time {
            let elapsed = (end - start).num_microseconds().unwrap_or(i64::MAX);
            self.performance.calculation_time_ms = Some(elapsed as f64 / 1000.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_contexts_get_distinct_request_ids() {
        let a = ValidationContext::new(ValidationConfig::default());
        let b = ValidationContext::new(ValidationConfig::default());
        assert_ne!(a.request_id, b.request_id);
        assert!(a.performance.start_time.is_some());
        assert!(a.performance.end_time.is_none());
    }

    #[test]
    fn finalize_stamps_end_and_duration() {
        let mut ctx = ValidationContext::new(ValidationConfig::default());
        ctx.finalize();
        assert!(ctx.performance.end_time.is_some());
        let elapsed = ctx.performance.calculation_time_ms.unwrap();
        assert!(elapsed >= 0.0);
    }

    #[test]
    fn user_id_is_optional_and_attachable() {
        let ctx = ValidationContext::new(ValidationConfig::default()).with_user("trader-7");
        assert_eq!(ctx.user_id.as_deref(), Some("trader-7"));
    }
}
