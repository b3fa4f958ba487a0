//! Structured validation findings.
//!
//! Components in this engine never raise across their public boundary: a
//! failed check is data. [`ValidationError`] is the one finding shape shared
//! by every validator. Whether a finding blocks (`is_valid = false`) is
//! decided by the list each check routes it into - the error list blocks, the
//! warning list advises - while severity records how bad the finding is. The
//! two usually line up, but not always: the normalizer records a medium
//! `fullMark` violation as an error, and the deviation check records a high
//! finding as a warning outside strict mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of contract a finding violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Range,
    Type,
    Consistency,
    DataIntegrity,
    NullValue,
    Performance,
}

/// How bad a finding is, ordered from mildest to worst. Descriptive only:
/// blocking is decided by error-list placement, not severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One validation finding, timestamped at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl ValidationError {
    #[must_use]
    pub fn new(kind: ErrorKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            field: None,
            value: None,
            expected_value: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<serde_json::Value>) -> Self {
        self.expected_value = Some(expected.into());
        self
    }
}
