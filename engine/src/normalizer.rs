//! Emotional data normalization and validation.
//!
//! The upstream journal ships tag collections that may be absent, the wrong
//! shape entirely, or full of malformed entries. This module turns any of
//! those inputs into a structured report: what was usable, what was not, and
//! why. Nothing is silently dropped - every irregularity becomes an error or
//! a warning with a severity.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tiltguard_types::{
    EmotionalDataSet, ErrorKind, METRIC_MAX, METRIC_MIN, ParsedTag, RawEmotionTag, Severity,
    ValidationError,
};

/// Outcome of validating one emotional data set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalDataReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
    /// Records that passed every check, with normalized subjects.
    pub valid_emotions: Vec<RawEmotionTag>,
    /// Normalized subjects outside the known vocabulary.
    pub invalid_emotions: Vec<String>,
    /// Entry count of the input sequence, malformed records included.
    pub total_emotions: usize,
    /// Normalized subjects seen more than once, each listed once.
    pub duplicate_emotions: Vec<String>,
}

impl EmotionalDataReport {
    fn empty_invalid(error: ValidationError) -> Self {
        Self {
            is_valid: false,
            errors: vec![error],
            warnings: Vec::new(),
            valid_emotions: Vec::new(),
            invalid_emotions: Vec::new(),
            total_emotions: 0,
            duplicate_emotions: Vec::new(),
        }
    }
}

/// Validate a raw emotional data set.
///
/// Validity is decided by errors alone: warnings, duplicates, and
/// unknown-vocabulary subjects never flip `is_valid`.
#[must_use]
pub fn validate_emotional_data(input: &EmotionalDataSet) -> EmotionalDataReport {
    let tags = match input {
        EmotionalDataSet::Missing => {
            return EmotionalDataReport::empty_invalid(
                ValidationError::new(
                    ErrorKind::NullValue,
                    Severity::Critical,
                    "emotional data is null or missing",
                )
                .with_field("emotionalData"),
            );
        }
        EmotionalDataSet::NotASequence(kind) => {
            return EmotionalDataReport::empty_invalid(
                ValidationError::new(
                    ErrorKind::Type,
                    Severity::Critical,
                    format!("emotional data must be a sequence, got {kind}"),
                )
                .with_field("emotionalData")
                .with_value(kind.clone()),
            );
        }
        EmotionalDataSet::Tags(tags) => tags,
    };

    let mut report = EmotionalDataReport {
        is_valid: true,
        errors: Vec::new(),
        warnings: Vec::new(),
        valid_emotions: Vec::new(),
        invalid_emotions: Vec::new(),
        total_emotions: tags.len(),
        duplicate_emotions: Vec::new(),
    };

    if tags.is_empty() {
        report.warnings.push(ValidationError::new(
            ErrorKind::DataIntegrity,
            Severity::Medium,
            "no emotions recorded for this period",
        ));
        return report;
    }

    let mut seen: HashSet<String> = HashSet::new();
    for (index, tag) in tags.iter().enumerate() {
        check_tag(index, tag, &mut seen, &mut report);
    }

    report.is_valid = report.errors.is_empty();
    report
}

/// Run every per-tag rule, appending findings to the report.
fn check_tag(
    index: usize,
    tag: &RawEmotionTag,
    seen: &mut HashSet<String>,
    report: &mut EmotionalDataReport,
) {
    let parsed = tag.parse();

    let subject = match &parsed {
        ParsedTag::Malformed { reason } => {
            report.errors.push(
                ValidationError::new(
                    ErrorKind::DataIntegrity,
                    Severity::High,
                    format!("emotion[{index}]: {reason}"),
                )
                .with_field(format!("emotionalData[{index}].subject")),
            );
            // Nothing else can be checked against a record with no subject.
            return;
        }
        ParsedTag::Unknown { subject, .. } | ParsedTag::Known { subject, .. } => subject.clone(),
    };

    if !seen.insert(subject.clone()) {
        if !report.duplicate_emotions.contains(&subject) {
            report.duplicate_emotions.push(subject.clone());
        }
        report.warnings.push(
            ValidationError::new(
                ErrorKind::DataIntegrity,
                Severity::Medium,
                format!("duplicate emotion subject {subject}"),
            )
            .with_field(format!("emotionalData[{index}].subject"))
            .with_value(subject.clone()),
        );
    }

    if matches!(parsed, ParsedTag::Unknown { .. }) {
        if !report.invalid_emotions.contains(&subject) {
            report.invalid_emotions.push(subject.clone());
        }
        report.warnings.push(
            ValidationError::new(
                ErrorKind::DataIntegrity,
                Severity::Low,
                format!("unknown emotion subject {subject}"),
            )
            .with_field(format!("emotionalData[{index}].subject"))
            .with_value(subject.clone()),
        );
    }

    let mut tag_ok = matches!(parsed, ParsedTag::Known { .. });

    // Value checks run for known and unknown subjects alike.
    let value = parsed.value().unwrap_or(f64::NAN);
    if !value.is_finite() {
        tag_ok = false;
        report.errors.push(
            ValidationError::new(
                ErrorKind::Type,
                Severity::High,
                format!("emotion[{index}] {subject}: value is not a finite number"),
            )
            .with_field(format!("emotionalData[{index}].value")),
        );
    } else if !(METRIC_MIN..=METRIC_MAX).contains(&value) {
        tag_ok = false;
        report.errors.push(
            ValidationError::new(
                ErrorKind::Range,
                Severity::High,
                format!("emotion[{index}] {subject}: value {value} outside [0,100]"),
            )
            .with_field(format!("emotionalData[{index}].value"))
            .with_value(value)
            .with_expected("0..=100"),
        );
    }

    if let Some(full_mark) = tag.full_mark {
        if full_mark.is_nan() || full_mark <= 0.0 {
            tag_ok = false;
            report.errors.push(
                ValidationError::new(
                    ErrorKind::Range,
                    Severity::Medium,
                    format!("emotion[{index}] {subject}: fullMark must be a positive number"),
                )
                .with_field(format!("emotionalData[{index}].fullMark")),
            );
        }
    }

    if let Some(leaning) = &tag.leaning {
        if !leaning.is_string() {
            report.warnings.push(
                ValidationError::new(
                    ErrorKind::Type,
                    Severity::Low,
                    format!("emotion[{index}] {subject}: leaning should be a string"),
                )
                .with_field(format!("emotionalData[{index}].leaning")),
            );
        }
    }

    if tag_ok {
        report.valid_emotions.push(RawEmotionTag {
            subject: Some(subject.into()),
            ..tag.clone()
        });
    }
}
