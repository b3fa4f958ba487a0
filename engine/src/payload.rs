//! Upstream response payload validation.
//!
//! The data layer answers a metrics request with trade statistics plus the
//! emotional data set. Like the tags themselves, the payload is loose at the
//! boundary: required fields may be missing or the wrong type, and every such
//! state is reported rather than rejected by the decoder.

use serde::{Deserialize, Serialize};

use tiltguard_types::{
    ErrorKind, RawEmotionTag, Severity, ValidationConfig, ValidationError,
};

/// Trade statistics payload as shipped by the upstream data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeStatsPayload {
    pub total_trades: Option<f64>,
    #[serde(rename = "totalPnL")]
    pub total_pnl: Option<f64>,
    pub win_rate: Option<f64>,
    #[serde(deserialize_with = "lenient_tags")]
    pub emotional_data: Option<Vec<RawEmotionTag>>,
    /// Upstream-reported response latency in milliseconds.
    pub response_time_ms: Option<f64>,
}

/// Accept any JSON in the emotional data slot. Array entries that are not tag
/// objects decode to an empty record, which the normalizer reports as
/// malformed; a non-array value counts as absent and draws the missing-data
/// finding.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Option<Vec<RawEmotionTag>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Array(entries) => Some(
            entries
                .into_iter()
                .map(|entry| serde_json::from_value(entry).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

/// Validate an upstream payload against the required-field contract.
#[must_use]
pub fn validate_payload(
    payload: Option<&TradeStatsPayload>,
    config: &ValidationConfig,
) -> PayloadReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(payload) = payload else {
        errors.push(
            ValidationError::new(
                ErrorKind::NullValue,
                Severity::Critical,
                "upstream payload is null or missing",
            )
            .with_field("payload"),
        );
        return PayloadReport {
            is_valid: false,
            errors,
            warnings,
        };
    };

    match payload.total_trades {
        None => errors.push(missing_field("totalTrades")),
        Some(n) if !n.is_finite() => errors.push(non_numeric("totalTrades")),
        Some(n) if n < 0.0 => errors.push(
            ValidationError::new(
                ErrorKind::Range,
                Severity::High,
                format!("totalTrades is {n}, must be non-negative"),
            )
            .with_field("totalTrades")
            .with_value(n),
        ),
        Some(_) => {}
    }

    match payload.total_pnl {
        None => errors.push(missing_field("totalPnL")),
        Some(n) if !n.is_finite() => errors.push(non_numeric("totalPnL")),
        Some(_) => {}
    }

    match payload.win_rate {
        None => errors.push(missing_field("winRate")),
        Some(n) if !n.is_finite() => errors.push(non_numeric("winRate")),
        Some(n) if !(0.0..=100.0).contains(&n) => errors.push(
            ValidationError::new(
                ErrorKind::Range,
                Severity::High,
                format!("winRate is {n}, outside [0,100]"),
            )
            .with_field("winRate")
            .with_value(n)
            .with_expected("0..=100"),
        ),
        Some(_) => {}
    }

    match &payload.emotional_data {
        None => errors.push(
            ValidationError::new(
                ErrorKind::DataIntegrity,
                Severity::High,
                "payload carries no emotional data",
            )
            .with_field("emotionalData"),
        ),
        Some(tags) if tags.is_empty() => warnings.push(
            ValidationError::new(
                ErrorKind::DataIntegrity,
                Severity::Medium,
                "payload emotional data is empty",
            )
            .with_field("emotionalData"),
        ),
        Some(_) => {}
    }

    if let Some(elapsed) = payload.response_time_ms {
        if elapsed > config.max_calculation_time_ms {
            let finding = ValidationError::new(
                ErrorKind::Performance,
                if config.strict_mode {
                    Severity::High
                } else {
                    Severity::Medium
                },
                format!(
                    "response time {elapsed:.1}ms exceeds the {:.1}ms budget",
                    config.max_calculation_time_ms
                ),
            )
            .with_field("responseTimeMs")
            .with_value(elapsed)
            .with_expected(config.max_calculation_time_ms);
            if config.strict_mode {
                errors.push(finding);
            } else {
                warnings.push(finding);
            }
        }
    }

    PayloadReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn missing_field(field: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::DataIntegrity,
        Severity::High,
        format!("required field {field} is missing"),
    )
    .with_field(field)
}

fn non_numeric(field: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::Type,
        Severity::High,
        format!("{field} is not a finite number"),
    )
    .with_field(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_payload() -> TradeStatsPayload {
        TradeStatsPayload {
            total_trades: Some(42.0),
            total_pnl: Some(-130.25),
            win_rate: Some(55.0),
            emotional_data: Some(vec![RawEmotionTag::new("DISCIPLINE", 70.0)]),
            response_time_ms: Some(120.0),
        }
    }

    #[test]
    fn well_formed_payload_passes() {
        let report = validate_payload(Some(&good_payload()), &ValidationConfig::default());
        assert!(report.is_valid, "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_payload_is_a_critical_null_error() {
        let report = validate_payload(None, &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::NullValue);
        assert_eq!(report.errors[0].severity, Severity::Critical);
    }

    #[test]
    fn negative_trade_count_is_a_range_error() {
        let payload = TradeStatsPayload {
            total_trades: Some(-1.0),
            ..good_payload()
        };
        let report = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].kind, ErrorKind::Range);
    }

    #[test]
    fn non_finite_pnl_is_a_type_error() {
        let payload = TradeStatsPayload {
            total_pnl: Some(f64::INFINITY),
            ..good_payload()
        };
        let report = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].kind, ErrorKind::Type);
    }

    #[test]
    fn win_rate_over_100_is_a_range_error() {
        let payload = TradeStatsPayload {
            win_rate: Some(101.0),
            ..good_payload()
        };
        let report = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(!report.is_valid);
        assert!(report.errors[0].message.contains("winRate"));
    }

    #[test]
    fn missing_required_fields_each_get_a_finding() {
        let report = validate_payload(
            Some(&TradeStatsPayload::default()),
            &ValidationConfig::default(),
        );
        assert!(!report.is_valid);
        // totalTrades, totalPnL, winRate, emotionalData.
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn empty_emotional_data_is_a_warning_not_an_error() {
        let payload = TradeStatsPayload {
            emotional_data: Some(vec![]),
            ..good_payload()
        };
        let report = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn slow_response_warns_by_default_and_blocks_in_strict_mode() {
        let payload = TradeStatsPayload {
            response_time_ms: Some(5000.0),
            ..good_payload()
        };
        let lax = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(lax.is_valid);
        assert_eq!(lax.warnings.len(), 1);
        assert_eq!(lax.warnings[0].kind, ErrorKind::Performance);

        let strict = validate_payload(
            Some(&payload),
            &ValidationConfig {
                strict_mode: true,
                ..ValidationConfig::default()
            },
        );
        assert!(!strict.is_valid);
    }

    #[test]
    fn loose_emotional_data_entries_decode_instead_of_failing() {
        let payload: TradeStatsPayload = serde_json::from_str(
            r#"{"totalTrades":5,"totalPnL":10,"winRate":50,
                "emotionalData":[42,{"subject":"TILT","value":30}],
                "responseTimeMs":20}"#,
        )
        .unwrap();
        let tags = payload.emotional_data.as_ref().unwrap();
        assert_eq!(tags.len(), 2);
        // The non-object entry surfaces as an empty record for the
        // normalizer to report, not a decode failure.
        assert_eq!(tags[0], RawEmotionTag::default());
        assert_eq!(tags[1].subject_str(), Some("TILT"));

        let report = validate_payload(Some(&payload), &ValidationConfig::default());
        assert!(report.is_valid);
    }

    #[test]
    fn payload_deserializes_from_upstream_json() {
        let payload: TradeStatsPayload = serde_json::from_str(
            r#"{"totalTrades":10,"totalPnL":42.5,"winRate":60,
                "emotionalData":[{"subject":"TILT","value":30}],
                "responseTimeMs":80}"#,
        )
        .unwrap();
        assert_eq!(payload.total_trades, Some(10.0));
        assert_eq!(payload.emotional_data.unwrap().len(), 1);
    }
}
