//! Emotional tag vocabulary and the raw-to-parsed tag boundary.
//!
//! Upstream journals record one tag per trade as a loose JSON object. Anything
//! can be missing or the wrong shape, and the contract is to *report* those
//! states rather than reject them at deserialization time. [`RawEmotionTag`]
//! is therefore deliberately loose; [`ParsedTag`] is the tagged result of
//! classifying a raw record exactly once, so downstream code never re-checks
//! shape with ad hoc boolean tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nominal bounds for a recorded tag value and for both composite metrics.
pub const METRIC_MIN: f64 = 0.0;
/// Upper nominal bound, see [`METRIC_MIN`].
pub const METRIC_MAX: f64 = 100.0;

/// The fixed vocabulary of known emotional states.
///
/// `Fomo` and `Greed` are recognized but carry no polarity: they count toward
/// the tag total without contributing to the positive/negative/neutral sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmotionKind {
    Discipline,
    Confidence,
    Patience,
    Tilt,
    Revenge,
    Impatience,
    Fomo,
    Greed,
    Neutral,
    Analytical,
}

/// Scoring bucket for a known emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
    /// Known vocabulary, but excluded from the weighted sums.
    Unclassified,
}

impl EmotionKind {
    pub const ALL: [EmotionKind; 10] = [
        EmotionKind::Discipline,
        EmotionKind::Confidence,
        EmotionKind::Patience,
        EmotionKind::Tilt,
        EmotionKind::Revenge,
        EmotionKind::Impatience,
        EmotionKind::Fomo,
        EmotionKind::Greed,
        EmotionKind::Neutral,
        EmotionKind::Analytical,
    ];

    /// Look up a kind from an already-normalized subject (trimmed, uppercase).
    #[must_use]
    pub fn from_normalized(subject: &str) -> Option<Self> {
        match subject {
            "DISCIPLINE" => Some(EmotionKind::Discipline),
            "CONFIDENCE" => Some(EmotionKind::Confidence),
            "PATIENCE" => Some(EmotionKind::Patience),
            "TILT" => Some(EmotionKind::Tilt),
            "REVENGE" => Some(EmotionKind::Revenge),
            "IMPATIENCE" => Some(EmotionKind::Impatience),
            "FOMO" => Some(EmotionKind::Fomo),
            "GREED" => Some(EmotionKind::Greed),
            "NEUTRAL" => Some(EmotionKind::Neutral),
            "ANALYTICAL" => Some(EmotionKind::Analytical),
            _ => None,
        }
    }

    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            EmotionKind::Discipline | EmotionKind::Confidence | EmotionKind::Patience => {
                Polarity::Positive
            }
            EmotionKind::Tilt | EmotionKind::Revenge | EmotionKind::Impatience => {
                Polarity::Negative
            }
            EmotionKind::Neutral | EmotionKind::Analytical => Polarity::Neutral,
            EmotionKind::Fomo | EmotionKind::Greed => Polarity::Unclassified,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionKind::Discipline => "DISCIPLINE",
            EmotionKind::Confidence => "CONFIDENCE",
            EmotionKind::Patience => "PATIENCE",
            EmotionKind::Tilt => "TILT",
            EmotionKind::Revenge => "REVENGE",
            EmotionKind::Impatience => "IMPATIENCE",
            EmotionKind::Fomo => "FOMO",
            EmotionKind::Greed => "GREED",
            EmotionKind::Neutral => "NEUTRAL",
            EmotionKind::Analytical => "ANALYTICAL",
        }
    }
}

/// Normalize a raw subject the way every downstream check expects it:
/// surrounding whitespace stripped, ASCII-uppercased.
#[must_use]
pub fn normalize_subject(subject: &str) -> String {
    subject.trim().to_ascii_uppercase()
}

/// One recorded emotional tag, exactly as the upstream data layer ships it.
///
/// Every field is optional because malformed records are a tolerated input
/// state, not a deserialization failure. Shape problems are surfaced by the
/// normalizer as structured findings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmotionTag {
    /// Loose slot: must be a string, but wrong-typed JSON is kept so the
    /// normalizer can report it instead of the decoder rejecting the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_mark: Option<f64>,
    /// Loose slot: must be a string when present, but wrong types are kept
    /// so the normalizer can warn about them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaning: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<serde_json::Value>,
}

/// Accept any JSON in a numeric slot. Absent/null stays `None`; a number comes
/// through as-is; any other type becomes `Some(NaN)` so the normalizer can
/// report it as a type violation instead of the decoder rejecting the record.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        _ => Some(f64::NAN),
    })
}

impl RawEmotionTag {
    /// Convenience constructor for the common subject/value pair.
    #[must_use]
    pub fn new(subject: impl Into<String>, value: f64) -> Self {
        Self {
            subject: Some(serde_json::Value::String(subject.into())),
            value: Some(value),
            ..Self::default()
        }
    }

    /// The subject as text, when the record carried a string there.
    #[must_use]
    pub fn subject_str(&self) -> Option<&str> {
        self.subject.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Classify this record once, yielding a shape downstream code can match
    /// on without re-validating.
    #[must_use]
    pub fn parse(&self) -> ParsedTag {
        let Some(raw_subject) = &self.subject else {
            return ParsedTag::Malformed {
                reason: MalformedReason::MissingSubject,
            };
        };
        let Some(subject) = raw_subject.as_str() else {
            return ParsedTag::Malformed {
                reason: MalformedReason::NonStringSubject,
            };
        };
        let normalized = normalize_subject(subject);
        if normalized.is_empty() {
            return ParsedTag::Malformed {
                reason: MalformedReason::EmptySubject,
            };
        }
        let value = self.value.unwrap_or(f64::NAN);
        match EmotionKind::from_normalized(&normalized) {
            Some(kind) => ParsedTag::Known {
                kind,
                subject: normalized,
                value,
            },
            None => ParsedTag::Unknown {
                subject: normalized,
                value,
            },
        }
    }
}

/// Why a raw tag could not be classified at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("tag has no subject")]
    MissingSubject,
    #[error("tag subject is not a string")]
    NonStringSubject,
    #[error("tag subject is empty after trimming")]
    EmptySubject,
}

/// The result of parsing one raw tag. Holding a `Known` proves the subject is
/// in the vocabulary; holding `Unknown` proves it was at least a non-empty
/// string. `value` may still be non-finite or out of range - the normalizer
/// reports that separately because an unknown-but-plausible tag must not be
/// dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTag {
    Malformed {
        reason: MalformedReason,
    },
    Unknown {
        subject: String,
        value: f64,
    },
    Known {
        kind: EmotionKind,
        subject: String,
        value: f64,
    },
}

impl ParsedTag {
    /// Normalized subject, if the record had one.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            ParsedTag::Malformed { .. } => None,
            ParsedTag::Unknown { subject, .. } | ParsedTag::Known { subject, .. } => {
                Some(subject.as_str())
            }
        }
    }

    /// Recorded value, if the record had one (NaN when missing).
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            ParsedTag::Malformed { .. } => None,
            ParsedTag::Unknown { value, .. } | ParsedTag::Known { value, .. } => Some(*value),
        }
    }
}

/// An emotional data set as delivered by the upstream layer: possibly absent,
/// possibly not a sequence at all. Both degenerate states are representable
/// so the normalizer can report them instead of a deserializer guessing.
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionalDataSet {
    /// Upstream sent null / nothing.
    Missing,
    /// Upstream sent a value that is not a sequence; the payload keeps the
    /// JSON type name for the diagnostic.
    NotASequence(String),
    Tags(Vec<RawEmotionTag>),
}

impl EmotionalDataSet {
    #[must_use]
    pub fn from_tags(tags: Vec<RawEmotionTag>) -> Self {
        EmotionalDataSet::Tags(tags)
    }

    /// The tag slice, when the input actually was a sequence.
    #[must_use]
    pub fn tags(&self) -> Option<&[RawEmotionTag]> {
        match self {
            EmotionalDataSet::Tags(tags) => Some(tags),
            _ => None,
        }
    }
}

impl From<Option<Vec<RawEmotionTag>>> for EmotionalDataSet {
    fn from(value: Option<Vec<RawEmotionTag>>) -> Self {
        match value {
            Some(tags) => EmotionalDataSet::Tags(tags),
            None => EmotionalDataSet::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_normalization_trims_and_uppercases() {
        assert_eq!(normalize_subject("  tilt \n"), "TILT");
        assert_eq!(normalize_subject("Discipline"), "DISCIPLINE");
    }

    #[test]
    fn vocabulary_round_trips_through_normalized_names() {
        for kind in EmotionKind::ALL {
            assert_eq!(EmotionKind::from_normalized(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_classifies_known_unknown_and_malformed() {
        let known = RawEmotionTag::new("tilt", 40.0).parse();
        assert!(matches!(
            known,
            ParsedTag::Known {
                kind: EmotionKind::Tilt,
                ..
            }
        ));

        let unknown = RawEmotionTag::new("EUPHORIA", 10.0).parse();
        assert!(matches!(unknown, ParsedTag::Unknown { .. }));

        let malformed = RawEmotionTag {
            subject: None,
            value: Some(5.0),
            ..RawEmotionTag::default()
        }
        .parse();
        assert!(matches!(
            malformed,
            ParsedTag::Malformed {
                reason: MalformedReason::MissingSubject
            }
        ));
    }

    #[test]
    fn missing_value_parses_as_nan_not_malformed() {
        let parsed = RawEmotionTag {
            subject: Some("FOMO".into()),
            ..RawEmotionTag::default()
        }
        .parse();
        let value = parsed.value().unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn fomo_and_greed_are_known_but_unclassified() {
        assert_eq!(EmotionKind::Fomo.polarity(), Polarity::Unclassified);
        assert_eq!(EmotionKind::Greed.polarity(), Polarity::Unclassified);
        assert_eq!(EmotionKind::Patience.polarity(), Polarity::Positive);
        assert_eq!(EmotionKind::Revenge.polarity(), Polarity::Negative);
    }

    #[test]
    fn raw_tag_deserializes_from_loose_json() {
        let tag: RawEmotionTag =
            serde_json::from_str(r#"{"subject":"TILT","value":80,"fullMark":100}"#).unwrap();
        assert_eq!(tag.subject_str(), Some("TILT"));
        assert_eq!(tag.value, Some(80.0));
        assert_eq!(tag.full_mark, Some(100.0));

        // Shape problems are tolerated, not deserialization failures.
        let sparse: RawEmotionTag = serde_json::from_str(r"{}").unwrap();
        assert_eq!(sparse.subject, None);
        assert_eq!(sparse.value, None);
    }

    #[test]
    fn non_string_subject_decodes_and_parses_as_malformed() {
        let tag: RawEmotionTag = serde_json::from_str(r#"{"subject":42,"value":50}"#).unwrap();
        assert_eq!(tag.subject_str(), None);
        assert!(matches!(
            tag.parse(),
            ParsedTag::Malformed {
                reason: MalformedReason::NonStringSubject
            }
        ));
    }

    #[test]
    fn wrong_typed_value_becomes_nan_not_a_decode_failure() {
        let tag: RawEmotionTag =
            serde_json::from_str(r#"{"subject":"TILT","value":"very"}"#).unwrap();
        assert!(tag.value.unwrap().is_nan());

        let tag: RawEmotionTag =
            serde_json::from_str(r#"{"subject":"TILT","value":null}"#).unwrap();
        assert_eq!(tag.value, None);
    }
}
