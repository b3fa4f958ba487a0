//! Composite score calculation.
//!
//! A pure, total function from an emotional data set to the two coupled
//! scores. It cannot fail: degenerate inputs collapse to the neutral baseline
//! and non-finite tag values are neutralized before they can poison the
//! arithmetic, so no catch-all is needed.

use tiltguard_types::{EmotionalDataSet, ParsedTag, Polarity, PsychologicalMetrics, round2};

/// Internal deviation clamp applied to the calculator's own output.
///
/// Twice the consistency validator's default threshold
/// (`DEFAULT_MAX_METRIC_DEVIATION` = 15): the upstream system carries both
/// numbers and has never reconciled them. Kept distinct on purpose; see the
/// threshold-divergence tests.
pub const CALCULATOR_DEVIATION_CLAMP: f64 = 30.0;

/// Weights applied to the polarity buckets in the stability score.
const POSITIVE_WEIGHT: f64 = 2.0;
const NEUTRAL_WEIGHT: f64 = 1.0;
const NEGATIVE_WEIGHT: f64 = 1.5;

/// Strength of the coupling adjustment applied on top of the stability base.
const COUPLING_FACTOR: f64 = 0.6;

/// Derive discipline level and tilt control from a tag collection.
///
/// Absent, non-sequence, or empty input yields the neutral `{50, 50}`
/// baseline. Both outputs are clamped to [0,100] and rounded to two decimals.
#[must_use]
pub fn calculate_metrics(input: &EmotionalDataSet) -> PsychologicalMetrics {
    let Some(tags) = input.tags() else {
        return PsychologicalMetrics::NEUTRAL;
    };
    if tags.is_empty() {
        return PsychologicalMetrics::NEUTRAL;
    }

    // Bucket sums over classified tags. Malformed records and non-finite
    // values contribute nothing to the numerators; every entry still counts
    // in the denominator.
    let mut positive_sum = 0.0;
    let mut neutral_sum = 0.0;
    let mut negative_sum = 0.0;
    for tag in tags {
        let ParsedTag::Known { kind, value, .. } = tag.parse() else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }
        match kind.polarity() {
            Polarity::Positive => positive_sum += value,
            Polarity::Negative => negative_sum += value,
            Polarity::Neutral => neutral_sum += value,
            Polarity::Unclassified => {}
        }
    }

    // Percentage-of-maximum per bucket: each tag could contribute at most
    // 100, so the ceiling for any bucket is tag_count * 100.
    let ceiling = (tags.len() as f64) * 100.0;
    let positive_pct = positive_sum / ceiling * 100.0;
    let neutral_pct = neutral_sum / ceiling * 100.0;
    let negative_pct = negative_sum / ceiling * 100.0;

    // Emotional Stability Score, unbounded by construction.
    let ess = positive_pct * POSITIVE_WEIGHT + neutral_pct * NEUTRAL_WEIGHT
        - negative_pct * NEGATIVE_WEIGHT;

    // Map the [-150, 200]-ish ESS band onto [0,100].
    let psi = ((ess + 100.0) / 2.0).clamp(0.0, 100.0);

    // Coupling transform: both scores start from the same stability base and
    // receive the same adjustment. The symmetry means the two scores can only
    // diverge through a caller mixing in other signals; that is faithful to
    // the upstream formula, questionable as it looks.
    let discipline = couple(psi);
    let control = couple(psi);

    let (discipline, control) = clamp_deviation(discipline, control);

    PsychologicalMetrics {
        discipline_level: round2(discipline.clamp(0.0, 100.0)),
        tilt_control: round2(control.clamp(0.0, 100.0)),
    }
}

/// Coupling adjustment: push a base score away from its own midpoint, with
/// the push shrinking as the base approaches 100.
fn couple(base: f64) -> f64 {
    (base + base * COUPLING_FACTOR * (1.0 - base / 100.0)).clamp(0.0, 100.0)
}

/// If the two scores drifted more than the internal clamp apart, lift the
/// lower one to `higher - clamp`, floored at zero.
fn clamp_deviation(discipline: f64, control: f64) -> (f64, f64) {
    if (discipline - control).abs() <= CALCULATOR_DEVIATION_CLAMP {
        return (discipline, control);
    }
    if discipline < control {
        ((control - CALCULATOR_DEVIATION_CLAMP).max(0.0), control)
    } else {
        (discipline, (discipline - CALCULATOR_DEVIATION_CLAMP).max(0.0))
    }
}
