//! The two composite scores and their derived stability index.

use serde::{Deserialize, Serialize};

use crate::tag::{METRIC_MAX, METRIC_MIN};

/// The two coupled composite scores the calculator produces.
///
/// Both are nominally in [0,100] and rounded to two decimals when produced by
/// the calculator. Values arriving from elsewhere (a persisted report, a
/// manual caller) may be out of range; the consistency validator exists to
/// catch exactly that, so this type does not clamp on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychologicalMetrics {
    pub discipline_level: f64,
    pub tilt_control: f64,
}

impl PsychologicalMetrics {
    /// The neutral baseline returned for empty or absent input.
    pub const NEUTRAL: PsychologicalMetrics = PsychologicalMetrics {
        discipline_level: 50.0,
        tilt_control: 50.0,
    };

    #[must_use]
    pub fn new(discipline_level: f64, tilt_control: f64) -> Self {
        Self {
            discipline_level,
            tilt_control,
        }
    }

    /// Psychological Stability Index: the average of the two scores. Always
    /// derived, never stored.
    #[must_use]
    pub fn stability_index(&self) -> f64 {
        (self.discipline_level + self.tilt_control) / 2.0
    }

    /// Absolute gap between the two scores.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        (self.discipline_level - self.tilt_control).abs()
    }

    /// Whether both scores sit inside the nominal [0,100] band.
    #[must_use]
    pub fn in_range(&self) -> bool {
        let ok = |v: f64| (METRIC_MIN..=METRIC_MAX).contains(&v);
        ok(self.discipline_level) && ok(self.tilt_control)
    }
}

/// Round to two decimals, the precision the rendering layer expects.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
