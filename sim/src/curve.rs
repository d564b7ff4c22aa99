//! Keyframe response curves.
//!
//! Used to scale fire spread by how far along a plant's fire is. The curve is
//! configuration data: a list of `(time, value)` keys evaluated with linear
//! interpolation and clamped at both ends.

use serde::{Deserialize, Serialize};

/// A single curve keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve over sorted keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct SpreadCurve {
    keys: Vec<CurveKey>,
}

impl SpreadCurve {
    /// Build a curve from keys in any order. Non-finite keys are dropped.
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.time.is_finite() && k.value.is_finite());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// A curve that returns `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Sample the curve. An empty curve is neutral (1.0).
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                let s = (t - a.time) / span;
                return a.value + (b.value - a.value) * s;
            }
        }
        last.value
    }
}

impl Default for SpreadCurve {
    /// Fires start weak, peak early, and fade as the fuel runs out.
    fn default() -> Self {
        Self::new(vec![
            CurveKey::new(0.0, 0.6),
            CurveKey::new(0.35, 1.0),
            CurveKey::new(1.0, 0.4),
        ])
    }
}

impl From<Vec<CurveKey>> for SpreadCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<SpreadCurve> for Vec<CurveKey> {
    fn from(curve: SpreadCurve) -> Self {
        curve.keys
    }
}
