//! Response curves.

use serde::{Deserialize, Serialize};

/// Shape applied to a normalized input in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResponseCurve {
    Linear,
    Quadratic,
    /// `1 / (1 + e^(-steepness × (x - midpoint)))`.
    Logistic { midpoint: f32, steepness: f32 },
}

impl ResponseCurve {
    /// Evaluates the curve at `input`, clamped to `0.0..=1.0` on both sides.
    ///
    /// Non-finite inputs evaluate to 0.
    pub fn evaluate(self, input: f32) -> f32 {
        if !input.is_finite() {
            return 0.0;
        }
        let x = input.clamp(0.0, 1.0);

        let y = match self {
            ResponseCurve::Linear => x,
            ResponseCurve::Quadratic => x * x,
            ResponseCurve::Logistic {
                midpoint,
                steepness,
            } => 1.0 / (1.0 + (-steepness * (x - midpoint)).exp()),
        };

        if y.is_finite() { y.clamp(0.0, 1.0) } else { 0.0 }
    }
}

/// Heal urgency for an agent at `hp_percent`: `(1 - hp/100)²`.
pub fn heal_urgency(hp_percent: f32) -> f32 {
    if !hp_percent.is_finite() {
        return 0.0;
    }
    ResponseCurve::Quadratic.evaluate(1.0 - hp_percent / 100.0)
}
