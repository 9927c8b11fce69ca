//! Easing curves applied to tween output before it reaches a material.
//!
//! Tweens advance linearly per frame; an easing curve reshapes the
//! normalized value so fades can start or finish gently without changing
//! their frame count.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for fade curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear mapping (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Smoothstep: slow at both ends.
    SmoothStep,
}

impl EasingFunction {
    /// Evaluate the easing function at `t`.
    ///
    /// Input is clamped to [0.0, 1.0]; output is also in [0.0, 1.0] and
    /// monotonically non-decreasing in `t` for every variant.
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn input_is_clamped() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);
        assert_eq!(EasingFunction::SmoothStep.evaluate(2.0), 1.0);
    }

    #[test]
    fn quadratic_curves() {
        assert_eq!(EasingFunction::QuadraticIn.evaluate(0.5), 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
    }

    #[test]
    fn every_curve_is_monotonic() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::QuadraticIn,
            EasingFunction::QuadraticOut,
            EasingFunction::SmoothStep,
        ] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.evaluate(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
        }
    }
}
