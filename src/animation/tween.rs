//! Per-frame scalar tweens.
//!
//! Every animation in the engine is frame-driven rather than time-driven:
//! one [`Tween::step`] per rendered frame. A tween never overshoots its
//! target in either direction.

/// How far a tween advances per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    /// Fixed advance per step.
    Linear(f32),
    /// Close `factor` of the remaining gap per step, but never less than
    /// `min_step`.
    Ease {
        /// Fraction of the remaining gap closed per step.
        factor: f32,
        /// Smallest advance taken while the gap is open.
        min_step: f32,
    },
}

impl Rate {
    fn advance(self, gap: f32) -> f32 {
        match self {
            Self::Linear(step) => step.abs(),
            Self::Ease { factor, min_step } => {
                (gap * factor).abs().max(min_step.abs())
            }
        }
    }
}

/// A scalar moving toward a target one step at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    value: f32,
    target: f32,
    rate: Rate,
}

impl Tween {
    /// Create a tween starting at `value` and heading for `target`.
    #[must_use]
    pub fn new(value: f32, target: f32, rate: Rate) -> Self {
        Self {
            value,
            target,
            rate,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Change the target without resetting the current value.
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
    }

    /// Change the rate without resetting the current value.
    pub fn set_rate(&mut self, rate: Rate) {
        self.rate = rate;
    }

    /// Whether the value has reached the target.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.value == self.target
    }

    /// Advance one frame and return the new value.
    pub fn step(&mut self) -> f32 {
        let gap = self.target - self.value;
        if gap == 0.0 {
            return self.value;
        }
        let advance = self.rate.advance(gap);
        if advance >= gap.abs() {
            self.value = self.target;
        } else {
            self.value += advance * gap.signum();
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_counts_frames_and_lands_exactly() {
        let mut tween = Tween::new(1.0, 0.0, Rate::Linear(0.08));
        let mut frames = 0;
        while !tween.is_done() {
            let _ = tween.step();
            frames += 1;
            assert!(tween.value() >= 0.0);
        }
        assert_eq!(frames, 13);
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn linear_rising_never_overshoots() {
        let mut tween = Tween::new(0.0, 1.0, Rate::Linear(0.06));
        for _ in 0..100 {
            assert!(tween.step() <= 1.0);
        }
        assert!(tween.is_done());
    }

    #[test]
    fn ease_honours_minimum_step() {
        let mut tween = Tween::new(
            0.0,
            1.0,
            Rate::Ease {
                factor: 0.08,
                min_step: 0.25,
            },
        );
        assert_eq!(tween.step(), 0.25);
        assert_eq!(tween.step(), 0.5);
    }

    #[test]
    fn ease_closes_a_fraction_of_large_gaps() {
        let mut tween = Tween::new(
            0.0,
            50.0,
            Rate::Ease {
                factor: 0.08,
                min_step: 0.25,
            },
        );
        assert!((tween.step() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn retarget_keeps_current_value() {
        let mut tween = Tween::new(0.0, 10.0, Rate::Linear(1.0));
        let _ = tween.step();
        tween.retarget(20.0);
        assert_eq!(tween.value(), 1.0);
        assert_eq!(tween.step(), 2.0);
    }
}
