//! Exponential smoothing of the tree/explosion mix and the star scale.
//!
//! Each frame the value moves a fixed fraction of the way to its target:
//! `value = lerp(value, target, factor)`. With a factor of 0.05 the mix
//! covers ~63% of the distance in about 20 frames.

use crate::gesture::Gesture;

/// Default per-frame smoothing for the particle mix.
pub const MIX_SMOOTHING: f32 = 0.05;

/// Default per-frame smoothing for the star ornament scale.
pub const STAR_SMOOTHING: f32 = 0.1;

/// Below this distance the value snaps onto its target.
const SETTLE_EPSILON: f32 = 1e-5;

/// Scalar in [0, 1] eased toward a target once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoother {
    value: f32,
    factor: f32,
}

impl Smoother {
    /// Create a smoother at `initial` that moves `factor` of the way each step.
    ///
    /// `factor` is clamped to (0, 1]; `initial` to [0, 1].
    pub fn new(initial: f32, factor: f32) -> Self {
        Self {
            value: initial.clamp(0.0, 1.0),
            factor: factor.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Per-step smoothing factor.
    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Advance one frame toward `target` and return the new value.
    pub fn step(&mut self, target: f32) -> f32 {
        let target = target.clamp(0.0, 1.0);
        let next = self.value + (target - self.value) * self.factor;
        self.value = if (target - next).abs() < SETTLE_EPSILON {
            target
        } else {
            next.clamp(0.0, 1.0)
        };
        self.value
    }

    /// Jump straight to a value.
    pub fn reset(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }
}

/// Mix target for a gesture: 1 explodes, 0 keeps the tree.
#[inline]
pub fn mix_target(gesture: Gesture) -> f32 {
    if gesture.explodes() {
        1.0
    } else {
        0.0
    }
}

/// Star scale target for a gesture: hidden while exploded.
#[inline]
pub fn star_target(gesture: Gesture) -> f32 {
    1.0 - mix_target(gesture)
}

/// The process-wide mix factor plus the star ornament scale.
///
/// Starts fully assembled: mix 0, star scale 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixDriver {
    mix: Smoother,
    star: Smoother,
}

impl MixDriver {
    pub fn new(mix_smoothing: f32, star_smoothing: f32) -> Self {
        Self {
            mix: Smoother::new(0.0, mix_smoothing),
            star: Smoother::new(1.0, star_smoothing),
        }
    }

    /// Advance both values one frame for the current gesture.
    pub fn step(&mut self, gesture: Gesture) -> f32 {
        self.star.step(star_target(gesture));
        self.mix.step(mix_target(gesture))
    }

    /// Current mix: 0 = tree, 1 = exploded.
    #[inline]
    pub fn mix(&self) -> f32 {
        self.mix.value()
    }

    /// Current star scale: 1 = visible, 0 = hidden.
    #[inline]
    pub fn star_scale(&self) -> f32 {
        self.star.value()
    }
}

impl Default for MixDriver {
    fn default() -> Self {
        Self::new(MIX_SMOOTHING, STAR_SMOOTHING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_converges_monotonically() {
        let mut s = Smoother::new(0.0, MIX_SMOOTHING);
        let mut prev = s.value();
        let mut steps = 0;

        while s.value() < 1.0 {
            let v = s.step(1.0);
            assert!(v >= prev, "mix decreased: {prev} -> {v}");
            assert!(v <= 1.0, "mix overshot: {v}");
            prev = v;
            steps += 1;
            assert!(steps < 1_000, "mix failed to settle");
        }
        assert_eq!(s.value(), 1.0);
    }

    #[test]
    fn test_time_constant() {
        // ~63% of the way after about 20 frames
        let mut s = Smoother::new(0.0, MIX_SMOOTHING);
        for _ in 0..20 {
            s.step(1.0);
        }
        assert!((s.value() - 0.64).abs() < 0.02, "value {}", s.value());
    }

    #[test]
    fn test_mix_returns_to_tree() {
        let mut s = Smoother::new(1.0, MIX_SMOOTHING);
        let mut prev = s.value();
        for _ in 0..500 {
            let v = s.step(0.0);
            assert!(v <= prev && v >= 0.0);
            prev = v;
        }
        assert_eq!(s.value(), 0.0);
    }

    #[test]
    fn test_smoother_clamps() {
        let mut s = Smoother::new(2.0, 5.0);
        assert_eq!(s.value(), 1.0);
        assert_eq!(s.factor(), 1.0);
        assert_eq!(s.step(-3.0), 0.0);
    }

    #[test]
    fn test_targets() {
        assert_eq!(mix_target(Gesture::Palm), 1.0);
        for g in [Gesture::None, Gesture::Fist, Gesture::Pointing] {
            assert_eq!(mix_target(g), 0.0);
            assert_eq!(star_target(g), 1.0);
        }
        assert_eq!(star_target(Gesture::Palm), 0.0);
    }

    #[test]
    fn test_star_converges_faster_than_mix() {
        let mut driver = MixDriver::default();
        for _ in 0..10 {
            driver.step(Gesture::Palm);
        }
        // Star has covered more of its distance than the mix has
        assert!(1.0 - driver.star_scale() > driver.mix());
        assert!(driver.mix() > 0.0 && driver.mix() < 1.0);
    }

    #[test]
    fn test_driver_starts_as_tree() {
        let driver = MixDriver::default();
        assert_eq!(driver.mix(), 0.0);
        assert_eq!(driver.star_scale(), 1.0);
    }
}
