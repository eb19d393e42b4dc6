//! Animatable value types
//!
//! Provides the interpolation trait used by tweens and the absolute/relative
//! end values a tween can be given.

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is usually in 0.0..=1.0 but may overshoot for elastic curves.
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

/// A tween end value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenValue {
    /// Animate to exactly this value
    Absolute(f32),
    /// Animate by this delta from the value captured when the tween starts
    Relative(f32),
}

impl TweenValue {
    /// Resolve against the captured start value
    pub fn resolve(self, start: f32) -> f32 {
        match self {
            TweenValue::Absolute(v) => v,
            TweenValue::Relative(delta) => start + delta,
        }
    }
}

impl From<f32> for TweenValue {
    fn from(value: f32) -> Self {
        TweenValue::Absolute(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(&1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(&20.0, 0.25) - 12.5).abs() < 1e-6);
        assert!((0.0_f32.lerp(&100.0, 1.1) - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_tween_value_resolve() {
        assert_eq!(TweenValue::Absolute(5.0).resolve(100.0), 5.0);
        assert_eq!(TweenValue::Relative(-100.0).resolve(340.0), 240.0);
    }
}
