//! Time-based tween between two transforms.

use std::time::Duration;

use crate::animation::easing::apply_easing;
use crate::config::EasingType;
use crate::geometry::Coords;

/// A tween from one transform to another over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Starting transform.
    pub from: Coords,
    /// Target transform.
    pub to: Coords,
    /// Total duration.
    pub duration: Duration,
    /// Easing curve.
    pub easing: EasingType,
}

/// One sampled tween value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    /// Interpolated transform.
    pub value: Coords,
    /// Whether the tween reached its end.
    pub finished: bool,
}

impl Tween {
    /// Creates a new tween.
    #[must_use]
    pub const fn new(from: Coords, to: Coords, duration: Duration, easing: EasingType) -> Self {
        Self { from, to, duration, easing }
    }

    /// Linear progress (0.0 to 1.0) after `elapsed`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Samples the tween after `elapsed`.
    ///
    /// The final sample is exactly `to`, so a tween towards the identity ends
    /// on an exact identity transform.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> TweenSample {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return TweenSample { value: self.to, finished: true };
        }

        let eased = apply_easing(progress, self.easing);
        TweenSample {
            value: self.from.interpolate(&self.to, eased),
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tween(easing: EasingType) -> Tween {
        Tween::new(
            Coords::new(-200.0, 0.0, 1.0, 1.0),
            Coords::IDENTITY,
            Duration::from_millis(200),
            easing,
        )
    }

    #[test]
    fn test_sample_start_is_from() {
        let sample = tween(EasingType::Linear).sample(Duration::ZERO);
        assert_eq!(sample.value, Coords::new(-200.0, 0.0, 1.0, 1.0));
        assert!(!sample.finished);
    }

    #[test]
    fn test_sample_linear_midpoint() {
        let sample = tween(EasingType::Linear).sample(Duration::from_millis(100));
        assert!((sample.value.translate_x + 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_end_is_exact_target() {
        let sample = tween(EasingType::BackOut).sample(Duration::from_millis(250));
        assert!(sample.finished);
        assert!(sample.value.is_identity());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut t = tween(EasingType::EaseIn);
        t.duration = Duration::ZERO;
        assert!(t.sample(Duration::ZERO).finished);
    }

    #[test]
    fn test_easing_shapes_progress() {
        let ease_in = tween(EasingType::EaseIn).sample(Duration::from_millis(100));
        let ease_out = tween(EasingType::EaseOut).sample(Duration::from_millis(100));
        // ease-in has covered less distance than ease-out at the midpoint
        assert!(ease_in.value.translate_x < ease_out.value.translate_x);
    }
}
