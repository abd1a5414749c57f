#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations produce normalized `f32` progress values (0.0–1.0) and are
//! advanced explicitly with [`Animation::tick`]; nothing here reads a clock.
//! The host's frame loop decides how much time has passed.
//!
//! [`Tween`] interpolates a single value; [`AnimationSlot`] holds at most one
//! running tween per kind of animation and reports finished or superseded
//! tasks so their owner can finalize state.

mod slot;

pub use slot::{AnimationSlot, Finished, Outcome};

use web_time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic ease-out (slower end than quadratic).
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates an `f32` between `from` and `to` over a duration.
///
/// [`Animation::value`] returns eased progress; [`Tween::current`] returns
/// the interpolated value. Elapsed time is tracked as a [`Duration`] so
/// accumulation does not drift.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween from `from` to `to` over `duration` with linear easing.
    ///
    /// A zero duration is clamped to 1ns so the tween completes on its
    /// first tick.
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Progress tween from 0.0 to 1.0.
    pub fn progress(duration: Duration) -> Self {
        Self::new(0.0, 1.0, duration)
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated value.
    pub fn current(&self) -> f32 {
        self.from + (self.to - self.from) * self.value()
    }

    /// Start value.
    pub const fn from(&self) -> f32 {
        self.from
    }

    /// End value.
    pub const fn to(&self) -> f32 {
        self.to
    }

    /// Total duration.
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_250: Duration = Duration::from_millis(250);

    #[test]
    fn easing_endpoints() {
        for f in [linear, ease_out, ease_out_cubic] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
            assert_eq!(f(-1.0), 0.0);
            assert_eq!(f(2.0), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        assert!(ease_out(0.5) > linear(0.5));
        assert!(ease_out_cubic(0.5) > ease_out(0.5));
    }

    #[test]
    fn tween_interpolates() {
        let mut tween = Tween::new(10.0, 20.0, MS_250);
        assert_eq!(tween.current(), 10.0);
        tween.tick(Duration::from_millis(125));
        assert!((tween.current() - 15.0).abs() < 1e-4);
        assert!(!tween.is_complete());
        tween.tick(Duration::from_millis(125));
        assert!(tween.is_complete());
        assert_eq!(tween.current(), 20.0);
    }

    #[test]
    fn tween_negative_direction() {
        let mut tween = Tween::new(0.0, -40.0, MS_100);
        tween.tick(MS_100);
        assert_eq!(tween.current(), -40.0);
    }

    #[test]
    fn tween_zero_duration_completes_on_first_tick() {
        let mut tween = Tween::progress(Duration::ZERO);
        assert!(!tween.is_complete());
        tween.tick(Duration::ZERO + Duration::from_nanos(1));
        assert!(tween.is_complete());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn tween_overshoot_clamps() {
        let mut tween = Tween::progress(MS_100).easing(ease_out);
        tween.tick(MS_250);
        assert_eq!(tween.value(), 1.0);
        tween.reset();
        assert_eq!(tween.value(), 0.0);
    }
}
