//! Easing functions for time-based animations.
//!
//! Polynomial, circular and back curves, each available as an in, out and
//! in-out variant, plus `anticipate`. Out variants mirror the in curve in
//! time; in-out variants run the in curve for the first half and its mirror
//! for the second.

use crate::config::EasingType;

/// Overshoot amount shared by the back and anticipate curves.
const BACK_POWER: f64 = 1.525;

// ============================================================================
// Easing Functions
// ============================================================================

/// Linear interpolation between two values.
#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 { (end - start).mul_add(t, start) }

/// Linear easing (no acceleration).
#[inline]
pub const fn ease_linear(t: f64) -> f64 { t }

/// Ease-in (slow start, accelerates).
#[inline]
pub fn ease_in(t: f64) -> f64 { t * t }

/// Ease-out (fast start, decelerates).
#[inline]
pub fn ease_out(t: f64) -> f64 { reverse(ease_in, t) }

/// Ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f64) -> f64 { mirror(ease_in, t) }

/// Circular ease-in.
#[inline]
pub fn circ_in(t: f64) -> f64 { 1.0 - t.mul_add(-t, 1.0).max(0.0).sqrt() }

/// Circular ease-out.
#[inline]
pub fn circ_out(t: f64) -> f64 { reverse(circ_in, t) }

/// Circular ease-in-out.
#[inline]
pub fn circ_in_out(t: f64) -> f64 { mirror(circ_in, t) }

/// Back ease-in (pulls back below 0 before accelerating).
#[inline]
pub fn back_in(t: f64) -> f64 { t * t * (BACK_POWER + 1.0).mul_add(t, -BACK_POWER) }

/// Back ease-out (overshoots 1 before settling).
#[inline]
pub fn back_out(t: f64) -> f64 { reverse(back_in, t) }

/// Back ease-in-out.
#[inline]
pub fn back_in_out(t: f64) -> f64 { mirror(back_in, t) }

/// Pulls back like `back_in` for the first half, then shoots out
/// exponentially.
#[inline]
pub fn anticipate(t: f64) -> f64 {
    let p = t * 2.0;
    if p < 1.0 {
        0.5 * back_in(p)
    } else {
        0.5 * (2.0 - 2.0_f64.powf(-10.0 * (p - 1.0)))
    }
}

#[inline]
fn reverse(curve: fn(f64) -> f64, t: f64) -> f64 { 1.0 - curve(1.0 - t) }

#[inline]
fn mirror(curve: fn(f64) -> f64, t: f64) -> f64 {
    if t <= 0.5 {
        curve(2.0 * t) / 2.0
    } else {
        (2.0 - curve(2.0 * (1.0 - t))) / 2.0
    }
}

/// Applies an easing function based on the easing type.
#[inline]
pub fn apply_easing(t: f64, easing: EasingType) -> f64 {
    match easing {
        EasingType::Linear => ease_linear(t),
        EasingType::EaseIn => ease_in(t),
        EasingType::EaseOut => ease_out(t),
        EasingType::EaseInOut => ease_in_out(t),
        EasingType::CircIn => circ_in(t),
        EasingType::CircOut => circ_out(t),
        EasingType::CircInOut => circ_in_out(t),
        EasingType::BackIn => back_in(t),
        EasingType::BackOut => back_out(t),
        EasingType::BackInOut => back_in_out(t),
        EasingType::Anticipate => anticipate(t),
    }
}

// ============================================================================
// Tests
// ============================================================================
