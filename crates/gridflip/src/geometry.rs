//! Geometry types and the container-relative resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animation::easing::lerp;

// ============================================================================
// Rect
// ============================================================================

/// A rectangle with position and size.
///
/// `x` is the left edge and `y` the top edge. Rectangles produced by
/// [`container_relative`] are measured from the container's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a zero-sized rectangle at origin.
    #[must_use]
    pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0, 0.0) }

    /// Returns a copy moved by the given offset.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Exact equality across all four fields.
    ///
    /// Any sub-pixel difference counts as movement.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

/// Resolves an item's bounding box relative to its container.
///
/// Hidden items report a viewport box at `(0, 0)`, which would put them far
/// above and to the left of a scrolled container. Clamping keeps them inside.
#[must_use]
pub fn container_relative(container: Rect, item: Rect) -> Rect {
    Rect::new(
        (item.x - container.x).max(0.0),
        (item.y - container.y).max(0.0),
        item.width,
        item.height,
    )
}

// ============================================================================
// Coords
// ============================================================================

/// A 2D translate + scale transform, the unit a FLIP animation tweens.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coords {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Coords {
    fn default() -> Self { Self::IDENTITY }
}

impl Coords {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Creates a new transform.
    #[must_use]
    pub const fn new(translate_x: f64, translate_y: f64, scale_x: f64, scale_y: f64) -> Self {
        Self { translate_x, translate_y, scale_x, scale_y }
    }

    /// Computes the transform that makes an item laid out at `last` appear
    /// at `first`.
    ///
    /// A zero-sized `last` axis keeps a scale of 1 so the result stays finite.
    #[must_use]
    pub fn flip(first: Rect, last: Rect) -> Self {
        Self {
            translate_x: first.x - last.x,
            translate_y: first.y - last.y,
            scale_x: ratio(first.width, last.width),
            scale_y: ratio(first.height, last.height),
        }
    }

    /// Exact identity check.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.scale_x == 1.0 && self.scale_y == 1.0
    }

    /// The scale-only transform that undoes this transform's scale on a
    /// child element.
    #[must_use]
    pub fn inverse_scale(&self) -> Self {
        Self::new(0.0, 0.0, ratio(1.0, self.scale_x), ratio(1.0, self.scale_y))
    }

    /// Interpolates between two transforms at progress `t`.
    ///
    /// `t` is not clamped: overshooting curves such as `backOut` rely on it.
    #[must_use]
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale_x: lerp(self.scale_x, to.scale_x, t),
            scale_y: lerp(self.scale_y, to.scale_y, t),
        }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translateX({}px) translateY({}px) scaleX({}) scaleY({})",
            self.translate_x, self.translate_y, self.scale_x, self.scale_y
        )
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 1.0 } else { numerator / denominator }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_relative_subtracts_origin() {
        let container = Rect::new(100.0, 50.0, 800.0, 600.0);
        let item = Rect::new(150.0, 80.0, 100.0, 40.0);
        assert_eq!(container_relative(container, item), Rect::new(50.0, 30.0, 100.0, 40.0));
    }

    #[test]
    fn test_container_relative_clamps_hidden_items() {
        // A hidden item reports (0, 0) in viewport space.
        let container = Rect::new(100.0, 50.0, 800.0, 600.0);
        let hidden = Rect::new(0.0, 0.0, 0.0, 0.0);
        let rel = container_relative(container, hidden);
        assert!((rel.x - 0.0).abs() < f64::EPSILON);
        assert!((rel.y - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_geometry_is_exact() {
        let a = Rect::new(10.0, 10.0, 100.0, 100.0);
        assert!(a.same_geometry(&a));
        assert!(!a.same_geometry(&Rect::new(10.0, 10.0, 100.0, 100.5)));
        assert!(!a.same_geometry(&a.translated(0.25, 0.0)));
    }

    #[test]
    fn test_flip_move_right() {
        let first = Rect::new(0.0, 0.0, 100.0, 100.0);
        let last = Rect::new(200.0, 0.0, 100.0, 100.0);
        assert_eq!(Coords::flip(first, last), Coords::new(-200.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_flip_scale_ratio() {
        let first = Rect::new(0.0, 0.0, 200.0, 50.0);
        let last = Rect::new(0.0, 0.0, 100.0, 100.0);
        let coords = Coords::flip(first, last);
        assert!((coords.scale_x - 2.0).abs() < f64::EPSILON);
        assert!((coords.scale_y - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flip_zero_size_keeps_scale_finite() {
        let coords = Coords::flip(Rect::new(0.0, 0.0, 100.0, 100.0), Rect::zero());
        assert!(coords.scale_x.is_finite());
        assert!((coords.scale_y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identity() {
        assert!(Coords::IDENTITY.is_identity());
        assert!(Coords::default().is_identity());
        assert!(!Coords::new(0.0, 0.0, 1.0, 1.01).is_identity());
    }

    #[test]
    fn test_inverse_scale() {
        let inverse = Coords::new(30.0, 40.0, 2.0, 0.5).inverse_scale();
        assert_eq!(inverse, Coords::new(0.0, 0.0, 0.5, 2.0));
    }

    #[test]
    fn test_interpolate() {
        let from = Coords::new(-200.0, 100.0, 2.0, 1.0);
        let half = from.interpolate(&Coords::IDENTITY, 0.5);
        assert_eq!(half, Coords::new(-100.0, 50.0, 1.5, 1.0));
        assert!(from.interpolate(&Coords::IDENTITY, 1.0).is_identity());
    }

    #[test]
    fn test_css_display() {
        let coords = Coords::new(-200.0, 0.0, 1.5, 1.0);
        assert_eq!(coords.to_string(), "translateX(-200px) translateY(0px) scaleX(1.5) scaleY(1)");
    }
}
