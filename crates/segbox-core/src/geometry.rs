#![forbid(unsafe_code)]

//! Geometric primitives in client coordinates.
//!
//! Pointer streams report positions in client space (floating point, origin at
//! the top-left of the viewport). Bounds queries answer in the same space, so
//! every helper here works on `f64`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A rectangle for node bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Boundary-exclusive containment: points on an edge are outside.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.x < point.x && point.x < self.right() && self.y < point.y && point.y < self.bottom()
    }

    /// Clamp a local point into `[0, width] x [0, height]`.
    #[inline]
    pub fn clamp_local(&self, local: Point) -> Point {
        Point::new(
            local.x.min(self.width).max(0.0),
            local.y.min(self.height).max(0.0),
        )
    }
}

/// Pointer position relative to the top-left corner of `bounds`.
///
/// With `clamp`, both coordinates are floored and clamped into
/// `[0, width] x [0, height]`. Without it the raw offset is returned, which
/// may be negative or exceed the extent.
#[must_use]
pub fn local_position(bounds: Rect, pointer: Point, clamp: bool) -> Point {
    let local = Point::new(pointer.x - bounds.x, pointer.y - bounds.y);
    if !clamp {
        return local;
    }
    let clamped = bounds.clamp_local(local);
    Point::new(clamped.x.floor(), clamped.y.floor())
}

/// Boundary-exclusive point-in-rectangle test.
#[inline]
#[must_use]
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    rect.contains(point)
}
