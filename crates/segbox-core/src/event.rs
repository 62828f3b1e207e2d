#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Mouse and touch input are normalized into one coordinate stream. A touch
//! `touchend`/`touchcancel` and a mouse button release all end a gesture the
//! same way, so the only distinction kept is the [`PointerSource`] tag for
//! diagnostics.

use crate::geometry::Point;

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer pressed on an affordance.
    Down,

    /// Pointer moved (mousemove / touchmove).
    Move,

    /// Pointer released (mouseup / touchend).
    Up,

    /// The platform aborted the pointer stream (touchcancel).
    Cancel,
}

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Client-space X coordinate.
    pub x: f64,

    /// Client-space Y coordinate.
    pub y: f64,

    /// Device that produced the event.
    pub source: PointerSource,
}

impl PointerEvent {
    /// Create a new mouse pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            source: PointerSource::Mouse,
        }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    #[must_use]
    pub const fn cancel(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Cancel, x, y)
    }

    /// Tag the event with its source device.
    #[must_use]
    pub const fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    /// Get the position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether this event ends the pointer stream (release or cancel).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}
