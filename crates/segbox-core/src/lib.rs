#![forbid(unsafe_code)]

//! Core: geometry, pointer events, and the logging facade.
//!
//! # Role in SegBox
//! `segbox-core` is the input layer. It owns the client-space geometry helpers
//! (local pointer positions, clamping, boundary-exclusive hit tests) and the
//! normalized pointer event that the gesture machines in `segbox-layout`
//! consume.
//!
//! # How it fits in the system
//! `segbox-layout` builds the partition tree and gesture machines on top of
//! these types; `segbox-runtime` feeds host pointer streams into them.

pub mod event;
pub mod geometry;
pub mod logging;

pub use event::{PointerEvent, PointerEventKind, PointerSource};
pub use geometry::{Point, Rect, local_position, point_in_rect};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
