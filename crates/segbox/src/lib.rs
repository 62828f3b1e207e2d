#![forbid(unsafe_code)]

//! SegBox public facade crate.
//!
//! A SegBox is a rectangular region the user recursively partitions with
//! pointer gestures: drag a leaf's handle to split it, drag a divider to
//! resize, drag out of a pane into its parent to merge. This crate re-exports
//! the stable surface of the internal crates and offers a prelude.
//!
//! ```
//! use segbox::prelude::*;
//!
//! let mut seg = SegBox::new(SegBoxConfig::default(), Rect::from_size(200.0, 200.0))?;
//! let root = seg.tree().root();
//! let now = Instant::now();
//! seg.pointer_down(Affordance::Handle(root), &PointerEvent::down(50.0, 50.0), now)?;
//! seg.pointer(&PointerEvent::moved(100.0, 50.0), now);
//! seg.pointer(&PointerEvent::up(100.0, 50.0), now);
//! assert!(seg.is_split(root));
//! # Ok::<(), segbox::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use segbox_core::event::{PointerEvent, PointerEventKind, PointerSource};
pub use segbox_core::geometry::{Point, Rect, local_position, point_in_rect};
#[cfg(feature = "tracing-json")]
pub use segbox_core::logging::{LoggingInitError, init_json_subscriber};

// --- Layout re-exports -----------------------------------------------------

pub use segbox_layout::{
    Affordance, GestureEffect, GestureError, GestureKind, GestureTransition, GridBounds, GridHint,
    HydrationReport, LayoutParseError, LayoutSnapshot, LeafDescriptor, NodeBounds, NodeId,
    PartitionError, PartitionNode, PartitionTree, SegmentPreview, SolvedLayout, SplitAxis,
};

// --- Runtime re-exports ----------------------------------------------------

pub use segbox_runtime::{
    ConfigError, FileStorage, LeafNotification, ListenerId, MemoryStorage, SegBox, SegBoxConfig,
    StorageBackend, StorageError,
};
pub use segbox_runtime::{Duration, Instant};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for SegBox hosts.
#[derive(Debug)]
pub enum Error {
    Partition(PartitionError),
    Gesture(GestureError),
    LayoutParse(LayoutParseError),
    Storage(StorageError),
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partition(err) => write!(f, "{err}"),
            Self::Gesture(err) => write!(f, "{err}"),
            Self::LayoutParse(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Partition(err) => Some(err),
            Self::Gesture(err) => Some(err),
            Self::LayoutParse(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<PartitionError> for Error {
    fn from(err: PartitionError) -> Self {
        Self::Partition(err)
    }
}

impl From<GestureError> for Error {
    fn from(err: GestureError) -> Self {
        Self::Gesture(err)
    }
}

impl From<LayoutParseError> for Error {
    fn from(err: LayoutParseError) -> Self {
        Self::LayoutParse(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for SegBox APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Affordance, Error, GestureEffect, Instant, LeafNotification, NodeId, Point, PointerEvent,
        Rect, Result, SegBox, SegBoxConfig, SplitAxis,
    };
    pub use crate::{core, layout, runtime};
}

pub use segbox_core as core;
pub use segbox_layout as layout;
pub use segbox_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_keep_source() {
        let err: Error = PartitionError::ZeroNodeId.into();
        assert_eq!(err.to_string(), "node id 0 is reserved");
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = LayoutSnapshot::from_json_str("nope")
            .expect_err("not json")
            .into();
        assert!(matches!(err, Error::LayoutParse(_)));
    }

    #[test]
    fn question_mark_lifts_library_errors() {
        fn restore(json: &str) -> Result<PartitionTree> {
            let layout = LayoutSnapshot::from_json_str(json)?;
            Ok(PartitionTree::from_layout("0", &layout).0)
        }
        assert!(restore(r#"{"name":"0","leaf":true}"#).is_ok());
        assert!(matches!(restore("[]"), Err(Error::LayoutParse(_))));
    }
}
