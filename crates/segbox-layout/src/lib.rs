#![forbid(unsafe_code)]

//! Partition tree, persisted layouts, grid geometry and gesture machines.

pub mod gesture;
pub mod grid;
pub mod leaves;
pub mod partition;
pub mod snapshot;

pub use gesture::{
    Affordance, DEFAULT_MIN_SIZE, DiscardReason, GestureEffect, GestureError, GestureKind,
    GestureNoopReason, GesturePhase, GestureTransition, ResizeGesture, ResizeState,
    SegmentGesture, SegmentPreview, SegmentState,
};
pub use grid::{GridBounds, GridHint, GridTrack, NodeBounds, SolvedLayout};
pub use leaves::{LeafDescriptor, collect_leaves};
pub use partition::{
    DEFAULT_ROOT_NAME, NodeId, PartitionError, PartitionKind, PartitionNode, PartitionSplit,
    PartitionTree, SplitAxis,
};
pub use segbox_core::geometry::{Point, Rect};
pub use snapshot::{
    FallbackReason, HydrationFallback, HydrationReport, LayoutAxis, LayoutParseError,
    LayoutSnapshot,
};
