//! Segment and resize gesture state machines.
//!
//! # Segment
//!
//! A segment gesture starts on a leaf's handle. While the pointer moves, the
//! dominant axis of the drag (measured from the press point) becomes the
//! proposed split axis and the clamped pointer position becomes the proposed
//! offset. The proposal lives in the machine, not in the tree, so the tree is
//! untouched until the gesture ends.
//!
//! If the leaf has a parent, every move also decides whether the drag asks to
//! merge: the pointer has left the leaf but is still inside the parent. While
//! merge is pending no offset is proposed.
//!
//! # Resize
//!
//! A resize gesture starts on a split's divider and moves the divider with the
//! pointer, pinned to the split axis. It mutates the tree live.
//!
//! # Settling
//!
//! Both gestures end through the same rule:
//!
//! 1. A proposal closer than `min_size` to its reference point is discarded.
//!    For segments the reference is the press point; for resizes it is the
//!    node's top-left corner, and the trailing pane (what is left after the
//!    divider track) must also be at least `min_size` wide. A discarded resize collapses the split.
//! 2. If the parent is flagged for merge, the parent collapses, destroying
//!    the dragged node.
//!
//! Transitions carry a monotonically increasing `transition_id` per machine,
//! so a host can order and deduplicate effects.

use std::fmt;

use segbox_core::event::PointerEvent;
use segbox_core::geometry::{Point, local_position, point_in_rect};
use segbox_core::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::grid::NodeBounds;
use crate::partition::{NodeId, PartitionError, PartitionTree, SplitAxis};

/// Smallest pane extent a gesture may leave behind, in pixels.
pub const DEFAULT_MIN_SIZE: f64 = 36.0;

/// Which machine produced a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Segment,
    Resize,
}

/// Pointer affordance a gesture starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "affordance", content = "node", rename_all = "snake_case")]
pub enum Affordance {
    /// Segment handle on a leaf.
    Handle(NodeId),
    /// Divider of a split.
    Divider(NodeId),
}

impl Affordance {
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            Self::Handle(node) | Self::Divider(node) => node,
        }
    }

    #[must_use]
    pub const fn kind(self) -> GestureKind {
        match self {
            Self::Handle(_) => GestureKind::Segment,
            Self::Divider(_) => GestureKind::Resize,
        }
    }
}

/// Coarse lifecycle phase shared by both machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Idle,
    /// Segment gesture tracking the pointer.
    Dragging,
    /// Resize gesture holding a divider.
    Active,
}

/// Segment machine state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SegmentState {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
        parent: Option<NodeId>,
        /// Clamped press position in the node's local space.
        origin: Point,
        axis: Option<SplitAxis>,
        offset: Option<Point>,
        merge_pending: bool,
    },
}

impl SegmentState {
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        match self {
            Self::Idle => GesturePhase::Idle,
            Self::Dragging { .. } => GesturePhase::Dragging,
        }
    }
}

/// Resize machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResizeState {
    #[default]
    Idle,
    Active { node: NodeId },
}

impl ResizeState {
    #[must_use]
    pub const fn phase(&self) -> GesturePhase {
        match self {
            Self::Idle => GesturePhase::Idle,
            Self::Active { .. } => GesturePhase::Active,
        }
    }
}

/// Live proposal of an active segment gesture, for preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPreview {
    pub node: NodeId,
    pub axis: SplitAxis,
    pub offset: Option<Point>,
    pub merge_pending: bool,
}

/// Why an input produced no state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureNoopReason {
    IdleWithoutActiveGesture,
    GestureAlreadyActive,
    BoundsUnavailable,
}

/// Why a gesture ended without keeping its proposal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiscardReason {
    /// The pointer never moved far enough to propose anything.
    NoProposal,
    /// The proposal left a pane thinner than the minimum.
    BelowMinimum { extent: f64 },
    /// The host aborted the gesture.
    ForceCancelled,
}

/// Outcome of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum GestureEffect {
    SegmentStarted {
        node: NodeId,
        origin: Point,
    },
    Proposed {
        node: NodeId,
        axis: SplitAxis,
        offset: Option<Point>,
        merge_pending: bool,
    },
    ResizeStarted {
        node: NodeId,
    },
    Resized {
        node: NodeId,
        offset: Point,
    },
    /// The proposal stands. For segments the caller performs the split.
    Committed {
        node: NodeId,
        axis: SplitAxis,
        offset: Point,
    },
    Discarded {
        node: NodeId,
        reason: DiscardReason,
        /// A split node was folded back into a leaf.
        collapsed: bool,
    },
    /// `parent` collapsed because `source` was dragged out into it.
    Merged {
        parent: NodeId,
        source: NodeId,
    },
    Noop {
        reason: GestureNoopReason,
    },
}

impl GestureEffect {
    /// Whether the effect changed the tree (or asks the caller to).
    #[must_use]
    pub const fn changes_tree(&self) -> bool {
        match self {
            Self::Committed { .. } | Self::Merged { .. } | Self::Resized { .. } => true,
            Self::Discarded { collapsed, .. } => *collapsed,
            _ => false,
        }
    }
}

/// One recorded state transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureTransition {
    pub transition_id: u64,
    pub kind: GestureKind,
    pub from: GesturePhase,
    pub to: GesturePhase,
    pub effect: GestureEffect,
}

/// Errors that prevent a gesture from starting.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureError {
    InvalidMinSize { min_size: f64 },
    BoundsUnavailable { node: NodeId },
    Partition(PartitionError),
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMinSize { min_size } => {
                write!(f, "min size must be finite and non-negative, got {min_size}")
            }
            Self::BoundsUnavailable { node } => write!(f, "no bounds available for node {node}"),
            Self::Partition(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for GestureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Partition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PartitionError> for GestureError {
    fn from(err: PartitionError) -> Self {
        Self::Partition(err)
    }
}

fn check_min_size(min_size: f64) -> Result<f64, GestureError> {
    if min_size.is_finite() && min_size >= 0.0 {
        Ok(min_size)
    } else {
        Err(GestureError::InvalidMinSize { min_size })
    }
}

/// Verdict of the shared end-of-gesture threshold.
enum Verdict {
    Keep { axis: SplitAxis, offset: Point },
    Drop(DiscardReason),
}

/// Apply the end-of-gesture rule shared by segment and resize.
///
/// `reference` is the point the proposal is measured from. When the trailing
/// pane's extent is known, it must also clear `min_size`.
fn settle(
    tree: &mut PartitionTree,
    node: NodeId,
    min_size: f64,
    reference: Point,
    proposal: Option<(SplitAxis, Point)>,
    trail: Option<f64>,
) -> GestureEffect {
    let verdict = match proposal {
        None => Verdict::Drop(DiscardReason::NoProposal),
        Some((axis, offset)) => {
            let lead = (axis.component(reference) - axis.component(offset)).abs();
            if lead < min_size {
                Verdict::Drop(DiscardReason::BelowMinimum { extent: lead })
            } else if let Some(trail) = trail.filter(|trail| *trail < min_size) {
                Verdict::Drop(DiscardReason::BelowMinimum { extent: trail })
            } else {
                Verdict::Keep { axis, offset }
            }
        }
    };

    let merge_parent = tree
        .parent(node)
        .filter(|parent| tree.node(*parent).is_some_and(|p| p.merge_pending()));
    if let Some(parent) = merge_parent {
        if tree.collapse(parent).is_ok() {
            debug!(parent = %parent, source = %node, "merged parent split");
            return GestureEffect::Merged {
                parent,
                source: node,
            };
        }
    }

    match verdict {
        Verdict::Keep { axis, offset } => GestureEffect::Committed { node, axis, offset },
        Verdict::Drop(reason) => {
            let collapsed =
                tree.node(node).is_some_and(|n| n.is_split()) && tree.collapse(node).is_ok();
            debug!(node = %node, ?reason, collapsed, "discarded gesture proposal");
            GestureEffect::Discarded {
                node,
                reason,
                collapsed,
            }
        }
    }
}

/// Segment gesture machine.
#[derive(Debug, Clone)]
pub struct SegmentGesture {
    state: SegmentState,
    min_size: f64,
    transition_counter: u64,
}

impl Default for SegmentGesture {
    fn default() -> Self {
        Self {
            state: SegmentState::Idle,
            min_size: DEFAULT_MIN_SIZE,
            transition_counter: 0,
        }
    }
}

impl SegmentGesture {
    pub fn new(min_size: f64) -> Result<Self, GestureError> {
        Ok(Self {
            min_size: check_min_size(min_size)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn state(&self) -> SegmentState {
        self.state
    }

    #[must_use]
    pub const fn min_size(&self) -> f64 {
        self.min_size
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SegmentState::Dragging { .. })
    }

    /// Current proposal, once the pointer has moved.
    #[must_use]
    pub fn preview(&self) -> Option<SegmentPreview> {
        match self.state {
            SegmentState::Dragging {
                node,
                axis: Some(axis),
                offset,
                merge_pending,
                ..
            } => Some(SegmentPreview {
                node,
                axis,
                offset,
                merge_pending,
            }),
            _ => None,
        }
    }

    /// Press on `node`'s handle.
    pub fn start<B: NodeBounds + ?Sized>(
        &mut self,
        tree: &PartitionTree,
        bounds: &B,
        node: NodeId,
        event: &PointerEvent,
    ) -> Result<GestureTransition, GestureError> {
        if self.is_active() {
            return Ok(self.noop(GestureNoopReason::GestureAlreadyActive));
        }
        let entry = tree
            .node(node)
            .ok_or(PartitionError::MissingNode { node_id: node })?;
        if !entry.is_leaf() {
            return Err(PartitionError::NodeNotLeaf { node_id: node }.into());
        }
        let rect = bounds
            .node_bounds(tree, node)
            .ok_or(GestureError::BoundsUnavailable { node })?;
        let origin = local_position(rect, event.position(), true);
        let from = self.state.phase();
        self.state = SegmentState::Dragging {
            node,
            parent: entry.parent,
            origin,
            axis: None,
            offset: None,
            merge_pending: false,
        };
        debug!(node = %node, x = origin.x, y = origin.y, "segment gesture started");
        Ok(self.transition(from, GestureEffect::SegmentStarted { node, origin }))
    }

    /// Pointer move while dragging.
    pub fn update<B: NodeBounds + ?Sized>(
        &mut self,
        tree: &mut PartitionTree,
        bounds: &B,
        event: &PointerEvent,
    ) -> GestureTransition {
        let SegmentState::Dragging {
            node,
            parent,
            origin,
            ..
        } = self.state
        else {
            return self.noop(GestureNoopReason::IdleWithoutActiveGesture);
        };
        let Some(rect) = bounds.node_bounds(tree, node) else {
            return self.noop(GestureNoopReason::BoundsUnavailable);
        };

        let pointer = event.position();
        let local = local_position(rect, pointer, true);
        let axis = SplitAxis::from_drag(origin.x - local.x, origin.y - local.y);

        let merge_pending = parent.is_some_and(|parent| {
            let inside_parent = bounds
                .node_bounds(tree, parent)
                .is_some_and(|parent_rect| point_in_rect(pointer, parent_rect));
            let merge = !point_in_rect(pointer, rect) && inside_parent;
            let _ = tree.set_merging(parent, merge);
            merge
        });
        let offset = (!merge_pending).then_some(local);

        self.state = SegmentState::Dragging {
            node,
            parent,
            origin,
            axis: Some(axis),
            offset,
            merge_pending,
        };
        trace!(node = %node, ?axis, ?offset, merge_pending, "segment proposal");
        self.transition(
            GesturePhase::Dragging,
            GestureEffect::Proposed {
                node,
                axis,
                offset,
                merge_pending,
            },
        )
    }

    /// Release (or platform cancel). Always returns the machine to idle.
    pub fn end(&mut self, tree: &mut PartitionTree) -> GestureTransition {
        let SegmentState::Dragging {
            node,
            origin,
            axis,
            offset,
            ..
        } = self.state
        else {
            return self.noop(GestureNoopReason::IdleWithoutActiveGesture);
        };
        self.state = SegmentState::Idle;
        let proposal = axis.zip(offset);
        let effect = settle(tree, node, self.min_size, origin, proposal, None);
        self.transition(GesturePhase::Dragging, effect)
    }

    /// Abort without committing anything and clear any pending merge.
    ///
    /// Returns `None` when idle.
    pub fn force_cancel(&mut self, tree: &mut PartitionTree) -> Option<GestureTransition> {
        let SegmentState::Dragging { node, parent, .. } = self.state else {
            return None;
        };
        self.state = SegmentState::Idle;
        if let Some(parent) = parent {
            let _ = tree.set_merging(parent, false);
        }
        debug!(node = %node, "segment gesture force-cancelled");
        Some(self.transition(
            GesturePhase::Dragging,
            GestureEffect::Discarded {
                node,
                reason: DiscardReason::ForceCancelled,
                collapsed: false,
            },
        ))
    }

    fn noop(&mut self, reason: GestureNoopReason) -> GestureTransition {
        let phase = self.state.phase();
        self.transition(phase, GestureEffect::Noop { reason })
    }

    fn transition(&mut self, from: GesturePhase, effect: GestureEffect) -> GestureTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        GestureTransition {
            transition_id: self.transition_counter,
            kind: GestureKind::Segment,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}

/// Resize gesture machine.
#[derive(Debug, Clone)]
pub struct ResizeGesture {
    state: ResizeState,
    min_size: f64,
    transition_counter: u64,
}

impl Default for ResizeGesture {
    fn default() -> Self {
        Self {
            state: ResizeState::Idle,
            min_size: DEFAULT_MIN_SIZE,
            transition_counter: 0,
        }
    }
}

impl ResizeGesture {
    pub fn new(min_size: f64) -> Result<Self, GestureError> {
        Ok(Self {
            min_size: check_min_size(min_size)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub const fn state(&self) -> ResizeState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Active { .. })
    }

    /// Press on split `node`'s divider.
    pub fn start(
        &mut self,
        tree: &PartitionTree,
        node: NodeId,
    ) -> Result<GestureTransition, GestureError> {
        if self.is_active() {
            return Ok(self.noop(GestureNoopReason::GestureAlreadyActive));
        }
        let entry = tree
            .node(node)
            .ok_or(PartitionError::MissingNode { node_id: node })?;
        if !entry.is_split() {
            return Err(PartitionError::NodeNotSplit { node_id: node }.into());
        }
        self.state = ResizeState::Active { node };
        debug!(node = %node, "resize gesture started");
        Ok(self.transition(GesturePhase::Idle, GestureEffect::ResizeStarted { node }))
    }

    /// Pointer move while dragging: move the divider, pinned to the axis.
    pub fn update<B: NodeBounds + ?Sized>(
        &mut self,
        tree: &mut PartitionTree,
        bounds: &B,
        event: &PointerEvent,
    ) -> GestureTransition {
        let ResizeState::Active { node } = self.state else {
            return self.noop(GestureNoopReason::IdleWithoutActiveGesture);
        };
        let (Some(rect), Some(axis)) = (
            bounds.node_bounds(tree, node),
            tree.node(node).and_then(|n| n.axis()),
        ) else {
            return self.noop(GestureNoopReason::BoundsUnavailable);
        };
        let offset = axis.pinned(local_position(rect, event.position(), true));
        if tree.set_offset(node, offset).is_err() {
            return self.noop(GestureNoopReason::BoundsUnavailable);
        }
        trace!(node = %node, x = offset.x, y = offset.y, "divider moved");
        self.transition(GesturePhase::Active, GestureEffect::Resized { node, offset })
    }

    /// Release: collapse the split if either pane ended up undersized.
    pub fn end<B: NodeBounds + ?Sized>(
        &mut self,
        tree: &mut PartitionTree,
        bounds: &B,
    ) -> GestureTransition {
        let ResizeState::Active { node } = self.state else {
            return self.noop(GestureNoopReason::IdleWithoutActiveGesture);
        };
        self.state = ResizeState::Idle;
        let split = tree.node(node).and_then(|n| n.split()).copied();
        let proposal = split.map(|split| (split.axis, split.offset));
        // Trailing pane as laid out, after the divider track.
        let trail = split.and_then(|split| {
            bounds
                .node_bounds(tree, split.second)
                .map(|rect| split.axis.extent(rect))
        });
        let effect = settle(tree, node, self.min_size, Point::ORIGIN, proposal, trail);
        self.transition(GesturePhase::Active, effect)
    }

    /// Abort, leaving the divider where it is.
    pub fn force_cancel(&mut self) -> Option<GestureTransition> {
        let ResizeState::Active { node } = self.state else {
            return None;
        };
        self.state = ResizeState::Idle;
        Some(self.transition(
            GesturePhase::Active,
            GestureEffect::Discarded {
                node,
                reason: DiscardReason::ForceCancelled,
                collapsed: false,
            },
        ))
    }

    fn noop(&mut self, reason: GestureNoopReason) -> GestureTransition {
        let phase = self.state.phase();
        self.transition(phase, GestureEffect::Noop { reason })
    }

    fn transition(&mut self, from: GesturePhase, effect: GestureEffect) -> GestureTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        GestureTransition {
            transition_id: self.transition_counter,
            kind: GestureKind::Resize,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}
