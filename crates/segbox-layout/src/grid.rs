//! Grid hints and solved geometry.
//!
//! A split renders as a three-track grid: the leading pane at a fixed pixel
//! size, an `auto` track holding the divider, and a `1fr` trailing pane.
//! [`GridHint`] describes that template for hosts that lay out with CSS grid;
//! [`PartitionTree::solve_layout`] computes the same geometry directly for
//! hosts that need rectangles.

use std::collections::BTreeMap;
use std::fmt;

use segbox_core::geometry::{Point, Rect};

use crate::partition::{NodeId, PartitionNode, PartitionTree, SplitAxis};

/// One grid track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTrack {
    Px(f64),
    Auto,
    Fr(u16),
}

impl fmt::Display for GridTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Auto => f.write_str("auto"),
            Self::Fr(fr) => write!(f, "{fr}fr"),
        }
    }
}

/// Grid template for a split node (or a split preview).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridHint {
    pub axis: SplitAxis,
    pub tracks: [GridTrack; 3],
    /// Gap between tracks, in pixels.
    pub gap: f64,
}

impl GridHint {
    /// Hint for a split along `axis` at `offset`.
    #[must_use]
    pub fn for_split(axis: SplitAxis, offset: Point, gap: f64) -> Self {
        Self {
            axis,
            tracks: [
                GridTrack::Px(axis.component(offset)),
                GridTrack::Auto,
                GridTrack::Fr(1),
            ],
            gap,
        }
    }

    /// Hint for an existing node; `None` for leaves.
    #[must_use]
    pub fn for_node(node: &PartitionNode, gap: f64) -> Option<Self> {
        let split = node.split()?;
        Some(Self::for_split(split.axis, split.offset, gap))
    }

    /// CSS property the tracks belong to.
    #[must_use]
    pub const fn template_property(&self) -> &'static str {
        match self.axis {
            SplitAxis::Horizontal => "grid-template-columns",
            SplitAxis::Vertical => "grid-template-rows",
        }
    }

    /// Track list, e.g. `120px auto 1fr`.
    #[must_use]
    pub fn template(&self) -> String {
        let [a, b, c] = self.tracks;
        format!("{a} {b} {c}")
    }
}

impl fmt::Display for GridHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "display: grid; {}: {}; gap: {}px;",
            self.template_property(),
            self.template(),
            self.gap
        )
    }
}

/// Source of client-space bounds for nodes.
///
/// Gestures query bounds through this seam so they work both against solved
/// geometry and against bounds reported by a host renderer.
pub trait NodeBounds {
    fn node_bounds(&self, tree: &PartitionTree, node: NodeId) -> Option<Rect>;
}

impl<T: NodeBounds + ?Sized> NodeBounds for &T {
    fn node_bounds(&self, tree: &PartitionTree, node: NodeId) -> Option<Rect> {
        (**self).node_bounds(tree, node)
    }
}

/// Solves node bounds on demand from a root area and a divider gutter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub area: Rect,
    /// Width of the divider track between two panes.
    pub gutter: f64,
}

impl GridBounds {
    #[must_use]
    pub const fn new(area: Rect, gutter: f64) -> Self {
        Self { area, gutter }
    }
}

impl NodeBounds for GridBounds {
    fn node_bounds(&self, tree: &PartitionTree, node: NodeId) -> Option<Rect> {
        tree.node_rect(self.area, self.gutter, node)
    }
}

/// Rectangles for every node plus the divider of every split.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedLayout {
    area: Rect,
    rects: BTreeMap<NodeId, Rect>,
    dividers: BTreeMap<NodeId, Rect>,
}

impl SolvedLayout {
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    #[must_use]
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }

    /// Divider track of split `node`.
    #[must_use]
    pub fn divider(&self, node: NodeId) -> Option<Rect> {
        self.dividers.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Rect)> + '_ {
        self.rects.iter().map(|(id, rect)| (*id, *rect))
    }

    /// Leaf under `point`, if any.
    #[must_use]
    pub fn leaf_at(&self, tree: &PartitionTree, point: Point) -> Option<NodeId> {
        self.rects
            .iter()
            .filter(|(id, _)| tree.node(**id).is_some_and(PartitionNode::is_leaf))
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    /// Split whose divider is under `point`. Deeper dividers win.
    #[must_use]
    pub fn divider_at(&self, point: Point) -> Option<NodeId> {
        self.dividers
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }
}

impl NodeBounds for SolvedLayout {
    fn node_bounds(&self, _tree: &PartitionTree, node: NodeId) -> Option<Rect> {
        self.rect(node)
    }
}

/// Carve `area` into leading pane, divider and trailing pane.
fn split_rects(area: Rect, axis: SplitAxis, offset: Point, gutter: f64) -> [Rect; 3] {
    let extent = axis.extent(area).max(0.0);
    let lead = axis.component(offset).clamp(0.0, extent);
    let gutter = gutter.max(0.0).min(extent - lead);
    let trail = (extent - lead - gutter).max(0.0);
    match axis {
        SplitAxis::Horizontal => [
            Rect::new(area.x, area.y, lead, area.height),
            Rect::new(area.x + lead, area.y, gutter, area.height),
            Rect::new(area.x + lead + gutter, area.y, trail, area.height),
        ],
        SplitAxis::Vertical => [
            Rect::new(area.x, area.y, area.width, lead),
            Rect::new(area.x, area.y + lead, area.width, gutter),
            Rect::new(area.x, area.y + lead + gutter, area.width, trail),
        ],
    }
}

impl PartitionTree {
    /// Solve every node's rectangle inside `area`.
    #[must_use]
    pub fn solve_layout(&self, area: Rect, gutter: f64) -> SolvedLayout {
        let mut solved = SolvedLayout {
            area,
            rects: BTreeMap::new(),
            dividers: BTreeMap::new(),
        };
        let mut stack = vec![(self.root(), area)];
        while let Some((id, rect)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let _ = solved.rects.insert(id, rect);
            if let Some(split) = node.split() {
                let [lead, divider, trail] = split_rects(rect, split.axis, split.offset, gutter);
                let _ = solved.dividers.insert(id, divider);
                stack.push((split.second, trail));
                stack.push((split.first, lead));
            }
        }
        solved
    }

    /// Rectangle of a single node, walking only its ancestor chain.
    #[must_use]
    pub fn node_rect(&self, area: Rect, gutter: f64, node: NodeId) -> Option<Rect> {
        let mut chain = vec![node];
        let mut cursor = node;
        while let Some(parent) = self.parent(cursor) {
            chain.push(parent);
            cursor = parent;
        }
        if cursor != self.root() || self.node(node).is_none() {
            return None;
        }

        let mut rect = area;
        for pair in chain.windows(2).rev() {
            let [child, parent] = [pair[0], pair[1]];
            let split = self.node(parent)?.split()?;
            let [lead, _, trail] = split_rects(rect, split.axis, split.offset, gutter);
            rect = if split.first == child { lead } else { trail };
        }
        Some(rect)
    }
}
