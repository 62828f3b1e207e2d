//! Binary partition tree model.
//!
//! A [`PartitionTree`] is an arena of [`PartitionNode`]s keyed by [`NodeId`].
//! Ownership flows strictly root-to-leaf: a split node names its two children
//! by id, and every node carries a non-owning `parent` id used for merge
//! propagation and orientation lookup.
//!
//! Node names encode tree position: the children of `P` are `"{P}.0"` and
//! `"{P}.1"`, so a name is always reconstructible from the path from the
//! root.
//!
//! The only mutation paths are:
//!
//! - [`PartitionTree::split`]: a committed segment gesture turns a leaf into a
//!   split with two fresh leaf children.
//! - [`PartitionTree::set_offset`]: a resize moves an existing divider.
//! - [`PartitionTree::collapse`]: a merge (or an undersized resize) folds a
//!   split back into a leaf, destroying its subtree.
//! - [`PartitionTree::set_merging`]: the transient merge flag toggled by a
//!   child's drag.

use std::collections::BTreeMap;
use std::fmt;

use segbox_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Root identifier used when the host does not configure one.
pub const DEFAULT_ROOT_NAME: &str = "0";

/// Stable identifier for partition nodes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node ID.
    pub const MIN: Self = Self(1);

    /// Create a new node ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, PartitionError> {
        if raw == 0 {
            return Err(PartitionError::ZeroNodeId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, PartitionError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(PartitionError::NodeIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Orientation of a split node.
///
/// `Horizontal` lays the children side by side (slot 0 left, slot 1 right);
/// the divider position is the offset's `x`. `Vertical` stacks them (slot 0
/// top, slot 1 bottom); the divider position is the offset's `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

impl SplitAxis {
    /// Dominant axis of a drag delta. Ties resolve to `Vertical`.
    #[must_use]
    pub fn from_drag(dx: f64, dy: f64) -> Self {
        if dx.abs() > dy.abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// The component of `point` that is meaningful along this axis.
    #[must_use]
    pub const fn component(self, point: Point) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    /// Keep the component along this axis and zero the orthogonal one.
    #[must_use]
    pub const fn pinned(self, point: Point) -> Point {
        match self {
            Self::Horizontal => Point::new(point.x, 0.0),
            Self::Vertical => Point::new(0.0, point.y),
        }
    }

    /// Size of `rect` along this axis.
    #[must_use]
    pub const fn extent(self, rect: Rect) -> f64 {
        match self {
            Self::Horizontal => rect.width,
            Self::Vertical => rect.height,
        }
    }

    /// Template slot that seeds `child_slot` when restoring a saved layout.
    ///
    /// Horizontal splits map straight through; vertical splits swap the two
    /// slots. The mapping is its own inverse.
    #[must_use]
    pub const fn template_slot(self, child_slot: usize) -> usize {
        match self {
            Self::Horizontal => child_slot,
            Self::Vertical => 1 - child_slot,
        }
    }
}

/// Split payload: axis, divider offset, and the two owned children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartitionSplit {
    pub axis: SplitAxis,
    /// Divider position in the node's local space. Only the component along
    /// `axis` is meaningful.
    pub offset: Point,
    pub first: NodeId,
    pub second: NodeId,
    /// Set while a child's drag has left the child but stays inside this node.
    #[serde(default)]
    pub merging: bool,
}

impl PartitionSplit {
    /// Children in slot order.
    #[must_use]
    pub const fn children(&self) -> [NodeId; 2] {
        [self.first, self.second]
    }
}

/// Node payload variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionKind {
    Leaf,
    Split(PartitionSplit),
}

/// One node of the partition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionNode {
    pub id: NodeId,
    /// Hierarchical path name, unique within the tree.
    pub name: String,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(flatten)]
    pub kind: PartitionKind,
}

impl PartitionNode {
    fn leaf(id: NodeId, name: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name,
            parent,
            kind: PartitionKind::Leaf,
        }
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, PartitionKind::Leaf)
    }

    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self.kind, PartitionKind::Split(_))
    }

    /// Split payload, if any.
    #[must_use]
    pub const fn split(&self) -> Option<&PartitionSplit> {
        match &self.kind {
            PartitionKind::Split(split) => Some(split),
            PartitionKind::Leaf => None,
        }
    }

    /// Split axis (`None` for leaves).
    #[must_use]
    pub fn axis(&self) -> Option<SplitAxis> {
        self.split().map(|split| split.axis)
    }

    /// Divider offset (`None` for leaves).
    #[must_use]
    pub fn offset(&self) -> Option<Point> {
        self.split().map(|split| split.offset)
    }

    /// Children in slot order (`None` for leaves).
    #[must_use]
    pub fn children(&self) -> Option<[NodeId; 2]> {
        self.split().map(PartitionSplit::children)
    }

    /// Whether a child's drag currently asks to merge this node back.
    #[must_use]
    pub fn merge_pending(&self) -> bool {
        self.split().is_some_and(|split| split.merging)
    }

    /// Name of the child in `slot` (0 or 1).
    #[must_use]
    pub fn child_name(&self, slot: usize) -> String {
        child_name(&self.name, slot)
    }
}

pub(crate) fn child_name(parent: &str, slot: usize) -> String {
    format!("{parent}.{slot}")
}

/// Validated partition tree for runtime usage.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    root: NodeId,
    next_id: NodeId,
    nodes: BTreeMap<NodeId, PartitionNode>,
}

impl Default for PartitionTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl PartitionTree {
    /// Build a tree holding a single root leaf.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = NodeId::MIN;
        let mut nodes = BTreeMap::new();
        let _ = nodes.insert(root, PartitionNode::leaf(root, root_name.into(), None));
        Self {
            root,
            next_id: root.checked_next().unwrap_or(root),
            nodes,
        }
    }

    /// Root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Root node.
    #[must_use]
    pub fn root_node(&self) -> &PartitionNode {
        // The root is inserted at construction and never removed.
        &self.nodes[&self.root]
    }

    /// Root name, which also keys persisted layouts.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_node().name
    }

    /// Lookup a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(&id)
    }

    /// Lookup a node by its path name.
    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<&PartitionNode> {
        self.nodes.values().find(|node| node.name == name)
    }

    /// Parent of `id` (`None` for the root or unknown ids).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Iterate nodes in ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.values()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Turn leaf `id` into a split with two fresh leaf children.
    ///
    /// Returns the children in slot order.
    pub fn split(
        &mut self,
        id: NodeId,
        axis: SplitAxis,
        offset: Point,
    ) -> Result<[NodeId; 2], PartitionError> {
        let name = match self.nodes.get(&id) {
            Some(node) if node.is_leaf() => node.name.clone(),
            Some(_) => return Err(PartitionError::NodeNotLeaf { node_id: id }),
            None => return Err(PartitionError::MissingNode { node_id: id }),
        };
        if !offset.is_finite() {
            return Err(PartitionError::InvalidOffset {
                node_id: id,
                offset,
            });
        }

        let first = self.allocate_id()?;
        let second = self.allocate_id()?;
        let _ = self.nodes.insert(
            first,
            PartitionNode::leaf(first, child_name(&name, 0), Some(id)),
        );
        let _ = self.nodes.insert(
            second,
            PartitionNode::leaf(second, child_name(&name, 1), Some(id)),
        );
        if let Some(node) = self.nodes.get_mut(&id) {
            node.kind = PartitionKind::Split(PartitionSplit {
                axis,
                offset,
                first,
                second,
                merging: false,
            });
        }
        Ok([first, second])
    }

    /// Move the divider of split `id`. Returns the previous offset.
    pub fn set_offset(&mut self, id: NodeId, offset: Point) -> Result<Point, PartitionError> {
        if !offset.is_finite() {
            return Err(PartitionError::InvalidOffset {
                node_id: id,
                offset,
            });
        }
        let split = self.split_mut(id)?;
        Ok(std::mem::replace(&mut split.offset, offset))
    }

    /// Set or clear the merge flag on split `id`. Returns whether it changed.
    pub fn set_merging(&mut self, id: NodeId, merging: bool) -> Result<bool, PartitionError> {
        let split = self.split_mut(id)?;
        let changed = split.merging != merging;
        split.merging = merging;
        Ok(changed)
    }

    /// Fold split `id` back into a leaf, destroying both child subtrees.
    ///
    /// Returns the number of removed nodes.
    pub fn collapse(&mut self, id: NodeId) -> Result<usize, PartitionError> {
        let children = self.split_mut(id)?.children();
        let mut doomed = Vec::new();
        for child in children {
            doomed.extend(self.collect_subtree_ids(child));
        }
        for node_id in &doomed {
            let _ = self.nodes.remove(node_id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.kind = PartitionKind::Leaf;
        }
        Ok(doomed.len())
    }

    /// Structural equality: same names, axes, offsets and child order,
    /// regardless of the ids the arena happened to allocate.
    #[must_use]
    pub fn same_structure(&self, other: &Self) -> bool {
        self.same_subtree(self.root, other, other.root)
    }

    fn same_subtree(&self, id: NodeId, other: &Self, other_id: NodeId) -> bool {
        let (Some(node), Some(other_node)) = (self.node(id), other.node(other_id)) else {
            return false;
        };
        if node.name != other_node.name {
            return false;
        }
        match (&node.kind, &other_node.kind) {
            (PartitionKind::Leaf, PartitionKind::Leaf) => true,
            (PartitionKind::Split(a), PartitionKind::Split(b)) => {
                a.axis == b.axis
                    && a.offset == b.offset
                    && self.same_subtree(a.first, other, b.first)
                    && self.same_subtree(a.second, other, b.second)
            }
            _ => false,
        }
    }

    /// Validate internal invariants.
    ///
    /// Checks that every node is reachable from the root exactly once, that
    /// parent links mirror child links, and that names follow the path
    /// convention.
    pub fn validate(&self) -> Result<(), PartitionError> {
        let root = self
            .nodes
            .get(&self.root)
            .ok_or(PartitionError::MissingNode { node_id: self.root })?;
        if root.parent.is_some() {
            return Err(PartitionError::ParentMismatch {
                node_id: self.root,
                expected: None,
                found: root.parent,
            });
        }

        let mut visited = 0usize;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            visited += 1;
            if visited > self.nodes.len() {
                return Err(PartitionError::CycleDetected { node_id: id });
            }
            let node = self
                .nodes
                .get(&id)
                .ok_or(PartitionError::MissingNode { node_id: id })?;
            if id.get() >= self.next_id.get() {
                return Err(PartitionError::NodeIdAboveNext {
                    node_id: id,
                    next_id: self.next_id,
                });
            }
            let PartitionKind::Split(split) = &node.kind else {
                continue;
            };
            if !split.offset.is_finite() {
                return Err(PartitionError::InvalidOffset {
                    node_id: id,
                    offset: split.offset,
                });
            }
            for (slot, child_id) in split.children().into_iter().enumerate() {
                let child = self
                    .nodes
                    .get(&child_id)
                    .ok_or(PartitionError::MissingChild {
                        parent: id,
                        child: child_id,
                    })?;
                if child.parent != Some(id) {
                    return Err(PartitionError::ParentMismatch {
                        node_id: child_id,
                        expected: Some(id),
                        found: child.parent,
                    });
                }
                let expected = child_name(&node.name, slot);
                if child.name != expected {
                    return Err(PartitionError::NameMismatch {
                        node_id: child_id,
                        expected,
                        found: child.name.clone(),
                    });
                }
                stack.push(child_id);
            }
        }

        if visited != self.nodes.len() {
            let reachable = self.collect_subtree_ids(self.root);
            let orphan = self
                .nodes
                .keys()
                .find(|id| !reachable.contains(id))
                .copied()
                .unwrap_or(self.root);
            return Err(PartitionError::UnreachableNode { node_id: orphan });
        }
        Ok(())
    }

    fn split_mut(&mut self, id: NodeId) -> Result<&mut PartitionSplit, PartitionError> {
        match self.nodes.get_mut(&id) {
            Some(PartitionNode {
                kind: PartitionKind::Split(split),
                ..
            }) => Ok(split),
            Some(_) => Err(PartitionError::NodeNotSplit { node_id: id }),
            None => Err(PartitionError::MissingNode { node_id: id }),
        }
    }

    fn allocate_id(&mut self) -> Result<NodeId, PartitionError> {
        let id = self.next_id;
        self.next_id = id.checked_next()?;
        Ok(id)
    }

    /// `id` and every descendant, parents before children.
    pub(crate) fn collect_subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            out.push(node_id);
            if let Some([first, second]) = node.children() {
                stack.push(second);
                stack.push(first);
            }
        }
        out
    }
}

/// Structural errors for tree operations and validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    ZeroNodeId,
    NodeIdOverflow {
        current: NodeId,
    },
    MissingNode {
        node_id: NodeId,
    },
    MissingChild {
        parent: NodeId,
        child: NodeId,
    },
    NodeNotLeaf {
        node_id: NodeId,
    },
    NodeNotSplit {
        node_id: NodeId,
    },
    InvalidOffset {
        node_id: NodeId,
        offset: Point,
    },
    ParentMismatch {
        node_id: NodeId,
        expected: Option<NodeId>,
        found: Option<NodeId>,
    },
    NameMismatch {
        node_id: NodeId,
        expected: String,
        found: String,
    },
    NodeIdAboveNext {
        node_id: NodeId,
        next_id: NodeId,
    },
    CycleDetected {
        node_id: NodeId,
    },
    UnreachableNode {
        node_id: NodeId,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodeId => write!(f, "node id 0 is reserved"),
            Self::NodeIdOverflow { current } => {
                write!(f, "node id overflow after {current}")
            }
            Self::MissingNode { node_id } => write!(f, "node {node_id} does not exist"),
            Self::MissingChild { parent, child } => {
                write!(f, "split {parent} references missing child {child}")
            }
            Self::NodeNotLeaf { node_id } => write!(f, "node {node_id} is not a leaf"),
            Self::NodeNotSplit { node_id } => write!(f, "node {node_id} is not split"),
            Self::InvalidOffset { node_id, offset } => write!(
                f,
                "node {node_id} has non-finite offset ({}, {})",
                offset.x, offset.y
            ),
            Self::ParentMismatch {
                node_id,
                expected,
                found,
            } => write!(
                f,
                "node {node_id} parent mismatch: expected {expected:?}, found {found:?}"
            ),
            Self::NameMismatch {
                node_id,
                expected,
                found,
            } => write!(
                f,
                "node {node_id} is named {found:?} but its path is {expected:?}"
            ),
            Self::NodeIdAboveNext { node_id, next_id } => {
                write!(f, "node {node_id} is not below next id {next_id}")
            }
            Self::CycleDetected { node_id } => write!(f, "cycle detected at node {node_id}"),
            Self::UnreachableNode { node_id } => {
                write!(f, "node {node_id} is not reachable from the root")
            }
        }
    }
}

impl std::error::Error for PartitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_root(tree: &mut PartitionTree, axis: SplitAxis, at: f64) -> [NodeId; 2] {
        tree.split(tree.root(), axis, Point::new(at, at))
            .expect("root starts as a leaf")
    }

    #[test]
    fn new_tree_is_single_root_leaf() {
        let tree = PartitionTree::new("main");
        let root = tree.root_node();
        assert!(root.is_leaf());
        assert_eq!(root.name, "main");
        assert_eq!(root.parent, None);
        assert_eq!(tree.len(), 1);
        tree.validate().expect("fresh tree is valid");
    }

    #[test]
    fn split_creates_named_children() {
        let mut tree = PartitionTree::default();
        let [first, second] = split_root(&mut tree, SplitAxis::Horizontal, 100.0);
        let root = tree.root_node();
        assert_eq!(root.axis(), Some(SplitAxis::Horizontal));
        assert_eq!(root.children(), Some([first, second]));
        assert_eq!(tree.node(first).map(|n| n.name.as_str()), Some("0.0"));
        assert_eq!(tree.node(second).map(|n| n.name.as_str()), Some("0.1"));
        assert_eq!(tree.parent(first), Some(tree.root()));
        tree.validate().expect("split tree is valid");
    }

    #[test]
    fn split_rejects_non_leaf() {
        let mut tree = PartitionTree::default();
        let _ = split_root(&mut tree, SplitAxis::Vertical, 50.0);
        let err = tree
            .split(tree.root(), SplitAxis::Vertical, Point::ORIGIN)
            .expect_err("root is already split");
        assert_eq!(
            err,
            PartitionError::NodeNotLeaf {
                node_id: tree.root()
            }
        );
    }

    #[test]
    fn split_rejects_non_finite_offset() {
        let mut tree = PartitionTree::default();
        let err = tree
            .split(tree.root(), SplitAxis::Vertical, Point::new(f64::NAN, 0.0))
            .expect_err("nan offset");
        assert!(matches!(err, PartitionError::InvalidOffset { .. }));
        assert!(tree.root_node().is_leaf());
    }

    #[test]
    fn collapse_destroys_whole_subtree() {
        let mut tree = PartitionTree::default();
        let [first, _] = split_root(&mut tree, SplitAxis::Horizontal, 80.0);
        let [grand, _] = tree
            .split(first, SplitAxis::Vertical, Point::new(0.0, 40.0))
            .expect("first child is a leaf");
        assert_eq!(tree.len(), 5);

        let removed = tree.collapse(tree.root()).expect("root is split");
        assert_eq!(removed, 4);
        assert_eq!(tree.len(), 1);
        assert!(tree.node(grand).is_none());
        assert!(tree.root_node().is_leaf());
        tree.validate().expect("collapsed tree is valid");
    }

    #[test]
    fn merging_flag_toggles_and_clears_on_collapse() {
        let mut tree = PartitionTree::default();
        let _ = split_root(&mut tree, SplitAxis::Horizontal, 80.0);
        assert!(tree.set_merging(tree.root(), true).expect("split"));
        assert!(!tree.set_merging(tree.root(), true).expect("split"));
        assert!(tree.root_node().merge_pending());
        let _ = tree.collapse(tree.root()).expect("split");
        assert!(!tree.root_node().merge_pending());
    }

    #[test]
    fn set_offset_requires_split() {
        let mut tree = PartitionTree::default();
        let err = tree
            .set_offset(tree.root(), Point::new(10.0, 0.0))
            .expect_err("leaf has no divider");
        assert!(matches!(err, PartitionError::NodeNotSplit { .. }));

        let _ = split_root(&mut tree, SplitAxis::Horizontal, 80.0);
        let previous = tree
            .set_offset(tree.root(), Point::new(120.0, 0.0))
            .expect("split");
        assert_eq!(previous, Point::new(80.0, 80.0));
        assert_eq!(tree.root_node().offset(), Some(Point::new(120.0, 0.0)));
    }

    #[test]
    fn leaf_invariant_holds_for_every_node() {
        let mut tree = PartitionTree::default();
        let [first, second] = split_root(&mut tree, SplitAxis::Horizontal, 80.0);
        let _ = tree
            .split(second, SplitAxis::Vertical, Point::new(0.0, 30.0))
            .expect("leaf");
        let _ = tree.collapse(second).expect("split");
        let _ = tree
            .split(first, SplitAxis::Horizontal, Point::new(20.0, 0.0))
            .expect("leaf");
        for node in tree.nodes() {
            assert_eq!(node.is_leaf(), node.axis().is_none());
            assert_eq!(node.is_leaf(), node.children().is_none());
            assert_eq!(node.is_leaf(), node.offset().is_none());
        }
    }

    #[test]
    fn same_structure_ignores_ids() {
        let mut a = PartitionTree::default();
        let [a0, a1] = split_root(&mut a, SplitAxis::Horizontal, 80.0);
        let _ = a.split(a1, SplitAxis::Vertical, Point::new(3.0, 4.0)).expect("leaf");
        let _ = a.split(a0, SplitAxis::Vertical, Point::new(5.0, 6.0)).expect("leaf");

        let mut b = PartitionTree::default();
        let [b0, b1] = split_root(&mut b, SplitAxis::Horizontal, 80.0);
        let _ = b.split(b0, SplitAxis::Vertical, Point::new(5.0, 6.0)).expect("leaf");
        let _ = b.split(b1, SplitAxis::Vertical, Point::new(3.0, 4.0)).expect("leaf");

        assert!(a.same_structure(&b));
        let _ = b.set_offset(b1, Point::new(3.0, 5.0)).expect("split");
        assert!(!a.same_structure(&b));
    }

    #[test]
    fn axis_helpers() {
        assert_eq!(SplitAxis::from_drag(-50.0, 0.0), SplitAxis::Horizontal);
        assert_eq!(SplitAxis::from_drag(20.0, -20.0), SplitAxis::Vertical);
        assert_eq!(SplitAxis::from_drag(0.0, 0.0), SplitAxis::Vertical);
        assert_eq!(
            SplitAxis::Vertical.pinned(Point::new(7.0, 9.0)),
            Point::new(0.0, 9.0)
        );
        assert_eq!(SplitAxis::Horizontal.template_slot(0), 0);
        assert_eq!(SplitAxis::Vertical.template_slot(0), 1);
        assert_eq!(SplitAxis::Vertical.template_slot(1), 0);
    }

    #[test]
    fn node_id_rejects_zero() {
        assert_eq!(NodeId::new(0), Err(PartitionError::ZeroNodeId));
        assert_eq!(NodeId::new(7).map(NodeId::get), Ok(7));
    }

    #[test]
    fn node_by_name_finds_descendants() {
        let mut tree = PartitionTree::default();
        let [_, second] = split_root(&mut tree, SplitAxis::Horizontal, 80.0);
        assert_eq!(tree.node_by_name("0.1").map(|n| n.id), Some(second));
        assert!(tree.node_by_name("0.2").is_none());
    }
}
