//! Leaf enumeration.
//!
//! Leaves are reported in pre-order, first child before second, which is the
//! visual reading order (left before right, top before bottom).

use serde::{Deserialize, Serialize};

use crate::partition::{NodeId, PartitionTree};
use crate::snapshot::LayoutAxis;

/// Snapshot of one leaf handed to change listeners.
///
/// Serializes with the same `name`/`axis`/`leaf` keys as a leaf in a
/// [`LayoutSnapshot`](crate::snapshot::LayoutSnapshot), so listeners can
/// treat it as a leaf layout entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafDescriptor {
    pub id: NodeId,
    /// Path name, e.g. `"0.1.0"`.
    pub name: String,
    /// Always [`LayoutAxis::None`].
    pub axis: LayoutAxis,
    /// Always `true`.
    pub leaf: bool,
    /// Child slots from the root down to this leaf. Empty for the root.
    pub path: Vec<u8>,
}

impl LeafDescriptor {
    /// Nesting depth (0 for the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl PartitionTree {
    /// Every leaf in pre-order. A lone root yields exactly one descriptor.
    #[must_use]
    pub fn leaves(&self) -> Vec<LeafDescriptor> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Vec<u8>)> = vec![(self.root(), Vec::new())];
        while let Some((id, path)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            match node.children() {
                Some([first, second]) => {
                    let mut second_path = path.clone();
                    second_path.push(1);
                    stack.push((second, second_path));
                    let mut first_path = path;
                    first_path.push(0);
                    stack.push((first, first_path));
                }
                None => out.push(LeafDescriptor {
                    id,
                    name: node.name.clone(),
                    axis: LayoutAxis::None,
                    leaf: true,
                    path,
                }),
            }
        }
        out
    }

    /// IDs of every leaf in pre-order.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.collect_subtree_ids(self.root())
            .into_iter()
            .filter(|id| self.node(*id).is_some_and(|node| node.is_leaf()))
            .collect()
    }
}

/// Leaf descriptors of `tree` in reading order.
#[must_use]
pub fn collect_leaves(tree: &PartitionTree) -> Vec<LeafDescriptor> {
    tree.leaves()
}
