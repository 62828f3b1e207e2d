//! Persisted layout documents.
//!
//! A [`LayoutSnapshot`] mirrors the tree shape as plain JSON:
//!
//! ```json
//! {"name":"0","axis":"horizontal","leaf":false,"offset":{"x":120.0,"y":0.0},
//!  "children":[{"name":"0.0","axis":"none","leaf":true},
//!              {"name":"0.1","axis":"none","leaf":true}]}
//! ```
//!
//! Children are written in template order. For horizontal splits that is slot
//! order; for vertical splits the two slots are swapped (see
//! [`SplitAxis::template_slot`]). Restoring applies the same mapping, so a
//! saved tree hydrates back to the same structure.
//!
//! Readers of a stored document must not take `children[0]` to be the
//! leading pane of a vertical split: in
//!
//! ```json
//! {"name":"0","axis":"vertical", ...,
//!  "children":[{"name":"0.1", ...},{"name":"0.0", ...}]}
//! ```
//!
//! the top pane is `"0.0"`, written second. Identify a child by its `name`,
//! whose last segment is its slot.
//!
//! Hydration never fails. A template node that does not describe a valid
//! split at its expected path leaves the node as a leaf and is recorded in the
//! returned [`HydrationReport`].

use std::fmt;

use segbox_core::geometry::Point;
use serde::{Deserialize, Serialize};

use crate::partition::{NodeId, PartitionKind, PartitionTree, SplitAxis};

/// Axis as written in a layout document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAxis {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl LayoutAxis {
    #[must_use]
    pub const fn split_axis(self) -> Option<SplitAxis> {
        match self {
            Self::None => None,
            Self::Horizontal => Some(SplitAxis::Horizontal),
            Self::Vertical => Some(SplitAxis::Vertical),
        }
    }
}

impl From<Option<SplitAxis>> for LayoutAxis {
    fn from(axis: Option<SplitAxis>) -> Self {
        match axis {
            None => Self::None,
            Some(SplitAxis::Horizontal) => Self::Horizontal,
            Some(SplitAxis::Vertical) => Self::Vertical,
        }
    }
}

/// One node of a persisted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSnapshot {
    pub name: String,
    #[serde(default)]
    pub axis: LayoutAxis,
    pub leaf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayoutSnapshot>>,
}

impl LayoutSnapshot {
    /// A leaf entry.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis: LayoutAxis::None,
            leaf: true,
            offset: None,
            children: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LayoutParseError> {
        serde_json::from_str(json).map_err(LayoutParseError)
    }

    pub fn to_json_string(&self) -> Result<String, LayoutParseError> {
        serde_json::to_string(self).map_err(LayoutParseError)
    }

    /// Check that this entry describes a usable split, returning its pieces.
    fn as_split(&self) -> Result<(SplitAxis, Point, &[Self; 2]), FallbackReason> {
        let Some(axis) = self.axis.split_axis() else {
            return Err(FallbackReason::MissingAxis);
        };
        if self.leaf {
            return Err(FallbackReason::LeafWithAxis);
        }
        let Some(offset) = self.offset else {
            return Err(FallbackReason::MissingOffset);
        };
        if !offset.is_finite() || offset.x < 0.0 || offset.y < 0.0 {
            return Err(FallbackReason::InvalidOffset);
        }
        let Some(children) = self.children.as_deref() else {
            return Err(FallbackReason::MissingChildren);
        };
        let children: &[Self; 2] = children
            .try_into()
            .map_err(|_| FallbackReason::ChildCount {
                found: children.len(),
            })?;
        Ok((axis, offset, children))
    }

    fn is_plain_leaf(&self) -> bool {
        self.leaf && self.axis == LayoutAxis::None && self.children.is_none()
    }
}

/// A layout document that is not valid JSON for [`LayoutSnapshot`].
#[derive(Debug)]
pub struct LayoutParseError(pub serde_json::Error);

impl fmt::Display for LayoutParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed layout document: {}", self.0)
    }
}

impl std::error::Error for LayoutParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Why a template entry could not seed its node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NameMismatch { found: String },
    MissingAxis,
    LeafWithAxis,
    MissingOffset,
    InvalidOffset,
    MissingChildren,
    ChildCount { found: usize },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameMismatch { found } => write!(f, "template names {found:?}"),
            Self::MissingAxis => f.write_str("split without an axis"),
            Self::LeafWithAxis => f.write_str("leaf entry carries an axis"),
            Self::MissingOffset => f.write_str("split without an offset"),
            Self::InvalidOffset => f.write_str("non-finite or negative offset"),
            Self::MissingChildren => f.write_str("split without children"),
            Self::ChildCount { found } => write!(f, "expected 2 children, found {found}"),
        }
    }
}

/// A template entry that was ignored during hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationFallback {
    /// Path name of the node that stayed a leaf.
    pub name: String,
    pub reason: FallbackReason,
}

/// Everything hydration had to skip. Empty when the template matched fully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub fallbacks: Vec<HydrationFallback>,
}

impl HydrationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

impl PartitionTree {
    /// Serialize the tree into a layout document.
    #[must_use]
    pub fn to_layout(&self) -> LayoutSnapshot {
        self.layout_of(self.root())
            .unwrap_or_else(|| LayoutSnapshot::leaf(self.root_name()))
    }

    fn layout_of(&self, id: NodeId) -> Option<LayoutSnapshot> {
        let node = self.node(id)?;
        let PartitionKind::Split(split) = &node.kind else {
            return Some(LayoutSnapshot::leaf(node.name.clone()));
        };
        let slots = split.children();
        let children = [
            self.layout_of(slots[split.axis.template_slot(0)])?,
            self.layout_of(slots[split.axis.template_slot(1)])?,
        ];
        Some(LayoutSnapshot {
            name: node.name.clone(),
            axis: Some(split.axis).into(),
            leaf: false,
            offset: Some(split.offset),
            children: Some(children.into()),
        })
    }

    /// Build a tree named `root_name` seeded from `layout`.
    ///
    /// Template entries whose name does not match the expected path, or that
    /// describe an incomplete split, leave their node as a leaf.
    #[must_use]
    pub fn from_layout(
        root_name: impl Into<String>,
        layout: &LayoutSnapshot,
    ) -> (Self, HydrationReport) {
        let mut tree = Self::new(root_name);
        let mut report = HydrationReport::default();
        let root = tree.root();
        tree.seed(root, layout, &mut report);
        (tree, report)
    }

    fn seed(&mut self, id: NodeId, template: &LayoutSnapshot, report: &mut HydrationReport) {
        let Some(name) = self.node(id).map(|node| node.name.clone()) else {
            return;
        };
        let mut fall_back = |reason| {
            report.fallbacks.push(HydrationFallback {
                name: name.clone(),
                reason,
            });
        };
        if template.name != name {
            fall_back(FallbackReason::NameMismatch {
                found: template.name.clone(),
            });
            return;
        }
        if template.is_plain_leaf() {
            return;
        }
        let (axis, offset, children) = match template.as_split() {
            Ok(parts) => parts,
            Err(reason) => {
                fall_back(reason);
                return;
            }
        };
        let Ok(slots) = self.split(id, axis, offset) else {
            return;
        };
        for (slot, child) in slots.into_iter().enumerate() {
            self.seed(child, &children[axis.template_slot(slot)], report);
        }
    }
}
