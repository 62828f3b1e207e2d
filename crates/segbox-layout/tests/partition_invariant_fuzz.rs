//! Property/fuzz-style invariants for partition tree operations.
//!
//! Random operation streams (direct splits, divider moves, collapses and full
//! pointer gestures) run against the public API. After every step the tree
//! must validate, persist losslessly, and solve inside its area.

use segbox_layout::{
    GestureEffect, GestureKind, GridBounds, NodeId, PartitionTree, Point, Rect, ResizeGesture,
    SegmentGesture, SplitAxis,
};
use segbox_core::PointerEvent;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_f64(&mut self, max: f64) -> f64 {
        ((self.next_u64() >> 11) as f64 / (1u64 << 53) as f64 * max).floor()
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }
}

#[derive(Debug, Clone)]
enum Operation {
    Split {
        target: NodeId,
        axis: SplitAxis,
        offset: Point,
    },
    Move {
        split: NodeId,
        offset: Point,
    },
    Collapse {
        split: NodeId,
    },
    SegmentDrag {
        target: NodeId,
        from: Point,
        to: Point,
    },
    ResizeDrag {
        split: NodeId,
        to: Point,
    },
}

const AREA: Rect = Rect::new(0.0, 0.0, 640.0, 480.0);
const GUTTER: f64 = 8.0;

fn split_ids(tree: &PartitionTree) -> Vec<NodeId> {
    tree.nodes()
        .filter(|node| node.is_split())
        .map(|node| node.id)
        .collect()
}

fn random_point(rng: &mut Lcg) -> Point {
    Point::new(rng.next_f64(AREA.width), rng.next_f64(AREA.height))
}

fn random_operation(tree: &PartitionTree, rng: &mut Lcg) -> Operation {
    let leaves = tree.leaf_ids();
    let splits = split_ids(tree);

    let mut candidates = vec![0usize, 3];
    if !splits.is_empty() {
        candidates.extend([1, 2, 4]);
    }
    match candidates[rng.choose_index(candidates.len())] {
        0 => Operation::Split {
            target: leaves[rng.choose_index(leaves.len())],
            axis: if rng.choose_bool() {
                SplitAxis::Horizontal
            } else {
                SplitAxis::Vertical
            },
            offset: random_point(rng),
        },
        1 => Operation::Move {
            split: splits[rng.choose_index(splits.len())],
            offset: random_point(rng),
        },
        2 => Operation::Collapse {
            split: splits[rng.choose_index(splits.len())],
        },
        3 => Operation::SegmentDrag {
            target: leaves[rng.choose_index(leaves.len())],
            from: random_point(rng),
            to: random_point(rng),
        },
        _ => Operation::ResizeDrag {
            split: splits[rng.choose_index(splits.len())],
            to: random_point(rng),
        },
    }
}

fn apply(tree: &mut PartitionTree, operation: &Operation) {
    let bounds = GridBounds::new(AREA, GUTTER);
    match *operation {
        Operation::Split {
            target,
            axis,
            offset,
        } => {
            tree.split(target, axis, offset).expect("target is a leaf");
        }
        Operation::Move { split, offset } => {
            tree.set_offset(split, offset).expect("target is a split");
        }
        Operation::Collapse { split } => {
            tree.collapse(split).expect("target is a split");
        }
        Operation::SegmentDrag { target, from, to } => {
            let mut gesture = SegmentGesture::default();
            gesture
                .start(tree, &bounds, target, &PointerEvent::down(from.x, from.y))
                .expect("leaf with bounds");
            let _ = gesture.update(tree, &bounds, &PointerEvent::moved(to.x, to.y));
            let end = gesture.end(tree);
            assert_eq!(end.kind, GestureKind::Segment);
            if let GestureEffect::Committed { node, axis, offset } = end.effect {
                tree.split(node, axis, offset).expect("committed node is a leaf");
            }
            assert!(!gesture.is_active());
        }
        Operation::ResizeDrag { split, to } => {
            let mut gesture = ResizeGesture::default();
            gesture.start(tree, split).expect("target is a split");
            let _ = gesture.update(tree, &bounds, &PointerEvent::moved(to.x, to.y));
            let _ = gesture.end(tree, &bounds);
        }
    }
}

fn assert_tree_invariants(tree: &PartitionTree) {
    tree.validate().expect("tree should remain structurally valid");
    for node in tree.nodes() {
        assert_eq!(node.is_leaf(), node.axis().is_none());
        assert!(!node.merge_pending(), "merge flag survived a gesture");
    }
    let leaves = tree.leaves();
    assert!(!leaves.is_empty());
    let splits = split_ids(tree).len();
    assert_eq!(leaves.len(), splits + 1, "binary tree has one more leaf than splits");
}

fn assert_round_trip(tree: &PartitionTree) {
    let json = tree.to_layout().to_json_string().expect("serializable");
    let layout = segbox_layout::LayoutSnapshot::from_json_str(&json).expect("parseable");
    let (restored, report) = PartitionTree::from_layout(tree.root_name(), &layout);
    assert!(report.is_clean(), "hydration fell back: {report:?}");
    assert!(restored.same_structure(tree));
}

fn assert_layout_bounds(tree: &PartitionTree) {
    let layout = tree.solve_layout(AREA, GUTTER);
    assert_eq!(layout, tree.solve_layout(AREA, GUTTER));
    for leaf in tree.leaf_ids() {
        let rect = layout.rect(leaf).expect("every leaf has a rect");
        assert!(rect.x >= AREA.x && rect.y >= AREA.y);
        assert!(rect.right() <= AREA.right() + 1e-9);
        assert!(rect.bottom() <= AREA.bottom() + 1e-9);
        assert!(rect.width >= 0.0 && rect.height >= 0.0);
    }
}

fn run_sequence(seed: u64, steps: usize) -> (PartitionTree, Vec<Operation>) {
    let mut tree = PartitionTree::new("root");
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);
    for _ in 0..steps {
        let operation = random_operation(&tree, &mut rng);
        apply(&mut tree, &operation);
        assert_tree_invariants(&tree);
        assert_layout_bounds(&tree);
        applied.push(operation);
    }
    (tree, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 10usize..80,
    ) {
        let (tree, _) = run_sequence(seed, steps);
        assert_tree_invariants(&tree);
        assert_round_trip(&tree);
    }

    #[test]
    fn random_operation_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 10usize..60,
    ) {
        let (tree, operations) = run_sequence(seed, steps);
        let mut replay = PartitionTree::new("root");
        for operation in &operations {
            apply(&mut replay, operation);
        }
        prop_assert!(replay.same_structure(&tree));
        prop_assert_eq!(replay.to_layout(), tree.to_layout());
    }
}
