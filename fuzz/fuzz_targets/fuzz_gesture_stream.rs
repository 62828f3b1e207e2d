#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use segbox_core::{PointerEvent, Rect};
use segbox_layout::{
    GestureEffect, GestureKind, GridBounds, PartitionTree, ResizeGesture, SegmentGesture,
};

#[derive(Debug, Arbitrary)]
enum Input {
    Handle { leaf: u8, x: i16, y: i16 },
    Divider { split: u8 },
    Move { x: i16, y: i16 },
    Release,
    ForceCancel,
}

fuzz_target!(|inputs: Vec<Input>| {
    let bounds = GridBounds::new(Rect::from_size(400.0, 300.0), 8.0);
    let mut tree = PartitionTree::default();
    let mut segment = SegmentGesture::default();
    let mut resize = ResizeGesture::default();
    let mut active: Option<GestureKind> = None;

    for input in inputs.into_iter().take(256) {
        match input {
            Input::Handle { leaf, x, y } if active.is_none() => {
                let leaves = tree.leaf_ids();
                let node = leaves[usize::from(leaf) % leaves.len()];
                let event = PointerEvent::down(f64::from(x), f64::from(y));
                if segment.start(&tree, &bounds, node, &event).is_ok() {
                    active = Some(GestureKind::Segment);
                }
            }
            Input::Divider { split } if active.is_none() => {
                let splits: Vec<_> = tree
                    .nodes()
                    .filter(|node| node.is_split())
                    .map(|node| node.id)
                    .collect();
                if splits.is_empty() {
                    continue;
                }
                let node = splits[usize::from(split) % splits.len()];
                if resize.start(&tree, node).is_ok() {
                    active = Some(GestureKind::Resize);
                }
            }
            Input::Move { x, y } => {
                let event = PointerEvent::moved(f64::from(x), f64::from(y));
                match active {
                    Some(GestureKind::Segment) => {
                        let _ = segment.update(&mut tree, &bounds, &event);
                    }
                    Some(GestureKind::Resize) => {
                        let _ = resize.update(&mut tree, &bounds, &event);
                    }
                    None => {}
                }
            }
            Input::Release => {
                let end = match active.take() {
                    Some(GestureKind::Segment) => segment.end(&mut tree),
                    Some(GestureKind::Resize) => resize.end(&mut tree, &bounds),
                    None => continue,
                };
                if let (GestureKind::Segment, GestureEffect::Committed { node, axis, offset }) =
                    (end.kind, end.effect)
                {
                    tree.split(node, axis, offset).expect("committed node is a leaf");
                }
            }
            Input::ForceCancel => {
                match active.take() {
                    Some(GestureKind::Segment) => {
                        let _ = segment.force_cancel(&mut tree);
                    }
                    Some(GestureKind::Resize) => {
                        let _ = resize.force_cancel();
                    }
                    None => {}
                }
            }
            _ => {}
        }
        tree.validate().expect("tree stays valid");
    }

    if active == Some(GestureKind::Segment) {
        let _ = segment.force_cancel(&mut tree);
    }
    assert!(tree.nodes().all(|node| !node.merge_pending()));
});
