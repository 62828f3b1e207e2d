#![no_main]

use libfuzzer_sys::fuzz_target;
use segbox_layout::{LayoutSnapshot, PartitionTree};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(layout) = LayoutSnapshot::from_json_str(text) else {
        return;
    };

    // Hydration never fails; whatever it builds must be a valid tree.
    let (tree, _report) = PartitionTree::from_layout(layout.name.clone(), &layout);
    tree.validate().expect("hydrated tree is valid");
    assert!(!tree.leaves().is_empty());

    // Re-serializing what was accepted hydrates cleanly to the same shape.
    let rewritten = tree.to_layout();
    let (again, report) = PartitionTree::from_layout(tree.root_name(), &rewritten);
    assert!(report.is_clean(), "round trip fell back: {report:?}");
    assert!(again.same_structure(&tree));
});
