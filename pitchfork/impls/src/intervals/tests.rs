use pitchfork_core::tree::{Tree, TreeBuilder};

use super::{CollapsedTreeIntervals, IntervalSequence, IntervalType};

// ((A:1.0,B:1.0,C:1.0):0.5,D:0.7)
fn polytomy_tree() -> Tree {
    let mut builder = TreeBuilder::new();

    let a = builder.leaf("A", 0.0).unwrap();
    let b = builder.leaf("B", 0.0).unwrap();
    let c = builder.leaf("C", 0.0).unwrap();
    let d = builder.leaf("D", 0.8).unwrap();

    let abc = builder.polytomy(1.0, &[a, b, c]).unwrap();
    let root = builder.internal(1.5, abc, d).unwrap();

    builder.build(root).unwrap()
}

#[test]
fn collapses_zero_length_intervals() {
    let tree = polytomy_tree();
    let intervals = IntervalSequence::from_tree(&tree);

    assert_eq!(intervals.interval_count(), 3);
    assert_eq!(intervals.sample_count(), 4);
    assert!(!intervals.is_coalescent_only());

    assert!((intervals.interval(0) - 0.8).abs() < 1e-15);
    assert!((intervals.interval(1) - 0.2).abs() < 1e-15);
    assert!((intervals.interval(2) - 0.5).abs() < 1e-15);

    assert_eq!(intervals.interval_type(0), IntervalType::Sample);
    assert_eq!(intervals.interval_type(1), IntervalType::Coalescent);
    assert_eq!(intervals.interval_type(2), IntervalType::Coalescent);

    assert_eq!(intervals.lineage_count(0), 3);
    assert_eq!(intervals.lineage_count(1), 4);
    assert_eq!(intervals.lineage_count(2), 2);
    assert_eq!(intervals.lineage_count(3), 1);

    assert_eq!(intervals.coalescent_events(0), 0);
    assert_eq!(intervals.coalescent_events(1), 2);
    assert_eq!(intervals.coalescent_events(2), 1);
    assert_eq!(intervals.total_coalescent_events(), 3);
}

#[test]
fn durations_sum_to_root_height() {
    let tree = polytomy_tree();
    let intervals = IntervalSequence::from_tree(&tree);

    assert!((intervals.total_duration() - tree.root_height()).abs() < 1e-12);
    assert_eq!(intervals.lineage_count(intervals.interval_count()), 1);
}

#[test]
fn fully_collapsed_tree_has_single_interval() {
    let mut builder = TreeBuilder::new();

    let leaves = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|label| builder.leaf(*label, 0.0).unwrap())
        .collect::<Vec<_>>();
    let root = builder.polytomy(2.0, &leaves).unwrap();
    let tree = builder.build(root).unwrap();

    let intervals = IntervalSequence::from_tree(&tree);

    assert_eq!(intervals.interval_count(), 1);
    assert_eq!(intervals.lineage_count(0), 5);
    assert_eq!(intervals.coalescent_events(0), 4);
    assert_eq!(tree.true_internal_node_count(), 1);
}

#[test]
fn recomputes_only_after_tree_edits() {
    let mut tree = polytomy_tree();
    let mut intervals = CollapsedTreeIntervals::new(&tree);

    let first = intervals.get(&tree) as *const IntervalSequence;
    let second = intervals.get(&tree) as *const IntervalSequence;

    assert!(core::ptr::eq(first, second));
    assert_eq!(intervals.recomputations(), 1);

    let root = tree.root();
    tree.set_height(root, 2.0);

    assert!((intervals.get(&tree).interval(2) - 1.0).abs() < 1e-15);
    assert_eq!(intervals.recomputations(), 2);

    let _ = intervals.get(&tree);
    assert_eq!(intervals.recomputations(), 2);
    assert_eq!(intervals.leaf_count(), 4);
}
