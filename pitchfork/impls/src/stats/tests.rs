use pitchfork_core::tree::{Tree, TreeBuilder};

use super::PolytomyStats;

// (((A,B,C)@1,D)@2,(E,F)@0.5,G)@3
fn forest() -> Tree {
    let mut builder = TreeBuilder::new();

    let leaves = ["A", "B", "C", "D", "E", "F", "G"]
        .into_iter()
        .map(|label| builder.leaf(label, 0.0).unwrap())
        .collect::<Vec<_>>();

    let abc = builder
        .polytomy(1.0, &[leaves[0], leaves[1], leaves[2]])
        .unwrap();
    let abcd = builder.internal(2.0, abc, leaves[3]).unwrap();
    let ef = builder.internal(0.5, leaves[4], leaves[5]).unwrap();
    let root = builder.polytomy(3.0, &[abcd, ef, leaves[6]]).unwrap();

    builder.build(root).unwrap()
}

#[test]
fn counts_multifurcations() {
    let stats = PolytomyStats::from_tree(&forest(), None);

    assert_eq!(stats.polytomy_count(), 2);
    assert_eq!(stats.max_order(), 7);
    assert_eq!(stats.order_histogram(), &[2, 2, 0, 0, 0, 0]);

    assert_eq!(stats.nodes_of_order(2), 2);
    assert_eq!(stats.nodes_of_order(3), 2);
    assert_eq!(stats.nodes_of_order(1), 0);
    assert_eq!(stats.nodes_of_order(100), 0);
}

#[test]
fn caps_the_histogram() {
    let stats = PolytomyStats::from_tree(&forest(), Some(2));

    assert_eq!(stats.polytomy_count(), 2);
    assert_eq!(stats.order_histogram(), &[2]);
    assert_eq!(stats.nodes_of_order(3), 0);
}

#[test]
fn star_tree() {
    let mut builder = TreeBuilder::new();

    let leaves = (0..5)
        .map(|i| builder.leaf(format!("L{}", i), 0.0).unwrap())
        .collect::<Vec<_>>();
    let root = builder.polytomy(1.0, &leaves).unwrap();

    let stats = PolytomyStats::from_tree(&builder.build(root).unwrap(), Some(10));

    assert_eq!(stats.polytomy_count(), 1);
    assert_eq!(stats.order_histogram(), &[0, 0, 0, 1]);
}
