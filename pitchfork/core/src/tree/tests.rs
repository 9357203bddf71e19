use super::{NodeIndex, Tree, TreeBuildError, TreeBuilder};

struct Fixture {
    tree: Tree,
    a: NodeIndex,
    b: NodeIndex,
    c: NodeIndex,
    d: NodeIndex,
    abc: NodeIndex,
}

// ((A:1.0,B:1.0,C:1.0):0.5,D:0.7)
fn fixture() -> Fixture {
    let mut builder = TreeBuilder::new();

    let a = builder.leaf("A", 0.0).unwrap();
    let b = builder.leaf("B", 0.0).unwrap();
    let c = builder.leaf("C", 0.0).unwrap();
    let d = builder.leaf("D", 0.8).unwrap();

    let abc = builder.polytomy(1.0, &[a, b, c]).unwrap();
    let root = builder.internal(1.5, abc, d).unwrap();

    Fixture {
        tree: builder.build(root).unwrap(),
        a,
        b,
        c,
        d,
        abc,
    }
}

#[test]
fn builds_valid_ladder() {
    let Fixture { tree, a, abc, .. } = fixture();

    assert!(tree.is_valid());
    assert_eq!(tree.node_count(), 7);
    assert_eq!(tree.leaf_count(), 4);
    assert_eq!(tree.internal_node_count(), 3);
    assert_eq!(tree.root_height(), 1.5);
    assert_eq!(tree.label(a), Some("A"));
    assert_eq!(tree.label(abc), None);
}

#[test]
fn recognises_logical_nodes() {
    let Fixture {
        tree,
        a,
        b,
        c,
        d,
        abc,
    } = fixture();

    let inner = tree.parent(a).unwrap();

    assert_ne!(inner, abc);
    assert!(!tree.is_logical_node(inner));
    assert!(tree.is_logical_node(abc));
    assert!(tree.is_logical_node(tree.root()));
    assert_eq!(tree.logical_node(inner), abc);
    assert_eq!(tree.logical_parent(a), Some(abc));
    assert_eq!(tree.logical_parent(abc), Some(tree.root()));
    assert_eq!(tree.logical_parent(tree.root()), None);

    let (group, mut children) = tree.group_and_logical_children(abc);
    children.sort_unstable();

    assert_eq!(group, vec![inner]);
    assert_eq!(children, vec![a, b, c]);
    assert_eq!(tree.logical_children(tree.root()), vec![abc, d]);

    assert!(tree.is_polytomy(abc));
    assert!(tree.is_polytomy(inner));
    assert!(!tree.is_polytomy(tree.root()));

    assert_eq!(tree.true_internal_node_count(), 2);
    assert_eq!(tree.true_nodes().len(), 6);
}

#[test]
fn moves_whole_group() {
    let Fixture {
        mut tree, a, abc, ..
    } = fixture();

    let inner = tree.parent(a).unwrap();

    tree.set_logical_node_height(inner, 1.2);

    assert_eq!(tree.height(abc), 1.2);
    assert_eq!(tree.height(inner), 1.2);
    assert!(tree.is_valid());
}

#[test]
fn rollback_restores_exactly() {
    let Fixture {
        mut tree, d, abc, ..
    } = fixture();

    let original = tree.clone();
    let root = tree.root();
    let generation = tree.generation();

    tree.checkpoint();

    tree.set_height(root, 2.0);
    tree.detach(d);
    tree.detach(abc);
    tree.attach(root, d);
    tree.attach(root, abc);

    assert!(tree.is_valid());
    assert_ne!(tree, original);
    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![d, abc]);

    tree.rollback();

    assert_eq!(tree, original);
    assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![abc, d]);
    assert!(tree.generation() > generation);
    assert!(!tree.is_checkpointed());
}

#[test]
fn commit_forgets_edits() {
    let Fixture { mut tree, .. } = fixture();

    let root = tree.root();

    tree.checkpoint();
    tree.set_height(root, 3.0);
    tree.commit();

    tree.rollback();

    assert_eq!(tree.root_height(), 3.0);
}

#[test]
fn rejects_malformed_trees() {
    let mut builder = TreeBuilder::new();

    let a = builder.leaf("A", 2.0).unwrap();
    let b = builder.leaf("B", 0.0).unwrap();
    let c = builder.leaf("C", 0.0).unwrap();

    assert!(matches!(
        builder.leaf("X", -1.0),
        Err(TreeBuildError::InvalidHeight(_))
    ));
    assert!(matches!(
        builder.internal(1.0, a, b),
        Err(TreeBuildError::ChildAboveParent { .. })
    ));
    assert!(matches!(
        builder.polytomy(1.0, &[b]),
        Err(TreeBuildError::TooFewChildren(1))
    ));

    let bc = builder.internal(1.0, b, c).unwrap();

    assert!(matches!(
        builder.internal(1.5, b, a),
        Err(TreeBuildError::AlreadyAttached(_))
    ));
    assert!(matches!(
        builder.build(bc),
        Err(TreeBuildError::Disconnected {
            reachable: 3,
            total: 4
        })
    ));
}

#[test]
fn bipartitions_ignore_ladder_order() {
    let Fixture {
        tree, a, b, c, d, ..
    } = fixture();

    let mut builder = TreeBuilder::new();
    let a2 = builder.leaf("A", 0.0).unwrap();
    let b2 = builder.leaf("B", 0.0).unwrap();
    let c2 = builder.leaf("C", 0.0).unwrap();
    let d2 = builder.leaf("D", 0.8).unwrap();
    let abc2 = builder.polytomy(1.0, &[c2, a2, b2]).unwrap();
    let root2 = builder.internal(1.5, abc2, d2).unwrap();
    let other = builder.build(root2).unwrap();

    assert_eq!(
        tree.leaf_bipartitions(),
        vec![vec![a, b, c], vec![a, b, c, d]]
    );
    assert_eq!(tree.leaf_bipartitions(), other.leaf_bipartitions());
}
