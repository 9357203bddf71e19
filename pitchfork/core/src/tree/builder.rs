use pitchfork_core_bond::{NonNegativeF64, NonNegativeF64Error};
use thiserror::Error;

use super::{Node, NodeIndex, Tree};

#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TreeBuildError {
    #[error("Invalid node height: {0}")]
    InvalidHeight(NonNegativeF64Error),
    #[error("Node {0} does not exist.")]
    UnknownNode(NodeIndex),
    #[error("Node {0} already has a parent.")]
    AlreadyAttached(NodeIndex),
    #[error("Child {child} at height {child_height} is older than its parent at height {height}.")]
    ChildAboveParent {
        child: NodeIndex,
        child_height: f64,
        height: f64,
    },
    #[error("A multifurcation needs at least two children, got {0}.")]
    TooFewChildren(usize),
    #[error("Only {reachable} of the {total} nodes are reachable from the root.")]
    Disconnected { reachable: usize, total: usize },
}

/// Incrementally assembles a [`Tree`] from the leaves up.
///
/// Multifurcations are expanded into ladders of binary nodes with
/// zero-length edges between them.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `InvalidHeight` if `height` is negative or NaN.
    pub fn leaf<L: Into<String>>(
        &mut self,
        label: L,
        height: f64,
    ) -> Result<NodeIndex, TreeBuildError> {
        let height = NonNegativeF64::new(height).map_err(TreeBuildError::InvalidHeight)?;

        self.nodes.push(Node {
            height: height.get(),
            parent: None,
            children: [None, None],
            label: Some(label.into()),
        });

        Ok(NodeIndex(self.nodes.len() - 1))
    }

    /// # Errors
    ///
    /// Returns `InvalidHeight` if `height` is negative or NaN, or an error if
    /// either child does not exist, already has a parent, or is older than
    /// `height`.
    pub fn internal(
        &mut self,
        height: f64,
        left: NodeIndex,
        right: NodeIndex,
    ) -> Result<NodeIndex, TreeBuildError> {
        let height = NonNegativeF64::new(height)
            .map_err(TreeBuildError::InvalidHeight)?
            .get();

        for child in [left, right] {
            let node = self
                .nodes
                .get(child.0)
                .ok_or(TreeBuildError::UnknownNode(child))?;

            if node.parent.is_some() || left == right {
                return Err(TreeBuildError::AlreadyAttached(child));
            }

            if node.height > height {
                return Err(TreeBuildError::ChildAboveParent {
                    child,
                    child_height: node.height,
                    height,
                });
            }
        }

        let index = NodeIndex(self.nodes.len());

        self.nodes.push(Node {
            height,
            parent: None,
            children: [Some(left), Some(right)],
            label: None,
        });

        self.nodes[left.0].parent = Some(index);
        self.nodes[right.0].parent = Some(index);

        Ok(index)
    }

    /// Joins all `children` at `height` through a ladder of binary nodes and
    /// returns the top of the ladder.
    ///
    /// # Errors
    ///
    /// Returns `TooFewChildren` if fewer than two children are given, or any
    /// error of [`TreeBuilder::internal`].
    pub fn polytomy(
        &mut self,
        height: f64,
        children: &[NodeIndex],
    ) -> Result<NodeIndex, TreeBuildError> {
        match children {
            [first, second, rest @ ..] => {
                let mut top = self.internal(height, *first, *second)?;

                for child in rest {
                    top = self.internal(height, top, *child)?;
                }

                Ok(top)
            },
            _ => Err(TreeBuildError::TooFewChildren(children.len())),
        }
    }

    /// # Errors
    ///
    /// Returns `AlreadyAttached` if `root` has a parent, or `Disconnected` if
    /// not every node is a descendant of `root`.
    pub fn build(self, root: NodeIndex) -> Result<Tree, TreeBuildError> {
        let root_node = self
            .nodes
            .get(root.0)
            .ok_or(TreeBuildError::UnknownNode(root))?;

        if root_node.parent.is_some() {
            return Err(TreeBuildError::AlreadyAttached(root));
        }

        let leaf_count = self.nodes.iter().filter(|node| node.is_leaf()).count();

        let tree = Tree {
            nodes: self.nodes,
            root,
            leaf_count,
            generation: 0,
            journal: Vec::new(),
            recording: false,
        };

        if !tree.is_valid() {
            let mut reachable = 0_usize;
            let mut stack = vec![root];

            while let Some(node) = stack.pop() {
                reachable += 1;
                stack.extend(tree.children(node));
            }

            return Err(TreeBuildError::Disconnected {
                reachable,
                total: tree.node_count(),
            });
        }

        Ok(tree)
    }
}
