use core::fmt;

use serde::{Deserialize, Serialize};

mod builder;
mod journal;
mod logical;

pub use builder::{TreeBuildError, TreeBuilder};

use journal::TreeEdit;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Node {
    height: f64,
    parent: Option<NodeIndex>,
    children: [Option<NodeIndex>; 2],
    label: Option<String>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.label.is_some()
    }
}

/// Rooted binary tree stored as an arena of height-labelled nodes.
///
/// Multifurcations are encoded as groups of nodes joined by zero-length
/// edges. All structural edits go through [`Tree::set_height`],
/// [`Tree::attach`], [`Tree::detach`] and [`Tree::set_root`], which bump the
/// [`Tree::generation`] and, between [`Tree::checkpoint`] and
/// [`Tree::commit`], record their inverse so that [`Tree::rollback`] can
/// restore the checkpointed tree exactly.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeIndex,
    leaf_count: usize,
    generation: u64,
    journal: Vec<TreeEdit>,
    recording: bool,
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.nodes == other.nodes
    }
}

impl Tree {
    #[must_use]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[must_use]
    pub fn root_height(&self) -> f64 {
        self.height(self.root)
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    #[must_use]
    pub fn internal_node_count(&self) -> usize {
        self.nodes.len() - self.leaf_count
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes().filter(move |node| self.is_leaf(*node))
    }

    pub fn internal_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes().filter(move |node| !self.is_leaf(*node))
    }

    #[must_use]
    pub fn height(&self, node: NodeIndex) -> f64 {
        self.nodes[node.0].height
    }

    #[must_use]
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes[node.0].children.iter().filter_map(|child| *child)
    }

    /// Returns the other child of `node`'s parent, if both are attached.
    #[must_use]
    pub fn sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(node)?;

        self.children(parent).find(|child| *child != node)
    }

    #[must_use]
    pub fn is_leaf(&self, node: NodeIndex) -> bool {
        self.nodes[node.0].is_leaf()
    }

    #[must_use]
    pub fn is_root(&self, node: NodeIndex) -> bool {
        node == self.root
    }

    /// Length of the edge above `node`, `0.0` for a parentless node.
    #[must_use]
    pub fn branch_length(&self, node: NodeIndex) -> f64 {
        match self.parent(node) {
            Some(parent) => self.height(parent) - self.height(node),
            None => 0.0_f64,
        }
    }

    #[must_use]
    pub fn label(&self, node: NodeIndex) -> Option<&str> {
        self.nodes[node.0].label.as_deref()
    }

    #[debug_requires(height >= 0.0 && height.is_finite(), "height is non-negative and finite")]
    pub fn set_height(&mut self, node: NodeIndex, height: f64) {
        let previous = core::mem::replace(&mut self.nodes[node.0].height, height);

        self.record(TreeEdit::Height { node, previous });
    }

    #[debug_requires(self.parent(child).is_some(), "child is attached")]
    #[debug_ensures(self.parent(child).is_none(), "child is detached")]
    pub fn detach(&mut self, child: NodeIndex) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            if let Some(slot) = self.slot_of(parent, child) {
                self.nodes[parent.0].children[slot] = None;

                self.record(TreeEdit::Detach {
                    parent,
                    child,
                    slot,
                });
            }
        }
    }

    #[debug_requires(self.parent(child).is_none(), "child is detached")]
    #[debug_requires(!self.is_leaf(parent), "parent is an internal node")]
    #[debug_requires(self.children(parent).count() < 2, "parent has a free child slot")]
    #[debug_ensures(self.parent(child) == Some(parent), "child is attached to parent")]
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(slot) = self.nodes[parent.0]
            .children
            .iter()
            .position(Option::is_none)
        {
            self.nodes[parent.0].children[slot] = Some(child);
            self.nodes[child.0].parent = Some(parent);

            self.record(TreeEdit::Attach {
                parent,
                child,
                slot,
            });
        }
    }

    #[debug_requires(self.parent(root).is_none(), "new root has no parent")]
    pub fn set_root(&mut self, root: NodeIndex) {
        let previous = core::mem::replace(&mut self.root, root);

        self.record(TreeEdit::Root { previous });
    }

    /// Checks that the tree is a single connected binary tree hanging from
    /// its root in which no node is older than its parent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.parent(self.root).is_some() {
            return false;
        }

        let mut visited = 0_usize;
        let mut stack = vec![self.root];

        while let Some(node) = stack.pop() {
            visited += 1;

            if visited > self.nodes.len() {
                return false;
            }

            let height = self.height(node);

            if !(height.is_finite() && height >= 0.0) {
                return false;
            }

            let children = self.nodes[node.0].children;

            match (self.is_leaf(node), children) {
                (true, [None, None]) => (),
                (false, [Some(left), Some(right)]) => {
                    for child in [left, right] {
                        if self.parent(child) != Some(node) || self.height(child) > height {
                            return false;
                        }

                        stack.push(child);
                    }
                },
                _ => return false,
            }
        }

        visited == self.nodes.len()
    }

    fn slot_of(&self, parent: NodeIndex, child: NodeIndex) -> Option<usize> {
        self.nodes[parent.0]
            .children
            .iter()
            .position(|slot| *slot == Some(child))
    }
}

#[cfg(test)]
mod tests;
