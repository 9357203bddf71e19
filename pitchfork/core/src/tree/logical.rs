use super::{NodeIndex, Tree};

/// Queries that treat groups of nodes joined by zero-length edges as a single
/// multifurcating logical node, represented by the oldest member of the
/// group.
impl Tree {
    /// A node is logical iff it is the root or strictly younger than its
    /// parent.
    #[must_use]
    pub fn is_logical_node(&self, node: NodeIndex) -> bool {
        match self.parent(node) {
            Some(parent) => self.height(parent) > self.height(node),
            None => true,
        }
    }

    /// Returns the representative of the group that `node` belongs to.
    #[must_use]
    #[debug_ensures(self.is_logical_node(ret), "returns a logical node")]
    pub fn logical_node(&self, node: NodeIndex) -> NodeIndex {
        let mut node = node;

        while let Some(parent) = self.parent(node) {
            if self.height(parent) > self.height(node) {
                break;
            }

            node = parent;
        }

        node
    }

    #[must_use]
    pub fn logical_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parent(node).map(|parent| self.logical_node(parent))
    }

    /// Collects the other members of `node`'s group that descend from `node`
    /// into `group`, and the nearest descendants reached through positive
    /// length edges into `logical_children`.
    pub fn collect_group_and_logical_children(
        &self,
        node: NodeIndex,
        group: &mut Vec<NodeIndex>,
        logical_children: &mut Vec<NodeIndex>,
    ) {
        let height = self.height(node);

        for child in self.children(node) {
            if self.height(child) >= height {
                group.push(child);

                self.collect_group_and_logical_children(child, group, logical_children);
            } else {
                logical_children.push(child);
            }
        }
    }

    #[must_use]
    pub fn group_and_logical_children(&self, node: NodeIndex) -> (Vec<NodeIndex>, Vec<NodeIndex>) {
        let mut group = Vec::new();
        let mut logical_children = Vec::new();

        self.collect_group_and_logical_children(node, &mut group, &mut logical_children);

        (group, logical_children)
    }

    /// Group members descending from `node`, excluding `node` itself.
    #[must_use]
    pub fn group(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.group_and_logical_children(node).0
    }

    #[must_use]
    pub fn logical_children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.group_and_logical_children(node).1
    }

    /// True iff `node` belongs to a group of two or more nodes.
    #[must_use]
    pub fn is_polytomy(&self, node: NodeIndex) -> bool {
        let height = self.height(node);

        self.parent(node)
            .map_or(false, |parent| self.height(parent) <= height)
            || self.children(node).any(|child| self.height(child) >= height)
    }

    /// All logical internal nodes followed by all leaves.
    #[must_use]
    pub fn true_nodes(&self) -> Vec<NodeIndex> {
        let mut true_nodes = self.true_internal_nodes();
        true_nodes.extend(self.leaves());
        true_nodes
    }

    #[must_use]
    pub fn true_internal_nodes(&self) -> Vec<NodeIndex> {
        self.internal_nodes()
            .filter(|node| self.is_logical_node(*node))
            .collect()
    }

    /// Number of logical internal nodes, i.e. of distinct coalescent events.
    #[must_use]
    pub fn true_internal_node_count(&self) -> usize {
        self.internal_nodes()
            .filter(|node| self.is_logical_node(*node))
            .count()
    }

    /// Moves the whole group of `node` to `height`.
    pub fn set_logical_node_height(&mut self, node: NodeIndex, height: f64) {
        let logical_node = self.logical_node(node);
        let group = self.group(logical_node);

        self.set_height(logical_node, height);

        for member in group {
            self.set_height(member, height);
        }
    }

    /// Leaves descending from `node`, sorted by index.
    #[must_use]
    pub fn leaves_below(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut leaves = Vec::new();
        let mut stack = vec![node];

        while let Some(node) = stack.pop() {
            if self.is_leaf(node) {
                leaves.push(node);
            } else {
                stack.extend(self.children(node));
            }
        }

        leaves.sort_unstable();
        leaves
    }

    /// The sorted set of leaf clusters induced by the logical internal
    /// nodes, which identifies the multifurcating topology.
    #[must_use]
    pub fn leaf_bipartitions(&self) -> Vec<Vec<NodeIndex>> {
        let mut clusters = self
            .true_internal_nodes()
            .into_iter()
            .map(|node| self.leaves_below(node))
            .collect::<Vec<_>>();

        clusters.sort_unstable();
        clusters
    }
}
