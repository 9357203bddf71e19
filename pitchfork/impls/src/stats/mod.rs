use pitchfork_core::tree::Tree;

/// Summary of the multifurcations in a tree.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolytomyStats {
    polytomy_count: usize,
    // order_histogram[i] counts the logical nodes with i + 2 logical children
    order_histogram: Vec<usize>,
}

impl PolytomyStats {
    /// Counts the multifurcations of `tree` and tallies the logical internal
    /// nodes by their number of logical children, up to `max_order` (capped
    /// at the number of leaves). Nodes of a higher order are only counted as
    /// multifurcations.
    #[must_use]
    pub fn from_tree(tree: &Tree, max_order: Option<usize>) -> Self {
        let max_order = max_order.map_or(tree.leaf_count(), |max_order| {
            max_order.min(tree.leaf_count())
        });

        let mut polytomy_count = 0_usize;
        let mut order_histogram = vec![0_usize; max_order.saturating_sub(1)];

        for node in tree.true_internal_nodes() {
            let order = tree.logical_children(node).len();

            if order > 2 {
                polytomy_count += 1;
            }

            if let Some(count) = order
                .checked_sub(2)
                .and_then(|bin| order_histogram.get_mut(bin))
            {
                *count += 1;
            }
        }

        Self {
            polytomy_count,
            order_histogram,
        }
    }

    #[must_use]
    pub fn polytomy_count(&self) -> usize {
        self.polytomy_count
    }

    /// Number of logical internal nodes with exactly `order` logical
    /// children.
    #[must_use]
    pub fn nodes_of_order(&self, order: usize) -> usize {
        order
            .checked_sub(2)
            .and_then(|bin| self.order_histogram.get(bin))
            .copied()
            .unwrap_or(0)
    }

    /// Counts of logical internal nodes of order `2, 3, ..., max_order`.
    #[must_use]
    pub fn order_histogram(&self) -> &[usize] {
        &self.order_histogram
    }

    #[must_use]
    pub fn max_order(&self) -> usize {
        self.order_histogram.len() + 1
    }
}

#[cfg(test)]
mod tests;
