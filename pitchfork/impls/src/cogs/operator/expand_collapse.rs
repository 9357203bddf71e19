use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::{NodeIndex, Tree},
};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

use super::ln_count;

/// Reversible jump between binary and multifurcating resolutions of a node.
///
/// A collapse moves the parent of a logical edge down onto its sister's
/// coalescent node. An expansion pulls a child of a multifurcation out of
/// its group onto a fresh node above the multifurcation.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpandCollapse {
    /// Mean of the exponential expansion height above a root
    /// multifurcation, relative to its height.
    root_attach_lambda: PositiveF64,
}

impl Default for ExpandCollapse {
    fn default() -> Self {
        Self {
            root_attach_lambda: unsafe { PositiveF64::new_unchecked(0.1_f64) },
        }
    }
}

impl ExpandCollapse {
    #[must_use]
    pub fn new(root_attach_lambda: PositiveF64) -> Self {
        Self { root_attach_lambda }
    }

    /// Logical edges whose parent is a binary node and whose sister is a
    /// strictly older internal node.
    #[must_use]
    pub fn collapsible_edges(tree: &Tree) -> Vec<NodeIndex> {
        tree.true_nodes()
            .into_iter()
            .filter(
                |node| match (tree.parent(*node), tree.sibling(*node)) {
                    (Some(parent), Some(sister)) => {
                        !tree.is_polytomy(parent)
                            && !tree.is_leaf(sister)
                            && tree.height(sister) > tree.height(*node)
                    },
                    _ => false,
                },
            )
            .collect()
    }

    /// Logical edges hanging off a multifurcation.
    #[must_use]
    pub fn expandable_edges(tree: &Tree) -> Vec<NodeIndex> {
        tree.true_nodes()
            .into_iter()
            .filter(|node| {
                tree.parent(*node)
                    .map_or(false, |parent| tree.is_polytomy(parent))
            })
            .collect()
    }

    /// Collapses the parent of `edge` onto its sister and returns the log
    /// Hastings ratio, excluding the probability of having selected `edge`.
    pub fn collapse(&self, tree: &mut Tree, edge: NodeIndex) -> f64 {
        let (Some(parent), Some(sister)) = (tree.parent(edge), tree.sibling(edge)) else {
            return f64::NEG_INFINITY;
        };

        let sister_height = tree.height(sister);

        let mut log_hastings_ratio = match tree.parent(parent) {
            None if sister_height > 0.0_f64 => {
                let rate = 1.0_f64 / (self.root_attach_lambda.get() * sister_height);

                -rate * (tree.height(parent) - sister_height) + rate.ln()
            },
            None => return f64::NEG_INFINITY,
            Some(grandparent) => -(tree.height(grandparent) - sister_height).ln(),
        };

        tree.set_height(parent, sister_height);

        log_hastings_ratio -= ln_count(Self::expandable_edges(tree).len());

        debug!("Collapsed {parent} onto {sister} at height {sister_height}.");

        log_hastings_ratio
    }

    /// Expands `edge` out of its multifurcation onto a new node at `height`
    /// and returns the log Hastings ratio, excluding the probability of having
    /// selected `edge`.
    pub fn expand(&self, tree: &mut Tree, edge: NodeIndex, height: f64) -> f64 {
        let Some(logical_parent) = tree.logical_parent(edge) else {
            return f64::NEG_INFINITY;
        };

        let Some(log_density) = self.expansion_log_density(tree, logical_parent, height) else {
            return f64::NEG_INFINITY;
        };

        let mut log_hastings_ratio = -log_density;

        let (Some(node_to_move), Some(sister)) = (tree.parent(edge), tree.sibling(edge)) else {
            return f64::NEG_INFINITY;
        };

        // Splice the parent of the edge out of the multifurcation
        tree.detach(sister);

        match tree.parent(node_to_move) {
            Some(grandparent) => {
                tree.detach(node_to_move);
                tree.attach(grandparent, sister);
            },
            None => tree.set_root(sister),
        }

        let group_top = if node_to_move == logical_parent {
            sister
        } else {
            logical_parent
        };

        // and reinsert it above the multifurcation
        match tree.parent(group_top) {
            Some(grandparent) => {
                tree.detach(group_top);
                tree.attach(grandparent, node_to_move);
                tree.attach(node_to_move, group_top);
            },
            None => {
                tree.attach(node_to_move, group_top);
                tree.set_root(node_to_move);
            },
        }

        tree.set_height(node_to_move, height);

        log_hastings_ratio -= ln_count(Self::collapsible_edges(tree).len());

        debug!("Expanded {edge} out of {group_top} to height {height}.");

        log_hastings_ratio
    }

    /// Log density of expanding a child of `logical_parent` to `height`, or
    /// `None` if no expansion above `logical_parent` is possible.
    fn expansion_log_density(
        &self,
        tree: &Tree,
        logical_parent: NodeIndex,
        height: f64,
    ) -> Option<f64> {
        let base_height = tree.height(logical_parent);

        match tree.parent(logical_parent) {
            None if base_height > 0.0_f64 => {
                let rate = 1.0_f64 / (self.root_attach_lambda.get() * base_height);

                Some(-rate * (height - base_height) + rate.ln())
            },
            None => None,
            Some(parent) => Some(-(tree.height(parent) - base_height).ln()),
        }
    }

    fn sample_expansion_height<G: Rng>(
        &self,
        tree: &Tree,
        logical_parent: NodeIndex,
        rng: &mut G,
    ) -> Option<f64> {
        let base_height = tree.height(logical_parent);

        match tree.parent(logical_parent) {
            None if base_height > 0.0_f64 => Some(
                base_height
                    + rng.sample_exponential(
                        1.0_f64 / (self.root_attach_lambda.get() * base_height),
                    ),
            ),
            None => None,
            Some(parent) => Some(rng.sample_uniform_range(base_height, tree.height(parent))),
        }
    }
}

impl TreeOperator for ExpandCollapse {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        if rng.sample_coin_flip() {
            let edges = Self::collapsible_edges(tree);

            let Some(&edge) = rng.sample_choice(&edges) else {
                return f64::NEG_INFINITY;
            };

            ln_count(edges.len()) + self.collapse(tree, edge)
        } else {
            let edges = Self::expandable_edges(tree);

            let Some(&edge) = rng.sample_choice(&edges) else {
                return f64::NEG_INFINITY;
            };
            let Some(logical_parent) = tree.logical_parent(edge) else {
                return f64::NEG_INFINITY;
            };
            let Some(height) = self.sample_expansion_height(tree, logical_parent, rng) else {
                return f64::NEG_INFINITY;
            };

            ln_count(edges.len()) + self.expand(tree, edge, height)
        }
    }

    fn preserves_event_count(&self) -> bool {
        false
    }
}
