use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::{NodeIndex, Tree},
};
use pitchfork_core_bond::{ClosedUnitF64, PositiveF64};
use serde::Deserialize;

/// Subtree-prune-regraft move that can both create and resolve
/// multifurcations.
///
/// A subtree hanging below a logical edge is pruned and reattached either
/// along an edge of the remaining tree (uniformly within finite edges,
/// exponentially above the root) or, with probability
/// `coalescent_attach_probability`, directly onto an existing coalescent
/// node of the remaining tree.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtreePruneRegraft {
    /// Mean of the exponential attachment height above the root, relative
    /// to the height of the highest node below.
    root_attach_lambda: PositiveF64,
    coalescent_attach_probability: ClosedUnitF64,
}

impl Default for SubtreePruneRegraft {
    fn default() -> Self {
        Self {
            root_attach_lambda: unsafe { PositiveF64::new_unchecked(2.0_f64) },
            coalescent_attach_probability: unsafe { ClosedUnitF64::new_unchecked(0.1_f64) },
        }
    }
}

impl SubtreePruneRegraft {
    #[must_use]
    pub fn new(
        root_attach_lambda: PositiveF64,
        coalescent_attach_probability: ClosedUnitF64,
    ) -> Self {
        Self {
            root_attach_lambda,
            coalescent_attach_probability,
        }
    }

    /// Logical nodes below `subtree_root` whose edge reaches above
    /// `min_height`.
    #[must_use]
    pub fn attachment_candidates(
        tree: &Tree,
        subtree_root: NodeIndex,
        min_height: f64,
    ) -> Vec<NodeIndex> {
        let mut candidates = Vec::new();
        let mut stack = vec![subtree_root];

        while let Some(node) = stack.pop() {
            if tree.is_logical_node(node) {
                candidates.push(node);
            }

            if tree.height(node) > min_height {
                stack.extend(tree.children(node));
            }
        }

        candidates
    }

    /// Log density of an edge attachment at `height` above the root of
    /// height `offset`.
    fn root_attach_log_density(&self, offset: f64, height: f64) -> f64 {
        let rate = 1.0_f64 / (self.root_attach_lambda.get() * offset);

        -rate * (height - offset) + rate.ln()
    }
}

impl TreeOperator for SubtreePruneRegraft {
    #[allow(clippy::too_many_lines)]
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        let p_coal = self.coalescent_attach_probability.get();

        let true_nodes = tree.true_nodes();

        #[allow(clippy::cast_precision_loss)]
        let edge_count = (true_nodes.len() - 1) as f64;

        let sources = true_nodes
            .into_iter()
            .filter(|node| !tree.is_root(*node))
            .collect::<Vec<_>>();

        let Some(&source) = rng.sample_choice(&sources) else {
            return f64::NEG_INFINITY;
        };
        let (Some(parent), Some(sister)) = (tree.parent(source), tree.sibling(source)) else {
            return f64::NEG_INFINITY;
        };

        let source_height = tree.height(source);
        let sister_height = tree.height(sister);

        let was_multifurcation = tree.is_polytomy(parent);

        let mut log_hastings_ratio = 0.0_f64;

        // Probability of the current attachment in the reverse move
        if was_multifurcation {
            log_hastings_ratio += p_coal.ln();
        } else {
            if !tree.is_leaf(sister) && sister_height > source_height {
                log_hastings_ratio += (1.0_f64 - p_coal).ln();
            }

            let offset = sister_height.max(source_height);

            match tree.parent(parent) {
                None if offset > 0.0_f64 => {
                    log_hastings_ratio +=
                        self.root_attach_log_density(offset, tree.height(parent));
                },
                None => return f64::NEG_INFINITY,
                Some(grandparent) => {
                    log_hastings_ratio -= (tree.height(grandparent) - offset).ln();
                },
            }
        }

        // Prune
        tree.detach(sister);

        match tree.parent(parent) {
            Some(grandparent) => {
                tree.detach(parent);
                tree.attach(grandparent, sister);
            },
            None => tree.set_root(sister),
        }

        let candidates = Self::attachment_candidates(tree, tree.root(), source_height);

        let Some(&target) = rng.sample_choice(&candidates) else {
            return f64::NEG_INFINITY;
        };
        let target_height = tree.height(target);

        let joins_multifurcation = if tree.is_leaf(target) || target_height <= source_height {
            false
        } else if rng.sample_event(p_coal) {
            log_hastings_ratio -= p_coal.ln();
            true
        } else {
            log_hastings_ratio -= (1.0_f64 - p_coal).ln();
            false
        };

        let attachment_height = if joins_multifurcation {
            target_height
        } else {
            let offset = target_height.max(source_height);

            match tree.parent(target) {
                None if offset > 0.0_f64 => {
                    let rate = 1.0_f64 / (self.root_attach_lambda.get() * offset);
                    let height = offset + rng.sample_exponential(rate);

                    log_hastings_ratio -= self.root_attach_log_density(offset, height);

                    height
                },
                None => return f64::NEG_INFINITY,
                Some(target_parent) => {
                    let length = tree.height(target_parent) - offset;

                    log_hastings_ratio += length.ln();

                    offset + rng.sample_uniform() * length
                },
            }
        };

        // Regraft
        tree.set_height(parent, attachment_height);

        match tree.parent(target) {
            Some(target_parent) => {
                tree.detach(target);
                tree.attach(target_parent, parent);
                tree.attach(parent, target);
            },
            None => {
                tree.attach(parent, target);
                tree.set_root(parent);
            },
        }

        // Selection of the pruned edge
        match (was_multifurcation, joins_multifurcation) {
            (true, false) => log_hastings_ratio += (edge_count / (edge_count + 1.0_f64)).ln(),
            (false, true) => log_hastings_ratio += (edge_count / (edge_count - 1.0_f64)).ln(),
            _ => (),
        }

        trace!(
            "Regrafted {source} at height {attachment_height} above {target} with log HR \
             {log_hastings_ratio}."
        );

        log_hastings_ratio
    }

    fn preserves_event_count(&self) -> bool {
        false
    }
}
