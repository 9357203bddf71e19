use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::{NodeIndex, Tree},
};
use pitchfork_core_bond::{ClosedUnitF64, PositiveF64};
use serde::Deserialize;

use super::ln_count;

/// Position at which a pruned edge is (or would be) reattached.
///
/// `edge_base` is the node below the attachment edge, or the coalescent node
/// being joined when `height` equals its height. `log_prob` is the log
/// probability density with which the slide reaches this point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttachmentPoint {
    pub edge_base: NodeIndex,
    pub height: f64,
    pub log_prob: f64,
}

/// Subtree slide for trees with multifurcations.
///
/// The attachment point of a logical edge walks up or down the tree with an
/// exponential sojourn of rate `1 / (relative_window * root_height)` and
/// stops at every coalescent node it meets with probability
/// `coalescent_attach_probability`.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtreeSlide {
    relative_window: PositiveF64,
    coalescent_attach_probability: ClosedUnitF64,
}

impl Default for SubtreeSlide {
    fn default() -> Self {
        Self {
            relative_window: unsafe { PositiveF64::new_unchecked(0.15_f64) },
            coalescent_attach_probability: unsafe { ClosedUnitF64::new_unchecked(0.1_f64) },
        }
    }
}

impl SubtreeSlide {
    #[must_use]
    pub fn new(relative_window: PositiveF64, coalescent_attach_probability: ClosedUnitF64) -> Self {
        Self {
            relative_window,
            coalescent_attach_probability,
        }
    }

    /// Rate of the exponential sojourn along edges of `tree`.
    #[must_use]
    pub fn lambda(&self, tree: &Tree) -> f64 {
        1.0_f64 / (self.relative_window.get() * tree.root_height())
    }

    /// Walks rootwards from the edge above the logical node `start`.
    pub fn sample_older_attachment<G: Rng>(
        &self,
        tree: &Tree,
        start: NodeIndex,
        rng: &mut G,
    ) -> AttachmentPoint {
        let lambda = self.lambda(tree);
        let p_coal = self.coalescent_attach_probability.get();

        let mut edge_base = start;
        let mut log_prob = 0.0_f64;

        loop {
            let Some(logical_parent) = tree.logical_parent(edge_base) else {
                let delta = rng.sample_exponential(lambda);

                return AttachmentPoint {
                    edge_base,
                    height: tree.height(edge_base) + delta,
                    log_prob: log_prob - lambda * delta + lambda.ln(),
                };
            };

            if rng.sample_event(p_coal) {
                return AttachmentPoint {
                    edge_base: logical_parent,
                    height: tree.height(logical_parent),
                    log_prob: log_prob + p_coal.ln(),
                };
            }

            log_prob += (1.0_f64 - p_coal).ln();

            let delta = rng.sample_exponential(lambda);
            let length = tree.branch_length(edge_base);

            if delta < length {
                return AttachmentPoint {
                    edge_base,
                    height: tree.height(edge_base) + delta,
                    log_prob: log_prob - lambda * delta + lambda.ln(),
                };
            }

            log_prob -= lambda * length;
            edge_base = logical_parent;
        }
    }

    /// Log probability that [`Self::sample_older_attachment`] from `start`
    /// stops at `height`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn older_attachment_log_prob(&self, tree: &Tree, height: f64, start: NodeIndex) -> f64 {
        let lambda = self.lambda(tree);
        let p_coal = self.coalescent_attach_probability.get();

        let mut edge_base = start;
        let mut log_prob = 0.0_f64;

        loop {
            let Some(logical_parent) = tree.logical_parent(edge_base) else {
                return log_prob - lambda * (height - tree.height(edge_base)) + lambda.ln();
            };

            let parent_height = tree.height(logical_parent);

            if height == parent_height {
                return log_prob + p_coal.ln();
            }

            if height < parent_height {
                return log_prob + (1.0_f64 - p_coal).ln()
                    - lambda * (height - tree.height(edge_base))
                    + lambda.ln();
            }

            log_prob += (1.0_f64 - p_coal).ln() - lambda * tree.branch_length(edge_base);
            edge_base = logical_parent;
        }
    }

    /// Walks leafwards from the logical node `start`, avoiding the edge
    /// above `edge_base`, and returns `None` if the walk runs off a leaf or
    /// ends below `edge_base`.
    pub fn sample_younger_attachment<G: Rng>(
        &self,
        tree: &Tree,
        edge_base: NodeIndex,
        start: NodeIndex,
        rng: &mut G,
    ) -> Option<AttachmentPoint> {
        let lambda = self.lambda(tree);
        let p_coal = self.coalescent_attach_probability.get();

        let mut current = start;
        let mut log_prob = 0.0_f64;

        let (attachment_edge, height) = loop {
            let mut logical_children = tree.logical_children(current);

            if current == start {
                logical_children.retain(|child| *child != edge_base);
            }

            let child = *rng.sample_choice(&logical_children)?;
            log_prob -= ln_count(logical_children.len());

            if !tree.is_leaf(child) {
                if rng.sample_event(p_coal) {
                    log_prob += p_coal.ln();

                    break (child, tree.height(child));
                }

                log_prob += (1.0_f64 - p_coal).ln();
            }

            let delta = rng.sample_exponential(lambda);
            let length = tree.branch_length(child);

            if delta < length {
                log_prob += -lambda * delta + lambda.ln();

                break (child, tree.height(child) + length - delta);
            }

            if tree.is_leaf(child) {
                return None;
            }

            log_prob -= lambda * length;
            current = child;
        };

        if height <= tree.height(edge_base) {
            return None;
        }

        Some(AttachmentPoint {
            edge_base: attachment_edge,
            height,
            log_prob,
        })
    }

    /// Log probability that [`Self::sample_younger_attachment`] from `start`
    /// stops at `height` on the edge above (or at the node) `attachment_edge`.
    #[must_use]
    pub fn younger_attachment_log_prob(
        &self,
        tree: &Tree,
        attachment_edge: NodeIndex,
        height: f64,
        start: NodeIndex,
    ) -> f64 {
        let lambda = self.lambda(tree);
        let p_coal = self.coalescent_attach_probability.get();

        let mut current = attachment_edge;
        let mut log_prob = 0.0_f64;

        loop {
            let current_height = tree.height(current);

            if current_height < height {
                let parent_height = tree.parent(current).map_or(height, |p| tree.height(p));

                log_prob += -lambda * (parent_height - height) + lambda.ln();

                if !tree.is_leaf(current) {
                    log_prob += (1.0_f64 - p_coal).ln();
                }
            } else if current_height > height {
                log_prob += (1.0_f64 - p_coal).ln() - lambda * tree.branch_length(current);
            } else {
                log_prob += p_coal.ln();
            }

            let Some(logical_parent) = tree.logical_parent(current) else {
                return f64::NEG_INFINITY;
            };
            current = logical_parent;

            let logical_children = tree.logical_children(current).len();

            if current == start {
                return log_prob - ln_count(logical_children - 1);
            }

            log_prob -= ln_count(logical_children);
        }
    }

    fn slide_up<G: Rng>(&self, tree: &mut Tree, edge_base: NodeIndex, rng: &mut G) -> f64 {
        let (Some(parent), Some(sister)) = (tree.parent(edge_base), tree.sibling(edge_base)) else {
            return f64::NEG_INFINITY;
        };

        let start = tree.logical_node(parent);
        let attachment = self.sample_older_attachment(tree, start, rng);

        // Multifurcation attachments refer to the oldest node of the group
        let old_height = tree.height(parent);
        let old_edge = if tree.is_polytomy(parent) && start != parent {
            start
        } else {
            sister
        };

        if attachment.edge_base != parent {
            let Some(grandparent) = tree.parent(parent) else {
                return f64::NEG_INFINITY;
            };

            tree.detach(parent);
            tree.detach(sister);
            tree.attach(grandparent, sister);

            match tree.parent(attachment.edge_base) {
                Some(new_grandparent) => {
                    tree.detach(attachment.edge_base);
                    tree.attach(new_grandparent, parent);
                    tree.attach(parent, attachment.edge_base);
                },
                None => {
                    tree.attach(parent, attachment.edge_base);
                    tree.set_root(parent);
                },
            }
        }

        tree.set_height(parent, attachment.height);

        self.younger_attachment_log_prob(tree, old_edge, old_height, parent) - attachment.log_prob
    }

    fn slide_down<G: Rng>(&self, tree: &mut Tree, edge_base: NodeIndex, rng: &mut G) -> f64 {
        let (Some(parent), Some(sister)) = (tree.parent(edge_base), tree.sibling(edge_base)) else {
            return f64::NEG_INFINITY;
        };

        let start = tree.logical_node(parent);

        let Some(attachment) = self.sample_younger_attachment(tree, edge_base, start, rng) else {
            trace!("Subtree slide below {start} ran off the tree.");

            return f64::NEG_INFINITY;
        };

        let old_height = tree.height(parent);

        if attachment.edge_base != sister {
            match tree.parent(parent) {
                Some(grandparent) => {
                    tree.detach(parent);
                    tree.detach(sister);
                    tree.attach(grandparent, sister);
                },
                None => {
                    tree.detach(sister);
                    tree.set_root(sister);
                },
            }

            let Some(new_grandparent) = tree.parent(attachment.edge_base) else {
                return f64::NEG_INFINITY;
            };

            tree.detach(attachment.edge_base);
            tree.attach(new_grandparent, parent);
            tree.attach(parent, attachment.edge_base);
        }

        tree.set_height(parent, attachment.height);

        self.older_attachment_log_prob(tree, old_height, parent) - attachment.log_prob
    }
}

impl TreeOperator for SubtreeSlide {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        if tree.root_height() <= 0.0_f64 {
            return f64::NEG_INFINITY;
        }

        let edges = tree
            .true_nodes()
            .into_iter()
            .filter(|node| !tree.is_root(*node))
            .collect::<Vec<_>>();

        let Some(&edge_base) = rng.sample_choice(&edges) else {
            return f64::NEG_INFINITY;
        };

        let log_slide_ratio = if rng.sample_coin_flip() {
            self.slide_up(tree, edge_base, rng)
        } else {
            self.slide_down(tree, edge_base, rng)
        };

        if log_slide_ratio == f64::NEG_INFINITY {
            return log_slide_ratio;
        }

        ln_count(edges.len()) + log_slide_ratio - ln_count(tree.true_nodes().len() - 1)
    }

    fn preserves_event_count(&self) -> bool {
        false
    }
}
