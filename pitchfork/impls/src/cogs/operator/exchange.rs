use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::{NodeIndex, Tree},
};
use serde::Deserialize;

use super::ln_count;

/// Narrow exchange of a logical node with a logical child of its logical
/// grandparent.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NarrowExchange;

impl NarrowExchange {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Logical nodes that have a logical grandparent.
    #[must_use]
    pub fn exchangeable_nodes(tree: &Tree) -> Vec<NodeIndex> {
        tree.true_nodes()
            .into_iter()
            .filter(|node| {
                tree.logical_parent(*node)
                    .and_then(|parent| tree.logical_parent(parent))
                    .is_some()
            })
            .collect()
    }
}

impl TreeOperator for NarrowExchange {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        if tree.true_internal_node_count() <= 1 {
            return f64::NEG_INFINITY;
        }

        let sources = Self::exchangeable_nodes(tree);

        let Some(&source) = rng.sample_choice(&sources) else {
            return f64::NEG_INFINITY;
        };

        let (Some(source_parent), Some(source_logical_parent)) =
            (tree.parent(source), tree.logical_parent(source))
        else {
            return f64::NEG_INFINITY;
        };
        let Some(grandparent) = tree.logical_parent(source_logical_parent) else {
            return f64::NEG_INFINITY;
        };

        let destinations = tree
            .logical_children(grandparent)
            .into_iter()
            .filter(|node| *node != source_logical_parent)
            .collect::<Vec<_>>();

        let Some(&destination) = rng.sample_choice(&destinations) else {
            return f64::NEG_INFINITY;
        };
        let Some(destination_parent) = tree.parent(destination) else {
            return f64::NEG_INFINITY;
        };

        if tree.height(destination) >= tree.height(source_parent)
            || tree.height(source) >= tree.height(destination_parent)
        {
            trace!("Narrow exchange of {source} and {destination} would create a non-positive edge.");

            return f64::NEG_INFINITY;
        }

        tree.detach(source);
        tree.detach(destination);
        tree.attach(source_parent, destination);
        tree.attach(destination_parent, source);

        let reverse_sources = Self::exchangeable_nodes(tree).len();
        let reverse_destinations = tree.logical_children(grandparent).len() - 1;

        ln_count(sources.len()) - ln_count(reverse_sources) + ln_count(destinations.len())
            - ln_count(reverse_destinations)
    }

    fn preserves_event_count(&self) -> bool {
        true
    }
}
