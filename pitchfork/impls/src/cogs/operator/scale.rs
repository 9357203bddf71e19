use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::Tree,
};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

/// Scales all internal node heights, or only the root multifurcation, by a
/// factor drawn uniformly from `[s, 1 / s]` where `s = min(scale_factor, 1 /
/// scale_factor)`.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeScale {
    scale_factor: PositiveF64,
    root_only: bool,
}

impl Default for TreeScale {
    fn default() -> Self {
        Self {
            scale_factor: unsafe { PositiveF64::new_unchecked(0.8_f64) },
            root_only: false,
        }
    }
}

impl TreeScale {
    #[must_use]
    pub fn new(scale_factor: PositiveF64, root_only: bool) -> Self {
        Self {
            scale_factor,
            root_only,
        }
    }

    #[must_use]
    pub fn root_only(&self) -> bool {
        self.root_only
    }

    /// Scales the tree like [`TreeOperator::propose`] and, by the same
    /// factor, every value in `parameters`, while `inverse_parameters` are
    /// divided by it. Each co-scaled value adds one dimension to the Hastings
    /// ratio and each inversely scaled value removes one.
    ///
    /// Parameters are only changed once the tree proposal is accepted as
    /// valid. Restoring them after a rejected step is up to the caller.
    pub fn propose_with_parameters<G: Rng>(
        &mut self,
        tree: &mut Tree,
        parameters: &mut [PositiveF64],
        inverse_parameters: &mut [PositiveF64],
        rng: &mut G,
    ) -> f64 {
        if tree.is_leaf(tree.root()) {
            return f64::NEG_INFINITY;
        }

        let min_factor = self.scale_factor.get().min(1.0_f64 / self.scale_factor.get());
        let factor = rng.sample_uniform_range(min_factor, 1.0_f64 / min_factor);

        let Some(scaled_nodes) = self.scale_tree(tree, factor) else {
            return f64::NEG_INFINITY;
        };

        let scaled = parameters
            .iter()
            .map(|parameter| PositiveF64::new(parameter.get() * factor))
            .collect::<Result<Vec<_>, _>>();
        let inverse_scaled = inverse_parameters
            .iter()
            .map(|parameter| PositiveF64::new(parameter.get() / factor))
            .collect::<Result<Vec<_>, _>>();

        let (Ok(scaled), Ok(inverse_scaled)) = (scaled, inverse_scaled) else {
            return f64::NEG_INFINITY;
        };

        parameters.copy_from_slice(&scaled);
        inverse_parameters.copy_from_slice(&inverse_scaled);

        #[allow(clippy::cast_precision_loss)]
        let dimensions = (scaled_nodes + parameters.len()) as f64 - inverse_parameters.len() as f64;

        // the factor proposal itself contributes -2 ln(f)
        (dimensions - 2.0_f64) * factor.ln()
    }

    /// Returns the number of scaled heights, or `None` if the scaled tree
    /// is invalid.
    fn scale_tree(&self, tree: &mut Tree, factor: f64) -> Option<usize> {
        let root = tree.root();

        if self.root_only {
            let new_height = factor * tree.height(root);

            if tree
                .logical_children(root)
                .into_iter()
                .any(|child| tree.height(child) >= new_height)
            {
                return None;
            }

            tree.set_logical_node_height(root, new_height);

            return Some(1);
        }

        let scaled_nodes = tree.true_internal_node_count();

        let internal_nodes = tree.internal_nodes().collect::<Vec<_>>();

        for node in internal_nodes {
            tree.set_height(node, factor * tree.height(node));
        }

        // only leaves keep their heights
        if tree.leaves().any(|leaf| {
            tree.parent(leaf)
                .map_or(false, |parent| tree.height(parent) <= tree.height(leaf))
        }) {
            return None;
        }

        Some(scaled_nodes)
    }
}

impl TreeOperator for TreeScale {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        self.propose_with_parameters(tree, &mut [], &mut [], rng)
    }

    fn preserves_event_count(&self) -> bool {
        true
    }
}
