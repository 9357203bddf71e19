use pitchfork_core::{
    cogs::{Rng, TreeOperator},
    tree::Tree,
};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

/// Redraws the height of one logical internal node, together with its whole
/// multifurcation group, uniformly between its oldest logical child and its
/// parent. The root has no parent and is scaled instead.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniformHeight {
    scale_root: bool,
    scale_factor: PositiveF64,
}

impl Default for UniformHeight {
    fn default() -> Self {
        Self {
            scale_root: true,
            scale_factor: unsafe { PositiveF64::new_unchecked(0.8_f64) },
        }
    }
}

impl UniformHeight {
    #[must_use]
    pub fn new(scale_root: bool, scale_factor: PositiveF64) -> Self {
        Self {
            scale_root,
            scale_factor,
        }
    }
}

impl TreeOperator for UniformHeight {
    fn propose<G: Rng>(&mut self, tree: &mut Tree, rng: &mut G) -> f64 {
        let mut candidates = tree.true_internal_nodes();

        if !self.scale_root {
            candidates.retain(|node| !tree.is_root(*node));
        }

        let Some(&node) = rng.sample_choice(&candidates) else {
            return f64::NEG_INFINITY;
        };

        let min_height = tree
            .logical_children(node)
            .into_iter()
            .map(|child| tree.height(child))
            .fold(f64::NEG_INFINITY, f64::max);

        match tree.parent(node) {
            Some(parent) => {
                let new_height = rng.sample_uniform_range(min_height, tree.height(parent));

                tree.set_logical_node_height(node, new_height);

                0.0_f64
            },
            None => {
                let min_factor = self.scale_factor.get().min(1.0_f64 / self.scale_factor.get());
                let factor = rng.sample_uniform_range(min_factor, 1.0_f64 / min_factor);

                let new_height = tree.height(node) * factor;

                if new_height <= min_height {
                    return f64::NEG_INFINITY;
                }

                tree.set_logical_node_height(node, new_height);

                -factor.ln()
            },
        }
    }

    fn preserves_event_count(&self) -> bool {
        true
    }
}
