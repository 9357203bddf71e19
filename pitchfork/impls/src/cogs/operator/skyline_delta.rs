use pitchfork_core::{
    cogs::{EpochModel, Rng},
    tree::Tree,
};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

/// Sliding-window proposal on one of the log population size differences
/// that are active for the current tree.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkylineDelta {
    window_size: PositiveF64,
    lower: Option<f64>,
    upper: Option<f64>,
}

impl Default for SkylineDelta {
    fn default() -> Self {
        Self {
            window_size: PositiveF64::one(),
            lower: None,
            upper: None,
        }
    }
}

impl SkylineDelta {
    #[must_use]
    pub fn new(window_size: PositiveF64, lower: Option<f64>, upper: Option<f64>) -> Self {
        Self {
            window_size,
            lower,
            upper,
        }
    }

    /// Returns the log Hastings ratio of the move, which is zero unless it is
    /// rejected.
    pub fn propose<E: EpochModel, G: Rng>(&self, tree: &Tree, epochs: &mut E, rng: &mut G) -> f64 {
        let epoch_count = epochs.epoch_count(tree);

        if epoch_count <= 1 {
            return f64::NEG_INFINITY;
        }

        let index = rng.sample_index(epoch_count - 1);

        let delta = epochs.log_pop_size_delta(index)
            + self.window_size.get() * (rng.sample_uniform() - 0.5_f64);

        if self.lower.map_or(false, |lower| delta < lower)
            || self.upper.map_or(false, |upper| delta > upper)
        {
            return f64::NEG_INFINITY;
        }

        epochs.set_log_pop_size_delta(index, delta);

        0.0_f64
    }
}
