use crate::tree::Tree;

/// Effective population size through time, measured backwards from the
/// present at `t = 0`.
#[allow(clippy::module_name_repetitions)]
#[allow(clippy::inline_always, clippy::inline_fn_without_body)]
#[contract_trait]
pub trait PopulationFunction: core::fmt::Debug {
    #[must_use]
    #[debug_ensures(ret > 0.0, "population sizes are positive")]
    fn pop_size(&self, t: f64) -> f64;

    /// Integral of `1 / pop_size` from `0` to `t`.
    #[must_use]
    fn intensity(&self, t: f64) -> f64;

    #[must_use]
    fn inverse_intensity(&self, x: f64) -> f64;

    #[must_use]
    fn integral(&self, start: f64, finish: f64) -> f64 {
        self.intensity(finish) - self.intensity(start)
    }

    /// Updates any state derived from the tree, e.g. epoch boundaries.
    fn refresh(&mut self, tree: &Tree) {
        let _ = tree;
    }
}
