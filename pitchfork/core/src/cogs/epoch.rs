use crate::tree::Tree;

/// Demographic model whose epochs are delimited by counts of coalescent
/// events, so that topology moves may change the number of epochs.
///
/// Epoch `i > 0` is parameterised by the log population size difference
/// stored at index `i - 1`.
#[allow(clippy::module_name_repetitions)]
pub trait EpochModel {
    #[must_use]
    fn epoch_count(&mut self, tree: &Tree) -> usize;

    #[must_use]
    fn log_pop_size_delta(&self, index: usize) -> f64;

    fn set_log_pop_size_delta(&mut self, index: usize, delta: f64);
}
