use core::num::NonZeroUsize;

use pitchfork_core::{
    cogs::{Backup, EpochModel, PopulationFunction},
    tree::Tree,
};
use pitchfork_core_bond::PositiveF64;

use super::{step::StepFunction, PopulationError};

/// Skyline population function for trees with multifurcations.
///
/// The epochs are delimited by the heights of every `ceil(c / max)`-th
/// logical internal node, where `c` is the number of logical internal nodes
/// of the current tree and `max` the maximum number of epochs. Hence the
/// number of epochs in use changes when a multifurcation is created or
/// resolved. The population size of epoch `i > 0` is
/// `N_{i-1} exp(delta_{i-1})`.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct SkylinePopulationFunction {
    n0: PositiveF64,
    log_pop_size_deltas: Vec<f64>,
    max_epochs: NonZeroUsize,
    generation: u64,
    step: StepFunction,
}

#[contract_trait]
impl Backup for SkylinePopulationFunction {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

impl SkylinePopulationFunction {
    /// # Errors
    ///
    /// Returns `DeltaCountMismatch` unless there is one log population size
    /// difference per internal node of `tree` but one, or
    /// `NoCoalescentEvents` if `tree` has no internal nodes.
    pub fn new(
        n0: PositiveF64,
        log_pop_size_deltas: Vec<f64>,
        max_epochs: NonZeroUsize,
        tree: &Tree,
    ) -> Result<Self, PopulationError> {
        let expected = tree
            .internal_node_count()
            .checked_sub(1)
            .ok_or(PopulationError::NoCoalescentEvents)?;

        if log_pop_size_deltas.len() != expected {
            return Err(PopulationError::DeltaCountMismatch {
                expected,
                actual: log_pop_size_deltas.len(),
            });
        }

        let start_times = Self::epoch_start_times_of(tree, max_epochs);
        let sizes = Self::epoch_sizes(n0, &log_pop_size_deltas, start_times.len());

        Ok(Self {
            n0,
            log_pop_size_deltas,
            max_epochs,
            generation: tree.generation(),
            step: StepFunction::new(start_times, sizes),
        })
    }

    #[must_use]
    pub fn present_size(&self) -> PositiveF64 {
        self.n0
    }

    #[must_use]
    pub fn log_pop_size_deltas(&self) -> &[f64] {
        &self.log_pop_size_deltas
    }

    /// Number of epochs for the tree seen by the last refresh.
    #[must_use]
    pub fn current_epoch_count(&self) -> usize {
        self.step.epoch_count()
    }

    #[must_use]
    pub fn epoch_start_times(&self) -> &[f64] {
        self.step.start_times()
    }

    #[must_use]
    pub fn epoch_pop_size(&self, epoch: usize) -> f64 {
        self.step.sizes()[epoch]
    }

    fn epoch_start_times_of(tree: &Tree, max_epochs: NonZeroUsize) -> Vec<f64> {
        let mut heights = tree
            .true_internal_nodes()
            .into_iter()
            .map(|node| tree.height(node))
            .collect::<Vec<_>>();
        heights.sort_by(f64::total_cmp);

        let events_per_epoch = heights.len().div_ceil(max_epochs.get()).max(1);

        let mut start_times = vec![0.0_f64];

        for (i, height) in heights.iter().enumerate().take(heights.len().saturating_sub(1)) {
            if (i + 1) % events_per_epoch == 0 {
                start_times.push(*height);
            }
        }

        start_times
    }

    fn epoch_sizes(n0: PositiveF64, log_pop_size_deltas: &[f64], epochs: usize) -> Vec<f64> {
        let mut log_size = n0.get().ln();

        core::iter::once(n0.get())
            .chain(log_pop_size_deltas.iter().take(epochs - 1).map(|delta| {
                log_size += delta;
                log_size.exp()
            }))
            .collect()
    }
}

#[contract_trait]
impl PopulationFunction for SkylinePopulationFunction {
    fn pop_size(&self, t: f64) -> f64 {
        self.step.pop_size(t)
    }

    fn intensity(&self, t: f64) -> f64 {
        self.step.intensity(t)
    }

    fn inverse_intensity(&self, x: f64) -> f64 {
        self.step.inverse_intensity(x)
    }

    fn refresh(&mut self, tree: &Tree) {
        if tree.generation() == self.generation {
            return;
        }

        trace!("Recomputing skyline epochs at generation {}.", tree.generation());

        let start_times = Self::epoch_start_times_of(tree, self.max_epochs);
        let sizes = Self::epoch_sizes(self.n0, &self.log_pop_size_deltas, start_times.len());

        self.generation = tree.generation();
        self.step = StepFunction::new(start_times, sizes);
    }
}

impl EpochModel for SkylinePopulationFunction {
    fn epoch_count(&mut self, tree: &Tree) -> usize {
        self.refresh(tree);

        self.step.epoch_count()
    }

    fn log_pop_size_delta(&self, index: usize) -> f64 {
        self.log_pop_size_deltas[index]
    }

    fn set_log_pop_size_delta(&mut self, index: usize, delta: f64) {
        self.log_pop_size_deltas[index] = delta;

        let start_times = self.step.start_times().to_vec();
        let sizes = Self::epoch_sizes(self.n0, &self.log_pop_size_deltas, start_times.len());

        self.step = StepFunction::new(start_times, sizes);
    }
}
