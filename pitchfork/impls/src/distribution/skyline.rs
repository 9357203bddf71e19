use pitchfork_core::{cogs::MathsCore, tree::Tree};
use pitchfork_core_bond::PositiveF64;
use thiserror::Error;

use crate::{
    intervals::{CollapsedTreeIntervals, IntervalType},
    model::{BetaCoalescentModel, RateModelError},
};

#[derive(Debug, Error, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum SkylineConfigError {
    #[error("The event group sizes sum to {actual}, but the tree has {expected} coalescent events.")]
    GroupSizeMismatch { expected: usize, actual: usize },
    #[error("Expected one population size per event group ({expected}), got {actual}.")]
    PopSizeCountMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    RateModel(#[from] RateModelError),
}

/// Beta-coalescent log-likelihood under a skyline whose epochs are groups of
/// consecutive coalescent events.
///
/// The population size of group `g` applies from the event that closed
/// group `g - 1` up to and including the last event of group `g`. A
/// multifurcation counts as one event per lineage it removes.
#[derive(Debug)]
pub struct BetaSkylineDistribution<M: MathsCore> {
    model: BetaCoalescentModel<M>,
    group_sizes: Vec<usize>,
    pop_sizes: Vec<PositiveF64>,
    intervals: CollapsedTreeIntervals,
}

impl<M: MathsCore> BetaSkylineDistribution<M> {
    /// # Errors
    ///
    /// Returns `GroupSizeMismatch` unless `group_sizes` sums to one less than
    /// the number of leaves, `PopSizeCountMismatch` unless there is one
    /// population size per group, and `RateModel` if the tree exceeds the
    /// lineage bound.
    pub fn new(
        model: BetaCoalescentModel<M>,
        group_sizes: Vec<usize>,
        pop_sizes: Vec<PositiveF64>,
        tree: &Tree,
    ) -> Result<Self, SkylineConfigError> {
        super::check_lineage_bound(&model, tree)?;

        let expected = tree.leaf_count().saturating_sub(1);
        let actual: usize = group_sizes.iter().sum();

        if actual != expected || group_sizes.is_empty() {
            return Err(SkylineConfigError::GroupSizeMismatch { expected, actual });
        }

        Self::check_pop_sizes(&group_sizes, &pop_sizes)?;

        Ok(Self {
            model,
            group_sizes,
            pop_sizes,
            intervals: CollapsedTreeIntervals::new(tree),
        })
    }

    #[must_use]
    pub fn model(&self) -> &BetaCoalescentModel<M> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut BetaCoalescentModel<M> {
        &mut self.model
    }

    #[must_use]
    pub fn group_sizes(&self) -> &[usize] {
        &self.group_sizes
    }

    #[must_use]
    pub fn pop_sizes(&self) -> &[PositiveF64] {
        &self.pop_sizes
    }

    /// # Errors
    ///
    /// Returns `PopSizeCountMismatch` unless there is one population size per
    /// group.
    pub fn set_pop_sizes(&mut self, pop_sizes: Vec<PositiveF64>) -> Result<(), SkylineConfigError> {
        Self::check_pop_sizes(&self.group_sizes, &pop_sizes)?;

        self.pop_sizes = pop_sizes;

        Ok(())
    }

    #[debug_requires(
        tree.leaf_count() == self.intervals.leaf_count(),
        "tree has the leaves it was constructed with"
    )]
    pub fn log_likelihood(&mut self, tree: &Tree) -> f64 {
        let intervals = self.intervals.get(tree);

        let total_events = intervals.total_coalescent_events();
        let last_group = self.group_sizes.len() - 1;

        let mut group = 0_usize;
        let mut seen_in_group = 0_usize;
        let mut seen = 0_usize;

        let mut pop_size = self.pop_sizes[group].get();
        let mut log_likelihood = 0.0_f64;

        for i in 0..intervals.interval_count() {
            let lineages = intervals.lineage_count(i);

            log_likelihood -=
                self.model.total_coal_rate(lineages) * intervals.interval(i) / pop_size;

            if intervals.interval_type(i) != IntervalType::Coalescent {
                continue;
            }

            let events = intervals.coalescent_events(i);

            log_likelihood += self.model.log_lambda(lineages, events + 1) - M::ln(pop_size);

            seen_in_group += events;
            seen += events;

            if seen < total_events {
                while group < last_group && seen_in_group >= self.group_sizes[group] {
                    seen_in_group -= self.group_sizes[group];
                    group += 1;
                }

                pop_size = self.pop_sizes[group].get();
            }
        }

        log_likelihood
    }

    fn check_pop_sizes(
        group_sizes: &[usize],
        pop_sizes: &[PositiveF64],
    ) -> Result<(), SkylineConfigError> {
        if pop_sizes.len() == group_sizes.len() {
            Ok(())
        } else {
            Err(SkylineConfigError::PopSizeCountMismatch {
                expected: group_sizes.len(),
                actual: pop_sizes.len(),
            })
        }
    }
}
