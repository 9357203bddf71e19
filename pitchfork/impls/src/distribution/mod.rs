use pitchfork_core::{
    cogs::{MathsCore, PopulationFunction},
    tree::Tree,
};

use crate::{
    intervals::{CollapsedTreeIntervals, IntervalType},
    model::{BetaCoalescentModel, RateModelError},
};

mod prior;
mod skyline;

pub use prior::{ParametricDensity, SkylinePrior};
pub use skyline::{BetaSkylineDistribution, SkylineConfigError};

/// Log-likelihood of a multifurcating tree under the Beta-coalescent with a
/// deterministic population size function.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BetaCoalescentDistribution<M: MathsCore, P: PopulationFunction> {
    model: BetaCoalescentModel<M>,
    population: P,
    intervals: CollapsedTreeIntervals,
}

impl<M: MathsCore, P: PopulationFunction> BetaCoalescentDistribution<M, P> {
    /// # Errors
    ///
    /// Returns `LineageBoundExceeded` if `tree` has more leaves than the
    /// lineage bound of `model`.
    pub fn new(
        model: BetaCoalescentModel<M>,
        population: P,
        tree: &Tree,
    ) -> Result<Self, RateModelError> {
        check_lineage_bound(&model, tree)?;

        Ok(Self {
            model,
            population,
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
    pub fn population(&self) -> &P {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut P {
        &mut self.population
    }

    #[must_use]
    pub fn into_parts(self) -> (BetaCoalescentModel<M>, P) {
        (self.model, self.population)
    }

    /// Number of times the tree intervals have been rebuilt so far.
    #[must_use]
    pub fn interval_recomputations(&self) -> usize {
        self.intervals.recomputations()
    }

    #[debug_requires(
        tree.leaf_count() == self.intervals.leaf_count(),
        "tree has the leaves it was constructed with"
    )]
    pub fn log_likelihood(&mut self, tree: &Tree) -> f64 {
        self.population.refresh(tree);

        let intervals = self.intervals.get(tree);

        let mut log_likelihood = 0.0_f64;
        let mut time = 0.0_f64;

        for i in 0..intervals.interval_count() {
            let lineages = intervals.lineage_count(i);
            let duration = intervals.interval(i);

            log_likelihood -=
                self.model.total_coal_rate(lineages) * self.population.integral(time, time + duration);

            time += duration;

            if intervals.interval_type(i) == IntervalType::Coalescent {
                let merger_size = intervals.coalescent_events(i) + 1;

                log_likelihood += self.model.log_lambda(lineages, merger_size)
                    - M::ln(self.population.pop_size(time));
            }
        }

        log_likelihood
    }
}

fn check_lineage_bound<M: MathsCore>(
    model: &BetaCoalescentModel<M>,
    tree: &Tree,
) -> Result<(), RateModelError> {
    if tree.leaf_count() > model.max_lineages() {
        return Err(RateModelError::LineageBoundExceeded {
            leaves: tree.leaf_count(),
            max_lineages: model.max_lineages(),
        });
    }

    Ok(())
}
