use core::num::NonZeroUsize;

use pitchfork_core::{
    cogs::{MathsCore, PopulationFunction, Rng},
    tree::{NodeIndex, Tree, TreeBuildError, TreeBuilder},
};
use pitchfork_core_bond::PositiveF64;
use thiserror::Error;

use crate::model::{BetaCoalescentModel, NumericalError, RateModelError};

#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum SimulationError {
    #[error("At least one sample is required to simulate a tree.")]
    NoSamples,
    #[error("The population never merges the remaining {lineages} lineages.")]
    NoCoalescence { lineages: usize },
    #[error(transparent)]
    RateModel(#[from] RateModelError),
    #[error(transparent)]
    Numerical(#[from] NumericalError),
    #[error(transparent)]
    TreeBuild(#[from] TreeBuildError),
}

/// A tree simulated under an event-count skyline, together with the
/// population size that was in effect at every coalescent node.
#[derive(Debug)]
pub struct SkylineSimulation {
    pub tree: Tree,
    /// The initial size at time zero followed by one size per internal node,
    /// in node index order.
    pub pop_sizes: Vec<f64>,
    /// Zero followed by the height of every internal node, in node index
    /// order.
    pub change_times: Vec<f64>,
}

/// Gillespie simulation of Beta-coalescent trees with serially sampled
/// leaves, running backwards in time from the present.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BetaCoalescentSimulator<'m, M: MathsCore> {
    model: &'m BetaCoalescentModel<M>,
}

struct Lineages {
    active: Vec<NodeIndex>,
    // sorted by descending age so that the next sample is at the back
    pending: Vec<(NodeIndex, f64)>,
}

impl Lineages {
    fn next_sample_age(&self) -> Option<f64> {
        self.pending.last().map(|(_, age)| *age)
    }

    fn activate_next_sample(&mut self) {
        if let Some((leaf, _)) = self.pending.pop() {
            self.active.push(leaf);
        }
    }

    fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.active.len() <= 1
    }

    /// Removes `merger_size` distinct active lineages chosen uniformly at
    /// random.
    #[debug_requires(merger_size <= self.active.len(), "enough lineages are active")]
    fn draw<G: Rng>(&mut self, merger_size: usize, rng: &mut G) -> Vec<NodeIndex> {
        let n = self.active.len();

        for i in 0..merger_size {
            let j = i + rng.sample_index(n - i);
            self.active.swap(i, j);
        }

        self.active.drain(..merger_size).collect()
    }
}

impl<'m, M: MathsCore> BetaCoalescentSimulator<'m, M> {
    #[must_use]
    pub fn new(model: &'m BetaCoalescentModel<M>) -> Self {
        Self { model }
    }

    /// Simulates a tree whose leaves are the labelled `samples` at their
    /// given ages, with waiting times rescaled by `population`.
    ///
    /// # Errors
    ///
    /// Returns `NoSamples` for an empty sample, `RateModel` if there are more
    /// samples than the lineage bound, `TreeBuild` for a negative or NaN age,
    /// `NoCoalescence` if the population runs out of intensity before the
    /// tree is complete, and `Numerical` if a merger size cannot be drawn.
    pub fn simulate<L: AsRef<str>, P: PopulationFunction, G: Rng>(
        &self,
        samples: &[(L, f64)],
        population: &P,
        rng: &mut G,
    ) -> Result<Tree, SimulationError> {
        let (mut builder, mut lineages) = self.prepare(samples)?;

        // waiting times are exponential on the intensity scale
        let mut intensity = 0.0_f64;

        while !lineages.is_complete() {
            let n = lineages.active.len();

            let time = if n >= 2 {
                intensity += rng.sample_exponential(self.model.total_coal_rate(n));
                population.inverse_intensity(intensity)
            } else {
                f64::INFINITY
            };

            if let Some(age) = lineages.next_sample_age() {
                if time > age {
                    intensity = population.intensity(age);
                    lineages.activate_next_sample();

                    continue;
                }
            }

            if !time.is_finite() {
                return Err(SimulationError::NoCoalescence { lineages: n });
            }

            self.coalesce(&mut builder, &mut lineages, time, rng)?;
        }

        Self::finish(builder, &lineages)
    }

    /// Simulates a tree under a piecewise constant population that starts at
    /// `initial_pop_size` and is redrawn from an exponential distribution,
    /// with the previous size as its mean, after every `events_per_epoch`
    /// coalescent events.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::simulate`].
    pub fn simulate_skyline<L: AsRef<str>, G: Rng>(
        &self,
        samples: &[(L, f64)],
        initial_pop_size: PositiveF64,
        events_per_epoch: NonZeroUsize,
        rng: &mut G,
    ) -> Result<SkylineSimulation, SimulationError> {
        let (mut builder, mut lineages) = self.prepare(samples)?;

        let mut pop_size = initial_pop_size.get();
        let mut pop_sizes = vec![pop_size];
        let mut change_times = vec![0.0_f64];

        let mut time = 0.0_f64;
        let mut events = 0_usize;

        while !lineages.is_complete() {
            let n = lineages.active.len();

            if n >= 2 {
                time += rng.sample_exponential(self.model.total_coal_rate(n) / pop_size);
            } else {
                time = f64::INFINITY;
            }

            if let Some(age) = lineages.next_sample_age() {
                if time > age {
                    time = age;
                    lineages.activate_next_sample();

                    continue;
                }
            }

            let merger_size = self.coalesce(&mut builder, &mut lineages, time, rng)?;

            // one entry per node of the multifurcation ladder
            for _ in 1..merger_size {
                pop_sizes.push(pop_size);
                change_times.push(time);
            }

            events += 1;

            if events % events_per_epoch.get() == 0 {
                pop_size = rng
                    .sample_exponential(1.0_f64 / pop_size)
                    .max(f64::MIN_POSITIVE);

                trace!("Population size changed to {pop_size} at time {time}.");
            }
        }

        Ok(SkylineSimulation {
            tree: Self::finish(builder, &lineages)?,
            pop_sizes,
            change_times,
        })
    }

    fn prepare<L: AsRef<str>>(
        &self,
        samples: &[(L, f64)],
    ) -> Result<(TreeBuilder, Lineages), SimulationError> {
        if samples.is_empty() {
            return Err(SimulationError::NoSamples);
        }

        if samples.len() > self.model.max_lineages() {
            return Err(RateModelError::LineageBoundExceeded {
                leaves: samples.len(),
                max_lineages: self.model.max_lineages(),
            }
            .into());
        }

        let mut builder = TreeBuilder::new();
        let mut pending = Vec::with_capacity(samples.len());

        for (label, age) in samples {
            pending.push((builder.leaf(label.as_ref(), *age)?, *age));
        }

        pending.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        Ok((
            builder,
            Lineages {
                active: Vec::with_capacity(samples.len()),
                pending,
            },
        ))
    }

    fn coalesce<G: Rng>(
        &self,
        builder: &mut TreeBuilder,
        lineages: &mut Lineages,
        time: f64,
        rng: &mut G,
    ) -> Result<usize, SimulationError> {
        let merger_size = self
            .model
            .sample_merger_size(lineages.active.len(), rng.sample_uniform())?;

        let children = lineages.draw(merger_size, rng);
        let parent = builder.polytomy(time, &children)?;

        lineages.active.push(parent);

        Ok(merger_size)
    }

    fn finish(builder: TreeBuilder, lineages: &Lineages) -> Result<Tree, SimulationError> {
        let root = lineages
            .active
            .first()
            .copied()
            .ok_or(SimulationError::NoSamples)?;
        let tree = builder.build(root)?;

        debug!(
            "Simulated a tree with {} leaves and root height {}.",
            tree.leaf_count(),
            tree.root_height()
        );

        Ok(tree)
    }
}
