use pitchfork_core::{cogs::PopulationFunction, tree::Tree};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

use super::{step::StepFunction, PopulationError};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub enum ChangeTimes {
    /// Times at which epochs `1..` start.
    Explicit(Vec<f64>),
    /// Epochs of equal length spanning the current tree height.
    EvenlySpaced,
}

/// Piecewise constant population size with either fixed change times or
/// epochs that evenly divide the height of the tree.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct PiecewiseConstantPopulation {
    change_times: ChangeTimes,
    step: StepFunction,
}

impl PiecewiseConstantPopulation {
    /// # Errors
    ///
    /// Returns `NoSizes` if `sizes` is empty, `ChangeTimeCountMismatch` if
    /// explicit change times do not delimit exactly `sizes.len()` epochs, or
    /// `UnsortedChangeTimes` if they are not positive and increasing.
    pub fn new(
        sizes: &[PositiveF64],
        change_times: ChangeTimes,
        tree: &Tree,
    ) -> Result<Self, PopulationError> {
        if sizes.is_empty() {
            return Err(PopulationError::NoSizes);
        }

        if let ChangeTimes::Explicit(times) = &change_times {
            if times.len() + 1 != sizes.len() {
                return Err(PopulationError::ChangeTimeCountMismatch {
                    expected: sizes.len() - 1,
                    actual: times.len(),
                });
            }

            let mut previous = 0.0_f64;

            for time in times {
                if !(*time > previous) {
                    return Err(PopulationError::UnsortedChangeTimes);
                }

                previous = *time;
            }
        }

        let sizes = sizes.iter().map(|size| size.get()).collect::<Vec<_>>();
        let start_times = Self::start_times(&change_times, sizes.len(), tree);

        Ok(Self {
            change_times,
            step: StepFunction::new(start_times, sizes),
        })
    }

    #[must_use]
    pub fn epoch_start_times(&self) -> &[f64] {
        self.step.start_times()
    }

    #[allow(clippy::cast_precision_loss)]
    fn start_times(change_times: &ChangeTimes, epochs: usize, tree: &Tree) -> Vec<f64> {
        match change_times {
            ChangeTimes::Explicit(times) => core::iter::once(0.0_f64)
                .chain(times.iter().copied())
                .collect(),
            ChangeTimes::EvenlySpaced => {
                let epoch_length = tree.root_height() / (epochs as f64);

                (0..epochs).map(|i| (i as f64) * epoch_length).collect()
            },
        }
    }
}

#[contract_trait]
impl PopulationFunction for PiecewiseConstantPopulation {
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
        if let ChangeTimes::EvenlySpaced = self.change_times {
            let start_times =
                Self::start_times(&self.change_times, self.step.epoch_count(), tree);

            if start_times != self.step.start_times() {
                self.step = StepFunction::new(start_times, self.step.sizes().to_vec());
            }
        }
    }
}
