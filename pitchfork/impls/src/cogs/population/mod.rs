use thiserror::Error;

mod constant;
mod exponential;
mod piecewise;
mod skyline;
mod step;

pub use constant::ConstantPopulation;
pub use exponential::ExponentialGrowth;
pub use piecewise::{ChangeTimes, PiecewiseConstantPopulation};
pub use skyline::SkylinePopulationFunction;

#[derive(Debug, Error, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum PopulationError {
    #[error("At least one population size is required.")]
    NoSizes,
    #[error("Expected {expected} change times for the given population sizes, got {actual}.")]
    ChangeTimeCountMismatch { expected: usize, actual: usize },
    #[error("Change times must be positive and increasing.")]
    UnsortedChangeTimes,
    #[error("Expected {expected} log population size differences for this tree, got {actual}.")]
    DeltaCountMismatch { expected: usize, actual: usize },
    #[error("The tree has no coalescent events to delimit skyline epochs.")]
    NoCoalescentEvents,
}

#[cfg(test)]
mod tests;
