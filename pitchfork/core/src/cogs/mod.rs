pub use pitchfork_core_maths::MathsCore;

pub mod backup;
pub use backup::{BackedUp, Backup};

pub mod rng;
pub use rng::{Rng, RngCore};

pub mod population;
pub use population::PopulationFunction;

pub mod epoch;
pub use epoch::EpochModel;

pub mod operator;
pub use operator::TreeOperator;
