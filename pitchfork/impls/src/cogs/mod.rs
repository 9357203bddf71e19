pub mod operator;
pub mod population;
pub mod rng;
