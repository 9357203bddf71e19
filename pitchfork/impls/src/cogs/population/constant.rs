use pitchfork_core::cogs::{Backup, PopulationFunction};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantPopulation {
    size: PositiveF64,
}

impl ConstantPopulation {
    #[must_use]
    pub fn new(size: PositiveF64) -> Self {
        Self { size }
    }
}

#[contract_trait]
impl Backup for ConstantPopulation {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

#[contract_trait]
impl PopulationFunction for ConstantPopulation {
    fn pop_size(&self, _t: f64) -> f64 {
        self.size.get()
    }

    fn intensity(&self, t: f64) -> f64 {
        t / self.size.get()
    }

    fn inverse_intensity(&self, x: f64) -> f64 {
        x * self.size.get()
    }
}
