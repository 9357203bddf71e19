use pitchfork_core::cogs::{Backup, PopulationFunction};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

/// `N(t) = N0 exp(-r t)`, i.e. a population that has been growing at rate `r`
/// towards the present.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExponentialGrowth {
    present_size: PositiveF64,
    growth_rate: f64,
}

impl ExponentialGrowth {
    #[must_use]
    pub fn new(present_size: PositiveF64, growth_rate: f64) -> Self {
        Self {
            present_size,
            growth_rate,
        }
    }
}

#[contract_trait]
impl Backup for ExponentialGrowth {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

#[contract_trait]
impl PopulationFunction for ExponentialGrowth {
    fn pop_size(&self, t: f64) -> f64 {
        self.present_size.get() * (-self.growth_rate * t).exp()
    }

    fn intensity(&self, t: f64) -> f64 {
        if self.growth_rate == 0.0 {
            t / self.present_size.get()
        } else {
            (self.growth_rate * t).exp_m1() / (self.present_size.get() * self.growth_rate)
        }
    }

    /// A shrinking population (`r < 0`) has a finite total intensity of
    /// `-1 / (N0 r)`, beyond which no further events happen.
    fn inverse_intensity(&self, x: f64) -> f64 {
        if self.growth_rate == 0.0 {
            return x * self.present_size.get();
        }

        let scaled = x * self.present_size.get() * self.growth_rate;

        if scaled <= -1.0_f64 {
            return f64::INFINITY;
        }

        scaled.ln_1p() / self.growth_rate
    }
}
