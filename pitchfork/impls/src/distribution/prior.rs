use core::{f64::consts::PI, marker::PhantomData};

use pitchfork_core::{
    cogs::{EpochModel, MathsCore},
    tree::Tree,
};
use pitchfork_core_bond::PositiveF64;
use serde::Deserialize;

use crate::cogs::population::SkylinePopulationFunction;

/// Univariate density used as a prior on a scalar parameter.
#[derive(Clone, Debug, Deserialize)]
pub enum ParametricDensity {
    Normal { mean: f64, sigma: PositiveF64 },
    LogNormal { mu: f64, sigma: PositiveF64 },
    Exponential { mean: PositiveF64 },
    /// The improper `1 / x` density on positive values.
    OneOnX,
}

impl ParametricDensity {
    #[must_use]
    pub fn standard_normal() -> Self {
        Self::Normal {
            mean: 0.0_f64,
            sigma: PositiveF64::one(),
        }
    }

    /// Log density at `x`, `-inf` outside the support.
    #[must_use]
    pub fn log_density<M: MathsCore>(&self, x: f64) -> f64 {
        match self {
            Self::Normal { mean, sigma } => {
                let z = (x - mean) / sigma.get();

                -0.5_f64 * z * z - M::ln(sigma.get()) - 0.5_f64 * M::ln(2.0_f64 * PI)
            },
            Self::LogNormal { .. } | Self::Exponential { .. } | Self::OneOnX if x <= 0.0_f64 => {
                f64::NEG_INFINITY
            },
            Self::LogNormal { mu, sigma } => {
                let ln_x = M::ln(x);
                let z = (ln_x - mu) / sigma.get();

                -0.5_f64 * z * z - M::ln(sigma.get()) - 0.5_f64 * M::ln(2.0_f64 * PI) - ln_x
            },
            Self::Exponential { mean } => -x / mean.get() - M::ln(mean.get()),
            Self::OneOnX => -M::ln(x),
        }
    }
}

/// Prior on a [`SkylinePopulationFunction`]: a density on the present-day
/// size `N0` times an independent density on each log population size
/// difference of the epochs that the tree currently activates.
///
/// Inactive differences are excluded, so that together with
/// [`EpochAdjusted`](crate::cogs::operator::EpochAdjusted) a change in the
/// number of epochs is balanced when the differences follow a standard
/// normal.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct SkylinePrior<M: MathsCore> {
    pop_size_prior: ParametricDensity,
    log_delta_prior: ParametricDensity,
    marker: PhantomData<M>,
}

impl<M: MathsCore> SkylinePrior<M> {
    #[must_use]
    pub fn new(pop_size_prior: ParametricDensity, log_delta_prior: ParametricDensity) -> Self {
        Self {
            pop_size_prior,
            log_delta_prior,
            marker: PhantomData::<M>,
        }
    }

    #[must_use]
    pub fn pop_size_prior(&self) -> &ParametricDensity {
        &self.pop_size_prior
    }

    #[must_use]
    pub fn log_delta_prior(&self) -> &ParametricDensity {
        &self.log_delta_prior
    }

    pub fn log_density(&self, skyline: &mut SkylinePopulationFunction, tree: &Tree) -> f64 {
        let active_deltas = skyline.epoch_count(tree).saturating_sub(1);

        let mut log_density = self
            .pop_size_prior
            .log_density::<M>(skyline.present_size().get());

        for delta in skyline.log_pop_size_deltas().iter().take(active_deltas) {
            log_density += self.log_delta_prior.log_density::<M>(*delta);
        }

        log_density
    }
}
