use rand::{rngs::StdRng as StdRngImpl, Rng as _, SeedableRng};

use pitchfork_core::cogs::{Backup, RngCore};

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct StdRng(StdRngImpl);

#[contract_trait]
impl Backup for StdRng {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

#[contract_trait]
impl RngCore for StdRng {
    #[inline]
    fn from_seed(seed: u64) -> Self {
        Self(StdRngImpl::seed_from_u64(seed))
    }

    #[inline]
    fn sample_uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}
