use pitchfork_core::cogs::{Backup, RngCore};

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct WyHash {
    state: u64,
}

#[contract_trait]
impl Backup for WyHash {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

impl WyHash {
    #[must_use]
    #[inline]
    pub fn sample_u64(&mut self) -> u64 {
        diffuse(wyhash::wyrng(&mut self.state))
    }
}

#[contract_trait]
impl RngCore for WyHash {
    #[inline]
    fn from_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn sample_uniform(&mut self) -> f64 {
        // the 53 most significant bits fill the mantissa of a double in [0, 1)
        #[allow(clippy::cast_precision_loss)]
        let numerator = (self.sample_u64() >> 11) as f64;

        numerator * f64::from_bits(0x3CA0_0000_0000_0000_u64)
    }
}

const fn diffuse(mut x: u64) -> u64 {
    // PCG-style round with input-dependent shifts for better avalanching
    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    let a = x >> 32;
    let b = x >> 60;

    x ^= a >> b;

    x = x.wrapping_mul(0x6eed_0e9d_a4d9_4a4f);

    x
}
