#![deny(clippy::pedantic)]

//! The special functions needed for Beta-coalescent merger rates.
//!
//! Implementations pick the backend: [`IntrinsicsMathsCore`] uses the
//! platform intrinsics where they exist, while [`ReproducibleMathsCore`]
//! routes everything through `libm` so that rate tables are bit-identical
//! across platforms.

mod intrinsics;
mod reproducible;

pub use intrinsics::IntrinsicsMathsCore;
pub use reproducible::ReproducibleMathsCore;

pub trait MathsCore: 'static + Clone + core::fmt::Debug {
    #[must_use]
    fn ln(x: f64) -> f64;

    #[must_use]
    fn exp(x: f64) -> f64;

    /// Natural logarithm of the absolute value of the gamma function.
    #[must_use]
    fn ln_gamma(x: f64) -> f64;

    #[must_use]
    fn ln_beta(a: f64, b: f64) -> f64 {
        Self::ln_gamma(a) + Self::ln_gamma(b) - Self::ln_gamma(a + b)
    }

    /// Natural logarithm of the binomial coefficient `n` choose `k`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    fn ln_choose(n: u64, k: u64) -> f64 {
        if k > n {
            return f64::NEG_INFINITY;
        }

        Self::ln_gamma((n + 1) as f64)
            - Self::ln_gamma((k + 1) as f64)
            - Self::ln_gamma((n - k + 1) as f64)
    }
}

#[cfg(test)]
mod tests;
