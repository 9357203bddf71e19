use crate::MathsCore;

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub enum ReproducibleMathsCore {}

impl MathsCore for ReproducibleMathsCore {
    #[inline]
    fn ln(x: f64) -> f64 {
        libm::log(x)
    }

    #[inline]
    fn exp(x: f64) -> f64 {
        libm::exp(x)
    }

    #[inline]
    fn ln_gamma(x: f64) -> f64 {
        libm::lgamma(x)
    }
}
