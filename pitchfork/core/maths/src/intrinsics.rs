use crate::MathsCore;

#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub enum IntrinsicsMathsCore {}

impl MathsCore for IntrinsicsMathsCore {
    #[inline]
    fn ln(x: f64) -> f64 {
        x.ln()
    }

    #[inline]
    fn exp(x: f64) -> f64 {
        x.exp()
    }

    // std has no stable lgamma
    #[inline]
    fn ln_gamma(x: f64) -> f64 {
        libm::lgamma(x)
    }
}
