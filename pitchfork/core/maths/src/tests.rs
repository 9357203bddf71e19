use crate::{IntrinsicsMathsCore, MathsCore, ReproducibleMathsCore};

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
}

#[test]
fn ln_gamma_matches_factorials() {
    assert_close(ReproducibleMathsCore::ln_gamma(1.0), 0.0);
    assert_close(ReproducibleMathsCore::ln_gamma(5.0), 24.0_f64.ln());
    assert_close(IntrinsicsMathsCore::ln_gamma(0.5), core::f64::consts::PI.sqrt().ln());
}

#[test]
fn ln_beta_of_unit_arguments() {
    assert_close(ReproducibleMathsCore::ln_beta(1.0, 1.0), 0.0);
    // B(2, 3) = 1! 2! / 4! = 1 / 12
    assert_close(IntrinsicsMathsCore::ln_beta(2.0, 3.0), (1.0_f64 / 12.0).ln());
}

#[test]
fn ln_choose_small_values() {
    assert_close(ReproducibleMathsCore::ln_choose(4, 2), 6.0_f64.ln());
    assert_close(ReproducibleMathsCore::ln_choose(7, 0), 0.0);
    assert_close(IntrinsicsMathsCore::ln_choose(10, 3), 120.0_f64.ln());
    assert_eq!(ReproducibleMathsCore::ln_choose(2, 3), f64::NEG_INFINITY);
}
