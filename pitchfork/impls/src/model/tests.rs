use pitchfork_core::cogs::{Backup, MathsCore};
use pitchfork_core_maths::{IntrinsicsMathsCore, ReproducibleMathsCore};

use super::{BetaCoalescentModel, NumericalError, RateModelError};

#[allow(clippy::cast_precision_loss)]
fn rate<M: MathsCore>(model: &BetaCoalescentModel<M>, n: usize, k: usize) -> f64 {
    M::exp(model.log_lambda(n, k) + M::ln_choose(n as u64, k as u64))
}

#[test]
fn total_rate_is_sum_of_merger_rates() {
    for alpha in [0.3, 1.0, 1.5, 1.99] {
        let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(alpha, 20).unwrap();

        for n in 2..=20 {
            let total = (2..=n).map(|k| rate(&model, n, k)).sum::<f64>();

            assert!(
                (model.total_coal_rate(n) - total).abs() <= 1e-10 * total,
                "alpha = {}, n = {}",
                alpha,
                n
            );
            assert_eq!(model.cumulative_coal_rates(n).len(), n - 1);
        }
    }
}

#[test]
#[allow(clippy::cast_precision_loss)]
fn bolthausen_sznitman_rates() {
    let model = BetaCoalescentModel::<IntrinsicsMathsCore>::new(1.0, 10).unwrap();

    for n in 2..=10 {
        assert!((model.total_coal_rate(n) - (n - 1) as f64).abs() < 1e-10);
    }

    assert!((model.log_lambda(4, 3) - (1.0_f64 / 6.0).ln()).abs() < 1e-12);
    assert!(model.log_lambda(2, 2).abs() < 1e-12);
}

#[test]
#[allow(clippy::cast_precision_loss)]
fn kingman_limit() {
    let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(2.0, 8).unwrap();

    for n in 2..=8 {
        let binary = (n * (n - 1)) as f64 / 2.0;

        assert!(model.log_lambda(n, 2).abs() < 1e-12);
        assert!((model.total_coal_rate(n) - binary).abs() < 1e-10);

        for k in 3..=n {
            assert_eq!(model.log_lambda(n, k), f64::NEG_INFINITY);
        }
    }
}

#[test]
fn multiple_mergers_vanish_towards_kingman() {
    let mut previous = f64::INFINITY;

    for alpha in [1.9, 1.99, 1.999, 1.9999] {
        let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(alpha, 6).unwrap();

        for n in 3..=6 {
            assert!(model.log_lambda(n, 2).is_finite());
        }

        let ratio = rate(&model, 6, 3) / rate(&model, 6, 2);

        assert!(ratio < previous);
        previous = ratio;
    }

    assert!(previous < 1e-3);
}

#[test]
fn zero_and_one_lineages_have_no_rate() {
    let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(1.5, 4).unwrap();

    assert_eq!(model.total_coal_rate(0), 0.0);
    assert_eq!(model.total_coal_rate(1), 0.0);
    assert_eq!(model.log_lambda(1, 2), 0.0);
}

#[test]
fn changing_alpha_drops_the_table() {
    let mut model = BetaCoalescentModel::<ReproducibleMathsCore>::new(1.0, 5).unwrap();

    assert!(!model.is_computed());
    let before = model.total_coal_rate(5);
    assert!(model.is_computed());

    model.set_alpha(1.0).unwrap();
    assert!(model.is_computed());

    let backup = model.backup();

    model.set_alpha(1.5).unwrap();
    assert!(!model.is_computed());
    assert!((model.total_coal_rate(5) - before).abs() > 1e-6);

    model.set_max_lineages(6).unwrap();
    assert!(!model.is_computed());
    assert!(model.total_coal_rate(6) > 0.0);

    let model = backup.resume();
    assert_eq!(model.alpha(), 1.0);
    assert_eq!(model.max_lineages(), 5);
    assert!((model.total_coal_rate(5) - before).abs() < 1e-15);
}

#[test]
fn rejects_invalid_parameters() {
    assert_eq!(
        BetaCoalescentModel::<ReproducibleMathsCore>::new(0.0, 5).unwrap_err(),
        RateModelError::InvalidAlpha(0.0)
    );
    assert_eq!(
        BetaCoalescentModel::<ReproducibleMathsCore>::new(2.5, 5).unwrap_err(),
        RateModelError::InvalidAlpha(2.5)
    );
    assert_eq!(
        BetaCoalescentModel::<ReproducibleMathsCore>::new(1.0, 1).unwrap_err(),
        RateModelError::TooFewLineages(1)
    );

    let mut model = BetaCoalescentModel::<ReproducibleMathsCore>::new(1.0, 5).unwrap();
    assert!(model.set_alpha(f64::NAN).is_err());
    assert_eq!(model.alpha(), 1.0);
}

#[test]
fn inverts_cumulative_rates() {
    let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(1.0, 3).unwrap();

    // C(3, 2) = 1.5 and C(3, 3) = 2.0
    assert_eq!(model.sample_merger_size(3, 0.0), Ok(2));
    assert_eq!(model.sample_merger_size(3, 0.74), Ok(2));
    assert_eq!(model.sample_merger_size(3, 0.76), Ok(3));
    assert_eq!(model.sample_merger_size(2, 0.5), Ok(2));
    assert_eq!(
        model.sample_merger_size(3, 1.5),
        Err(NumericalError::MergerSizeOutOfRange {
            lineages: 3,
            merger_size: 4
        })
    );
}

#[test]
fn non_finite_search_targets_are_errors() {
    let model = BetaCoalescentModel::<ReproducibleMathsCore>::new(1.0, 3).unwrap();

    assert!(matches!(
        model.sample_merger_size(3, f64::NAN),
        Err(NumericalError::NonFiniteRate { lineages: 3, total }) if (total - 2.0).abs() < 1e-12
    ));
    assert!(matches!(
        model.sample_merger_size(3, f64::INFINITY),
        Err(NumericalError::NonFiniteRate { lineages: 3, .. })
    ));
}
