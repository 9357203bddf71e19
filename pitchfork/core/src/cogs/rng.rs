use core::f64::consts::PI;

#[allow(clippy::module_name_repetitions)]
#[allow(clippy::inline_always, clippy::inline_fn_without_body)]
#[contract_trait]
pub trait RngCore {
    #[must_use]
    fn from_seed(seed: u64) -> Self
    where
        Self: Sized;

    #[must_use]
    #[debug_ensures((0.0_f64..1.0_f64).contains(&ret), "samples U[0.0, 1.0)")]
    fn sample_uniform(&mut self) -> f64;
}

pub trait Rng: RngCore {
    #[must_use]
    #[debug_requires(length > 0, "length > 0")]
    #[debug_ensures(ret < length, "samples U(0, length - 1)")]
    fn sample_index(&mut self, length: usize) -> usize {
        // attributes on expressions are experimental
        // see https://github.com/rust-lang/rust/issues/15701
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let index = (self.sample_uniform() * (length as f64)).floor() as usize;
        index.min(length - 1)
    }

    #[must_use]
    #[debug_requires(lambda > 0.0, "lambda > 0.0")]
    #[debug_ensures(ret >= 0.0, "samples Exp(lambda)")]
    fn sample_exponential(&mut self, lambda: f64) -> f64 {
        -(1.0_f64 - self.sample_uniform()).ln() / lambda
    }

    #[must_use]
    #[debug_requires(
        (0.0_f64..=1.0_f64).contains(&probability),
        "0.0 <= probability <= 1.0"
    )]
    fn sample_event(&mut self, probability: f64) -> bool {
        self.sample_uniform() < probability
    }

    #[must_use]
    fn sample_coin_flip(&mut self) -> bool {
        self.sample_event(0.5_f64)
    }

    #[must_use]
    #[debug_requires(lower <= upper, "lower <= upper")]
    fn sample_uniform_range(&mut self, lower: f64, upper: f64) -> f64 {
        lower + (upper - lower) * self.sample_uniform()
    }

    /// Samples N(0, 1) using the Box-Muller transform.
    #[must_use]
    fn sample_standard_normal(&mut self) -> f64 {
        let u1 = 1.0_f64 - self.sample_uniform();
        let u2 = self.sample_uniform();

        (-2.0_f64 * u1.ln()).sqrt() * (2.0_f64 * PI * u2).cos()
    }

    #[must_use]
    fn sample_choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.sample_index(items.len()))
        }
    }
}

impl<T: RngCore> Rng for T {}
