use std::{cell::OnceCell, marker::PhantomData};

use pitchfork_core::cogs::{Backup, MathsCore};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum RateModelError {
    #[error("The Beta-coalescent shape alpha must be in (0, 2], got {0}.")]
    InvalidAlpha(f64),
    #[error("The lineage bound must be at least 2, got {0}.")]
    TooFewLineages(usize),
    #[error("A tree with {leaves} leaves exceeds the lineage bound of {max_lineages}.")]
    LineageBoundExceeded { leaves: usize, max_lineages: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum NumericalError {
    #[error("The merger rates for {lineages} lineages are not finite, the total is {total}.")]
    NonFiniteRate { lineages: usize, total: f64 },
    #[error("Merger size search for {lineages} lineages landed on {merger_size}, outside [2, {lineages}].")]
    MergerSizeOutOfRange { lineages: usize, merger_size: usize },
}

/// Triangular table of `log Λ(n, k)` and of the cumulative merger rates
/// `C(n, k) = Σ_{j=2}^{k} binom(n, j) Λ(n, j)` for `2 <= k <= n <= N`.
#[derive(Clone, Debug)]
struct RateTable {
    log_lambda: Vec<f64>,
    cumulative: Vec<f64>,
}

impl RateTable {
    // row n occupies [offset(n), offset(n) + n - 1)
    fn offset(n: usize) -> usize {
        (n - 2) * (n - 1) / 2
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute<M: MathsCore>(alpha: f64, max_lineages: usize) -> Self {
        let size = Self::offset(max_lineages + 1);

        let mut log_lambda = Vec::with_capacity(size);
        let mut cumulative = Vec::with_capacity(size);

        let log_offset = if alpha < 2.0 {
            -M::ln_beta(2.0 - alpha, alpha)
        } else {
            0.0
        };

        for n in 2..=max_lineages {
            let mut total = 0.0_f64;

            for k in 2..=n {
                let log_rate = if k == 2 {
                    // cancelled form of log_offset + ln B(2 - alpha, n - 2 + alpha),
                    // which stays finite as alpha approaches 2
                    M::ln_gamma(n as f64 - 2.0 + alpha) - M::ln_gamma(n as f64) - M::ln_gamma(alpha)
                } else if alpha >= 2.0 {
                    f64::NEG_INFINITY
                } else {
                    log_offset + M::ln_beta(k as f64 - alpha, (n - k) as f64 + alpha)
                };

                total += M::exp(log_rate + M::ln_choose(n as u64, k as u64));

                log_lambda.push(log_rate);
                cumulative.push(total);
            }
        }

        Self {
            log_lambda,
            cumulative,
        }
    }

    fn row(values: &[f64], n: usize) -> &[f64] {
        let offset = Self::offset(n);

        &values[offset..(offset + n - 1)]
    }
}

/// Multiple-merger rates of the Beta(2 - alpha, alpha) coalescent.
///
/// The rate table is computed lazily on first access and dropped whenever
/// `alpha` or the lineage bound changes.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone, Debug)]
pub struct BetaCoalescentModel<M: MathsCore> {
    alpha: f64,
    max_lineages: usize,
    table: OnceCell<RateTable>,
    marker: PhantomData<M>,
}

#[contract_trait]
impl<M: MathsCore> Backup for BetaCoalescentModel<M> {
    unsafe fn backup_unchecked(&self) -> Self {
        self.clone()
    }
}

impl<M: MathsCore> BetaCoalescentModel<M> {
    /// # Errors
    ///
    /// Returns `InvalidAlpha` if not `0.0 < alpha <= 2.0`, or
    /// `TooFewLineages` if `max_lineages < 2`.
    pub fn new(alpha: f64, max_lineages: usize) -> Result<Self, RateModelError> {
        Self::validate_alpha(alpha)?;
        Self::validate_max_lineages(max_lineages)?;

        Ok(Self {
            alpha,
            max_lineages,
            table: OnceCell::new(),
            marker: PhantomData::<M>,
        })
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn max_lineages(&self) -> usize {
        self.max_lineages
    }

    /// # Errors
    ///
    /// Returns `InvalidAlpha` if not `0.0 < alpha <= 2.0`.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), RateModelError> {
        Self::validate_alpha(alpha)?;

        if alpha.to_bits() != self.alpha.to_bits() {
            self.alpha = alpha;
            self.table.take();
        }

        Ok(())
    }

    /// # Errors
    ///
    /// Returns `TooFewLineages` if `max_lineages < 2`.
    pub fn set_max_lineages(&mut self, max_lineages: usize) -> Result<(), RateModelError> {
        Self::validate_max_lineages(max_lineages)?;

        if max_lineages != self.max_lineages {
            self.max_lineages = max_lineages;
            self.table.take();
        }

        Ok(())
    }

    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.table.get().is_some()
    }

    #[must_use]
    #[debug_requires(n <= self.max_lineages, "n is within the lineage bound")]
    #[debug_requires(n < 2 || (2..=n).contains(&k), "2 <= k <= n")]
    pub fn log_lambda(&self, n: usize, k: usize) -> f64 {
        if n < 2 {
            return 0.0_f64;
        }

        RateTable::row(&self.table().log_lambda, n)[k - 2]
    }

    /// Total rate at which any merger happens among `n` lineages.
    #[must_use]
    #[debug_requires(n <= self.max_lineages, "n is within the lineage bound")]
    #[debug_ensures(ret >= 0.0, "rates are non-negative")]
    pub fn total_coal_rate(&self, n: usize) -> f64 {
        if n < 2 {
            return 0.0_f64;
        }

        RateTable::row(&self.table().cumulative, n)[n - 2]
    }

    /// Cumulative merger rates `C(n, 2), ..., C(n, n)`.
    #[must_use]
    #[debug_requires((2..=self.max_lineages).contains(&n), "2 <= n <= N")]
    pub fn cumulative_coal_rates(&self, n: usize) -> &[f64] {
        RateTable::row(&self.table().cumulative, n)
    }

    /// Inverts the cumulative merger rates at `u` in `[0, 1)` to sample the
    /// number of lineages taking part in the next merger among `n`.
    ///
    /// # Errors
    ///
    /// Returns `NonFiniteRate` if the total rate or the search target is not
    /// finite, or `MergerSizeOutOfRange` if the search does not land in
    /// `[2, n]`.
    #[debug_requires((2..=self.max_lineages).contains(&n), "2 <= n <= N")]
    pub fn sample_merger_size(&self, n: usize, u: f64) -> Result<usize, NumericalError> {
        let cumulative = self.cumulative_coal_rates(n);
        let total = self.total_coal_rate(n);
        let target = u * total;

        if !(total.is_finite() && target.is_finite()) {
            return Err(NumericalError::NonFiniteRate { lineages: n, total });
        }

        let merger_size = cumulative.partition_point(|rate| *rate < target) + 2;

        if merger_size <= n {
            Ok(merger_size)
        } else {
            Err(NumericalError::MergerSizeOutOfRange {
                lineages: n,
                merger_size,
            })
        }
    }

    fn table(&self) -> &RateTable {
        self.table.get_or_init(|| {
            debug!(
                "Computing Beta-coalescent rates for alpha = {} and up to {} lineages.",
                self.alpha, self.max_lineages
            );

            RateTable::compute::<M>(self.alpha, self.max_lineages)
        })
    }

    fn validate_alpha(alpha: f64) -> Result<(), RateModelError> {
        if alpha > 0.0 && alpha <= 2.0 {
            Ok(())
        } else {
            Err(RateModelError::InvalidAlpha(alpha))
        }
    }

    fn validate_max_lineages(max_lineages: usize) -> Result<(), RateModelError> {
        if max_lineages >= 2 {
            Ok(())
        } else {
            Err(RateModelError::TooFewLineages(max_lineages))
        }
    }
}

#[cfg(test)]
mod tests;
