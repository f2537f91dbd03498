//! Poisson burden test of qualifying pathogenic alleles in a gene
//!
//! The number of qualifying alleles in a gene of a healthy individual is
//! modelled as a Poisson distribution with the gene's background rate as
//! mean. A true disease gene is expected to carry at least `causal_rate`
//! qualifying alleles. The likelihood ratio compares the probability of
//! observing at least `k` alleles under both models:
//!
//! ```text
//! LR = P(X >= k | Poisson(max(rate, causal_rate))) / P(X >= k | Poisson(rate))
//! ```
//!
//! # Examples
//!
//! ```
//! use hpo_lr::stats::PoissonBurdenTest;
//!
//! let test = PoissonBurdenTest::new(0.01).unwrap();
//!
//! // Two hits in a gene that rarely has any pathogenic variants
//! assert!(test.p_value(2) < 1e-4);
//! assert!(test.likelihood_ratio(2, 1.0).unwrap() > 1000.0);
//!
//! // No observation is neutral
//! assert_eq!(test.likelihood_ratio(0, 1.0).unwrap(), 1.0);
//! ```
use statrs::distribution::{Discrete, DiscreteCDF, Poisson};
use tracing::trace;

use crate::stats::ln_add_exp;
use crate::{f64_from_u64, HpoError, HpoResult, MAX_EXPECTED_RATE, MIN_EXPECTED_RATE};

/// Terms of the tail series below this distance to the running sum are dropped
const LN_SERIES_CUTOFF: f64 = 40.0;
/// Hard limit of tail series terms
const MAX_SERIES_TERMS: u64 = 100_000;
/// Larger allele counts are treated as this count
///
/// Every term of the tail series stays below `u32::MAX`, so the conversion
/// to `f64` is exact.
pub const MAX_OBSERVED_ALLELES: u64 = 4_294_967_295 - MAX_SERIES_TERMS - 1;

/// One-sided test for an excess of qualifying alleles
///
/// Constructed with the expected background rate of a gene, it returns
/// `P(X >= k)` and the likelihood ratio against a causal gene.
#[derive(Debug, Clone)]
pub struct PoissonBurdenTest {
    rate: f64,
    distribution: Poisson,
}

impl PoissonBurdenTest {
    /// Constructs a new burden test with the expected background rate
    ///
    /// A rate of `0.0` is allowed. It is replaced by [`MIN_EXPECTED_RATE`]
    /// when any allele is observed.
    ///
    /// # Errors
    ///
    /// - [`HpoError::NumberIsTooLarge`] if the rate is above [`MAX_EXPECTED_RATE`]
    /// - [`HpoError::InvalidInput`] if the rate is negative or not a number
    pub fn new(expected_rate: f64) -> HpoResult<Self> {
        if expected_rate.is_nan() || expected_rate < 0.0 {
            return Err(HpoError::InvalidInput(format!(
                "expected rate must not be negative: {expected_rate}"
            )));
        }
        if expected_rate > MAX_EXPECTED_RATE {
            return Err(HpoError::NumberIsTooLarge {
                value: expected_rate,
                threshold: MAX_EXPECTED_RATE,
            });
        }
        let distribution = Poisson::new(expected_rate.max(MIN_EXPECTED_RATE))
            .map_err(|err| HpoError::InvalidInput(err.to_string()))?;
        Ok(Self {
            rate: expected_rate,
            distribution,
        })
    }

    /// The expected background rate
    pub fn expected_rate(&self) -> f64 {
        self.rate
    }

    /// Returns `P(X >= observed)`
    ///
    /// The value underflows to `0.0` for large counts at tiny rates,
    /// use [`PoissonBurdenTest::ln_p_value`] in those cases.
    pub fn p_value(&self, observed: u64) -> f64 {
        self.ln_p_value(observed).exp()
    }

    /// Returns `ln(P(X >= observed))`
    ///
    /// If `observed` is above the mean, the upper tail is summed up in log
    /// space from the log probability mass function, so the result is finite
    /// even when the probability itself is below the smallest `f64`.
    ///
    /// Counts above [`MAX_OBSERVED_ALLELES`] are capped.
    pub fn ln_p_value(&self, observed: u64) -> f64 {
        if observed == 0 {
            return 0.0;
        }
        let observed = observed.min(MAX_OBSERVED_ALLELES);
        let mean = self.distribution.lambda();
        if f64_from_u64(observed) <= mean {
            return self.distribution.sf(observed - 1).ln();
        }

        let ln_mean = mean.ln();
        let mut ln_term = self.distribution.ln_pmf(observed);
        let mut ln_sum = ln_term;
        let mut k = observed;
        while k - observed < MAX_SERIES_TERMS {
            let Some(next) = k.checked_add(1) else {
                break;
            };
            k = next;
            ln_term += ln_mean - f64_from_u64(k).ln();
            ln_sum = ln_add_exp(ln_sum, ln_term);
            if ln_term < ln_sum - LN_SERIES_CUTOFF {
                break;
            }
        }
        trace!(
            "P(X >= {}) with mean {} summed over {} terms",
            observed,
            mean,
            k - observed + 1
        );
        ln_sum
    }

    /// Returns the natural log of the likelihood ratio of `observed` alleles
    ///
    /// The alternative model uses the larger of the background rate and
    /// `causal_rate` as mean.
    ///
    /// # Errors
    ///
    /// - [`HpoError::NumberIsTooLarge`] if `causal_rate` is above [`MAX_EXPECTED_RATE`]
    /// - [`HpoError::InvalidInput`] if `causal_rate` is negative or not a number
    pub fn ln_likelihood_ratio(&self, observed: u64, causal_rate: f64) -> HpoResult<f64> {
        let alternative = PoissonBurdenTest::new(causal_rate)?;
        if observed == 0 {
            return Ok(0.0);
        }
        if alternative.rate <= self.rate {
            return Ok(0.0);
        }
        Ok(alternative.ln_p_value(observed) - self.ln_p_value(observed))
    }

    /// Returns the likelihood ratio of `observed` alleles
    ///
    /// Ratios above `f64::MAX` saturate, use
    /// [`PoissonBurdenTest::ln_likelihood_ratio`] to get the exact value.
    ///
    /// # Errors
    ///
    /// See [`PoissonBurdenTest::ln_likelihood_ratio`]
    pub fn likelihood_ratio(&self, observed: u64, causal_rate: f64) -> HpoResult<f64> {
        let lr = self.ln_likelihood_ratio(observed, causal_rate)?.exp();
        if lr.is_finite() {
            Ok(lr)
        } else {
            Ok(f64::MAX)
        }
    }
}
