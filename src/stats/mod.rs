//! Statistical building blocks of the likelihood ratio ranking
//!
//! This module contains the Poisson burden test that compares the observed
//! number of qualifying pathogenic alleles in a gene with its expected
//! background rate, and the conversions between probabilities and log odds
//! that are used to combine likelihood ratios with pretest probabilities.
//!
//! All combinations are done in log space. A posttest probability is
//! calculated as
//!
//! ```text
//! posttest = logistic(logit(pretest) + sum(ln(LR)))
//! ```
//!
//! which stays finite even for a pretest probability of `1.0` or for
//! very large likelihood ratios.

pub mod poisson;

pub use poisson::PoissonBurdenTest;

/// Returns the natural log of the odds `p / (1 - p)`
///
/// `p == 1.0` returns positive infinity, `p == 0.0` negative infinity.
///
/// # Examples
///
/// ```
/// use hpo_lr::stats::logit;
///
/// assert_eq!(logit(0.5), 0.0);
/// assert!((logit(0.1) - (1f64 / 9f64).ln()).abs() < 1e-12);
/// ```
pub fn logit(p: f64) -> f64 {
    p.ln() - (1.0 - p).ln()
}

/// Converts log odds back into a probability
///
/// # Examples
///
/// ```
/// use hpo_lr::stats::logistic;
///
/// assert_eq!(logistic(0.0), 0.5);
/// assert_eq!(logistic(f64::INFINITY), 1.0);
/// assert_eq!(logistic(f64::NEG_INFINITY), 0.0);
/// ```
pub fn logistic(ln_odds: f64) -> f64 {
    if ln_odds >= 0.0 {
        1.0 / (1.0 + (-ln_odds).exp())
    } else {
        let odds = ln_odds.exp();
        odds / (1.0 + odds)
    }
}

/// Returns `ln(e^a + e^b)` without leaving log space
pub(crate) fn ln_add_exp(a: f64, b: f64) -> f64 {
    let (large, small) = if a >= b { (a, b) } else { (b, a) };
    if small == f64::NEG_INFINITY {
        return large;
    }
    large + (small - large).exp().ln_1p()
}
