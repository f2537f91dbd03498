//! Tuning parameters of the likelihood ratio calculations
//!
//! All values default to the crate level `DEFAULT_*` constants. Use the
//! `with_*` methods to change single values:
//!
//! ```
//! use hpo_lr::config::{GenotypeConfig, RankingConfig, TermMatchConfig};
//!
//! let config = RankingConfig::default()
//!     .with_term_match(TermMatchConfig::default().with_no_match_ratio(0.05))
//!     .with_genotype(GenotypeConfig::default().with_keep_if_no_candidate_variant(true));
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.term_match().no_match_ratio(), 0.05);
//!
//! let invalid = RankingConfig::default()
//!     .with_term_match(TermMatchConfig::default().with_no_match_ratio(0.0));
//! assert!(invalid.validate().is_err());
//! ```
use crate::genotype::PathogenicityBin;
use crate::{
    HpoError, HpoResult, DEFAULT_ANCESTOR_IC_DISCOUNT, DEFAULT_BACKGROUND_FREQUENCY,
    DEFAULT_CAUSAL_ALLELE_RATE, DEFAULT_COMMON_ANCESTOR_WEIGHT, DEFAULT_MAX_ALLELE_FREQUENCY,
    DEFAULT_MIN_PATHOGENICITY, DEFAULT_NO_MATCH_RATIO, DEFAULT_NO_VARIANT_RATIO,
    MAX_EXPECTED_RATE,
};

/// Parameters of the phenotype term matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermMatchConfig {
    no_match_ratio: f64,
    ancestor_ic_discount: f64,
    common_ancestor_weight: f64,
}

impl Default for TermMatchConfig {
    fn default() -> Self {
        Self {
            no_match_ratio: DEFAULT_NO_MATCH_RATIO,
            ancestor_ic_discount: DEFAULT_ANCESTOR_IC_DISCOUNT,
            common_ancestor_weight: DEFAULT_COMMON_ANCESTOR_WEIGHT,
        }
    }
}

impl TermMatchConfig {
    /// The smallest likelihood ratio of a single observed term
    pub fn no_match_ratio(&self) -> f64 {
        self.no_match_ratio
    }

    /// The penalty per unit of information content for observed terms
    /// that are less specific than the disease annotation
    pub fn ancestor_ic_discount(&self) -> f64 {
        self.ancestor_ic_discount
    }

    /// The weight of a match through a common ancestor
    pub fn common_ancestor_weight(&self) -> f64 {
        self.common_ancestor_weight
    }

    /// Sets the floor ratio, must be within `(0, 1)`
    #[must_use]
    pub fn with_no_match_ratio(mut self, ratio: f64) -> Self {
        self.no_match_ratio = ratio;
        self
    }

    /// Sets the ancestor discount, must not be negative
    #[must_use]
    pub fn with_ancestor_ic_discount(mut self, discount: f64) -> Self {
        self.ancestor_ic_discount = discount;
        self
    }

    /// Sets the common ancestor weight, must be within `(0, 1)`
    #[must_use]
    pub fn with_common_ancestor_weight(mut self, weight: f64) -> Self {
        self.common_ancestor_weight = weight;
        self
    }

    /// Checks that all values are within their allowed range
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidConfiguration`] naming the first invalid value
    pub fn validate(&self) -> HpoResult<()> {
        if !(self.no_match_ratio > 0.0 && self.no_match_ratio < 1.0) {
            return Err(HpoError::InvalidConfiguration(format!(
                "no_match_ratio must be within (0, 1), not {}",
                self.no_match_ratio
            )));
        }
        if !(self.ancestor_ic_discount.is_finite() && self.ancestor_ic_discount >= 0.0) {
            return Err(HpoError::InvalidConfiguration(format!(
                "ancestor_ic_discount must not be negative, not {}",
                self.ancestor_ic_discount
            )));
        }
        if !(self.common_ancestor_weight > 0.0 && self.common_ancestor_weight < 1.0) {
            return Err(HpoError::InvalidConfiguration(format!(
                "common_ancestor_weight must be within (0, 1), not {}",
                self.common_ancestor_weight
            )));
        }
        Ok(())
    }
}

/// Parameters of the genotype likelihood ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeConfig {
    min_pathogenicity: f64,
    max_allele_frequency: f64,
    causal_allele_rate: f64,
    default_background_frequency: f64,
    no_variant_ratio: f64,
    keep_if_no_candidate_variant: bool,
}

impl Default for GenotypeConfig {
    fn default() -> Self {
        Self {
            min_pathogenicity: DEFAULT_MIN_PATHOGENICITY,
            max_allele_frequency: DEFAULT_MAX_ALLELE_FREQUENCY,
            causal_allele_rate: DEFAULT_CAUSAL_ALLELE_RATE,
            default_background_frequency: DEFAULT_BACKGROUND_FREQUENCY,
            no_variant_ratio: DEFAULT_NO_VARIANT_RATIO,
            keep_if_no_candidate_variant: false,
        }
    }
}

impl GenotypeConfig {
    /// Minimum pathogenicity score of a qualifying variant
    pub fn min_pathogenicity(&self) -> f64 {
        self.min_pathogenicity
    }

    /// Maximum population allele frequency of a qualifying variant
    pub fn max_allele_frequency(&self) -> f64 {
        self.max_allele_frequency
    }

    /// The lowest [`PathogenicityBin`] that contains qualifying variants
    pub fn min_bin(&self) -> PathogenicityBin {
        PathogenicityBin::from_score(self.min_pathogenicity)
    }

    /// Expected number of qualifying alleles in a disease gene
    pub fn causal_allele_rate(&self) -> f64 {
        self.causal_allele_rate
    }

    /// Background frequency of genes without background data
    pub fn default_background_frequency(&self) -> f64 {
        self.default_background_frequency
    }

    /// Genotype likelihood ratio of diseases without candidate variants
    pub fn no_variant_ratio(&self) -> f64 {
        self.no_variant_ratio
    }

    /// If `true`, diseases without candidate variants are not penalized
    pub fn keep_if_no_candidate_variant(&self) -> bool {
        self.keep_if_no_candidate_variant
    }

    /// The likelihood ratio used when no genotype evidence is available
    pub fn missing_evidence_ratio(&self) -> f64 {
        if self.keep_if_no_candidate_variant {
            1.0
        } else {
            self.no_variant_ratio
        }
    }

    /// Sets the minimum pathogenicity, must be within `[0, 1]`
    #[must_use]
    pub fn with_min_pathogenicity(mut self, score: f64) -> Self {
        self.min_pathogenicity = score;
        self
    }

    /// Sets the maximum allele frequency, must be within `[0, 1]`
    #[must_use]
    pub fn with_max_allele_frequency(mut self, frequency: f64) -> Self {
        self.max_allele_frequency = frequency;
        self
    }

    /// Sets the causal allele rate, must be within `(0, MAX_EXPECTED_RATE]`
    #[must_use]
    pub fn with_causal_allele_rate(mut self, rate: f64) -> Self {
        self.causal_allele_rate = rate;
        self
    }

    /// Sets the default background frequency, must be within `[0, 1]`
    #[must_use]
    pub fn with_default_background_frequency(mut self, frequency: f64) -> Self {
        self.default_background_frequency = frequency;
        self
    }

    /// Sets the ratio of diseases without candidate variants, must be within `(0, 1]`
    #[must_use]
    pub fn with_no_variant_ratio(mut self, ratio: f64) -> Self {
        self.no_variant_ratio = ratio;
        self
    }

    /// Keep diseases without candidate variants at a neutral ratio
    #[must_use]
    pub fn with_keep_if_no_candidate_variant(mut self, keep: bool) -> Self {
        self.keep_if_no_candidate_variant = keep;
        self
    }

    /// Checks that all values are within their allowed range
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidConfiguration`] naming the first invalid value
    pub fn validate(&self) -> HpoResult<()> {
        if !(0.0..=1.0).contains(&self.min_pathogenicity) {
            return Err(HpoError::InvalidConfiguration(format!(
                "min_pathogenicity must be within [0, 1], not {}",
                self.min_pathogenicity
            )));
        }
        if !(0.0..=1.0).contains(&self.max_allele_frequency) {
            return Err(HpoError::InvalidConfiguration(format!(
                "max_allele_frequency must be within [0, 1], not {}",
                self.max_allele_frequency
            )));
        }
        if !(self.causal_allele_rate > 0.0 && self.causal_allele_rate <= MAX_EXPECTED_RATE) {
            return Err(HpoError::InvalidConfiguration(format!(
                "causal_allele_rate must be within (0, {MAX_EXPECTED_RATE}], not {}",
                self.causal_allele_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.default_background_frequency) {
            return Err(HpoError::InvalidConfiguration(format!(
                "default_background_frequency must be within [0, 1], not {}",
                self.default_background_frequency
            )));
        }
        if !(self.no_variant_ratio > 0.0 && self.no_variant_ratio <= 1.0) {
            return Err(HpoError::InvalidConfiguration(format!(
                "no_variant_ratio must be within (0, 1], not {}",
                self.no_variant_ratio
            )));
        }
        Ok(())
    }
}

/// All parameters of a [`DiagnosisRanker`](crate::DiagnosisRanker)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankingConfig {
    term_match: TermMatchConfig,
    genotype: GenotypeConfig,
}

impl RankingConfig {
    /// The parameters of the phenotype term matching
    pub fn term_match(&self) -> &TermMatchConfig {
        &self.term_match
    }

    /// The parameters of the genotype likelihood ratio
    pub fn genotype(&self) -> &GenotypeConfig {
        &self.genotype
    }

    /// Replaces the term matching parameters
    #[must_use]
    pub fn with_term_match(mut self, config: TermMatchConfig) -> Self {
        self.term_match = config;
        self
    }

    /// Replaces the genotype parameters
    #[must_use]
    pub fn with_genotype(mut self, config: GenotypeConfig) -> Self {
        self.genotype = config;
        self
    }

    /// Checks all parameters
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidConfiguration`] naming the first invalid value
    pub fn validate(&self) -> HpoResult<()> {
        self.term_match.validate()?;
        self.genotype.validate()
    }
}
