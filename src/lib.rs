#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use core::fmt::Debug;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

pub mod annotations;
pub mod case;
pub mod config;
pub mod genotype;
pub mod likelihood_ratio;
pub mod ontology;
pub mod parser;
pub mod ranker;
pub mod stats;
pub mod term;

#[cfg(test)]
pub(crate) mod test_utils;

pub use annotations::{Disease, DiseaseAnnotations, DiseaseId, GeneId};
pub use case::{HpoCase, ObservedTerm, Polarity, PretestProbabilities, TestResult};
pub use config::RankingConfig;
pub use ontology::Ontology;
pub use ranker::DiagnosisRanker;
pub use term::{HpoTerm, HpoTermId};

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_ALL_PARENTS: usize = 30;
const DEFAULT_NUM_TERMS: usize = 20_000;
const DEFAULT_NUM_GENES: usize = 2;

/// Likelihood ratio assigned to an observed term that has no relation to any disease term
pub const DEFAULT_NO_MATCH_RATIO: f64 = 0.01;
/// Penalty exponent per unit of information content between an observed
/// ancestor term and the annotated disease term
pub const DEFAULT_ANCESTOR_IC_DISCOUNT: f64 = 0.5;
/// Weight of a common-ancestor match relative to a neutral observation
pub const DEFAULT_COMMON_ANCESTOR_WEIGHT: f64 = 0.5;
/// Annotation frequency used when the disease annotation does not specify one
pub const DEFAULT_ANNOTATION_FREQUENCY: f64 = 1.0;

/// Minimum pathogenicity score of a variant to count towards the burden test
pub const DEFAULT_MIN_PATHOGENICITY: f64 = 0.8;
/// Maximum population allele frequency of a variant to count towards the burden test
pub const DEFAULT_MAX_ALLELE_FREQUENCY: f64 = 0.01;
/// Expected number of qualifying alleles in a true disease gene
pub const DEFAULT_CAUSAL_ALLELE_RATE: f64 = 1.0;
/// Background frequency of genes without any background data
pub const DEFAULT_BACKGROUND_FREQUENCY: f64 = 1e-4;
/// Genotype likelihood ratio of a disease without candidate variants
pub const DEFAULT_NO_VARIANT_RATIO: f64 = 0.05;

/// Upper bound of a plausible expected variant count per gene
pub const MAX_EXPECTED_RATE: f64 = 100.0;
/// Expected rate used instead of `0.0` when variants were observed
pub const MIN_EXPECTED_RATE: f64 = 1e-10;

/// Tolerance for the sum of all pretest probabilities
const PRETEST_SUM_TOLERANCE: f64 = 1e-6;

/// Main Error type for this crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HpoError {
    /// The observed term is not part of the ontology
    #[error("term {0} does not exist in the ontology")]
    UnknownTerm(HpoTermId),
    /// Term, gene or disease does not exist
    #[error("does not exist")]
    DoesNotExist,
    /// The disease is not part of the candidate set or annotation store
    #[error("disease {0} is unknown")]
    UnknownDisease(DiseaseId),
    /// The disease does not have any phenotype annotation
    #[error("disease {0} does not have any annotated terms")]
    MissingAnnotation(DiseaseId),
    /// The background frequency of a gene is not a valid rate
    #[error("invalid background rate {rate} for {gene}")]
    InvalidBackgroundRate {
        /// The affected gene
        gene: GeneId,
        /// The rejected rate
        rate: f64,
    },
    /// Input value exceeds the numeric range supported by the statistics
    #[error("{value} exceeded {threshold}")]
    NumberIsTooLarge {
        /// The rejected value
        value: f64,
        /// The maximum allowed value
        threshold: f64,
    },
    /// Pretest probabilities are out of range or do not sum up to 1
    #[error("invalid pretest probability: {0}")]
    InvalidPretestProbability(String),
    /// A configuration value is out of its allowed range
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Failed to parse an integer
    #[error("unable to parse Integer")]
    ParseIntError,
    /// Failed to parse a float
    #[error("unable to parse Float")]
    ParseFloatError,
    /// Failed to parse a line of input data
    #[error("invalid data: {0}")]
    InvalidInput(String),
    /// A file could not be opened or read
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
}

impl From<ParseIntError> for HpoError {
    fn from(_: ParseIntError) -> Self {
        HpoError::ParseIntError
    }
}

impl From<ParseFloatError> for HpoError {
    fn from(_: ParseFloatError) -> Self {
        HpoError::ParseFloatError
    }
}

/// Shortcut for `Result<T, HpoError>`
pub type HpoResult<T> = Result<T, HpoError>;

/// Converts a `usize` into `f64`
///
/// Counts in this crate are far below `2^32`, so the conversion is lossless.
/// Larger values saturate.
pub(crate) fn f64_from_usize(n: usize) -> f64 {
    let intermediate: u32 = n.try_into().unwrap_or(u32::MAX);
    intermediate.into()
}

/// Converts a `u64` into `f64`, saturating at `u32::MAX`
///
/// Callers must cap their values below `u32::MAX` to get exact results.
pub(crate) fn f64_from_u64(n: u64) -> f64 {
    let intermediate: u32 = n.try_into().unwrap_or(u32::MAX);
    intermediate.into()
}
