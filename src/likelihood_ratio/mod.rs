//! Likelihood ratios of phenotype and genotype observations
//!
//! A likelihood ratio (LR) is the probability of an observation given the
//! disease, divided by the probability of the same observation given any
//! other disease. Values above `1.0` support the disease, values below
//! `1.0` speak against it.
//!
//! - [`TermMatcher`] calculates the LR of a single observed term
//! - [`PhenotypeLikelihoodRatio`] combines the LRs of all observed terms
//! - [`GenotypeLikelihoodRatio`] calculates the LR of the variants in the disease genes
//!
//! All LRs are floored at a positive minimum, so they can be combined in log space.

pub mod genotype;
pub mod matcher;
pub mod phenotype;

pub use genotype::{GenotypeLikelihoodRatio, GenotypeScore};
pub use matcher::{MatchType, TermMatch, TermMatcher};
pub use phenotype::{PhenotypeLikelihoodRatio, PhenotypeScore, TermLikelihoodRatio};
