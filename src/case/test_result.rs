use crate::annotations::{Disease, DiseaseId, GeneId};
use crate::likelihood_ratio::{GenotypeScore, PhenotypeScore, TermLikelihoodRatio};
use crate::stats::{logistic, logit};

/// A condition that was downgraded to neutral evidence while scoring a disease
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringNote {
    /// The disease does not have any phenotype annotation,
    /// the phenotype likelihood ratio is `1.0`
    MissingAnnotation,
    /// The disease is not associated with any gene,
    /// the genotype likelihood ratio is the missing evidence ratio
    NoKnownDiseaseGene,
    /// The background frequency of a gene is invalid,
    /// the gene's likelihood ratio is `1.0`
    InvalidBackgroundRate {
        /// The affected gene
        gene: GeneId,
        /// The rejected rate
        rate: f64,
    },
}

/// The result of testing a single disease against the case
///
/// It contains the pretest and posttest probability, and all individual
/// likelihood ratios that contributed to the posttest probability.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    disease: DiseaseId,
    name: String,
    rank: usize,
    pretest: f64,
    posttest: f64,
    ln_composite: f64,
    phenotype: PhenotypeScore,
    genotype: Option<GenotypeScore>,
    notes: Vec<ScoringNote>,
}

impl TestResult {
    /// Combines the pretest probability with all likelihood ratios
    pub(crate) fn new(
        disease: &Disease,
        pretest: f64,
        phenotype: PhenotypeScore,
        genotype: Option<GenotypeScore>,
        notes: Vec<ScoringNote>,
    ) -> Self {
        let ln_composite =
            phenotype.ln_ratio() + genotype.as_ref().map_or(0.0, GenotypeScore::ln_ratio);
        Self {
            disease: *disease.id(),
            name: disease.name().to_string(),
            rank: 0,
            pretest,
            posttest: logistic(logit(pretest) + ln_composite),
            ln_composite,
            phenotype,
            genotype,
            notes,
        }
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    /// The id of the tested disease
    pub fn disease_id(&self) -> &DiseaseId {
        &self.disease
    }

    /// The name of the tested disease
    pub fn disease_name(&self) -> &str {
        &self.name
    }

    /// The rank within the differential diagnosis, starting at `1`
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The probability of the disease before considering the case
    pub fn pretest_probability(&self) -> f64 {
        self.pretest
    }

    /// The probability of the disease after considering the case
    pub fn posttest_probability(&self) -> f64 {
        self.posttest
    }

    /// The product of the phenotype and the genotype likelihood ratio
    ///
    /// The value saturates at `f64::MAX`, use [`TestResult::ln_composite_lr`]
    /// for the exact value.
    pub fn composite_lr(&self) -> f64 {
        self.ln_composite.exp().min(f64::MAX)
    }

    /// The natural log of [`TestResult::composite_lr`]
    pub fn ln_composite_lr(&self) -> f64 {
        self.ln_composite
    }

    /// The combined likelihood ratio of all observed terms
    pub fn phenotype_lr(&self) -> f64 {
        self.phenotype.ratio()
    }

    /// The genotype likelihood ratio
    ///
    /// `None` if the case was ranked without genotype data
    pub fn genotype_lr(&self) -> Option<f64> {
        self.genotype.as_ref().map(GenotypeScore::ratio)
    }

    /// The phenotype score
    pub fn phenotype(&self) -> &PhenotypeScore {
        &self.phenotype
    }

    /// The genotype score, if the case was ranked with genotype data
    pub fn genotype(&self) -> Option<&GenotypeScore> {
        self.genotype.as_ref()
    }

    /// Returns `true` if the result includes a genotype likelihood ratio
    pub fn has_genotype(&self) -> bool {
        self.genotype.is_some()
    }

    /// The likelihood ratio of every observed term, in the order of the case
    pub fn term_ratios(&self) -> &[TermLikelihoodRatio] {
        self.phenotype.terms()
    }

    /// Downgraded conditions that occurred while scoring the disease
    pub fn notes(&self) -> &[ScoringNote] {
        &self.notes
    }
}
