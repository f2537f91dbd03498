//! Genotype likelihood ratio of a gene and of the best gene of a disease
use tracing::{debug, trace, warn};

use crate::annotations::{Disease, GeneId};
use crate::case::ScoringNote;
use crate::config::GenotypeConfig;
use crate::genotype::{GeneVariantBundle, GenotypeEvidence, Variant};
use crate::stats::PoissonBurdenTest;
use crate::{HpoError, HpoResult, MAX_EXPECTED_RATE};

/// The genotype likelihood ratio of a disease, based on its best gene
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeScore {
    gene: Option<GeneId>,
    symbol: Option<String>,
    variants: Vec<Variant>,
    allele_count: u64,
    expected_rate: f64,
    ln_ratio: f64,
}

impl GenotypeScore {
    /// A score without any qualifying variant
    fn without_variants(gene: Option<GeneId>, expected_rate: f64, ratio: f64) -> Self {
        Self {
            gene,
            symbol: None,
            variants: Vec::new(),
            allele_count: 0,
            expected_rate,
            ln_ratio: ratio.ln(),
        }
    }

    pub(crate) fn set_symbol(&mut self, symbol: &str) {
        self.symbol = Some(symbol.to_string());
    }

    /// The gene that was used to calculate the score
    ///
    /// `None` if the disease is not associated with any gene
    pub fn gene(&self) -> Option<GeneId> {
        self.gene
    }

    /// The symbol of [`GenotypeScore::gene`], if known
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// The qualifying variants of the gene, in the order of the patient data
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Number of qualifying pathogenic alleles in the gene
    pub fn allele_count(&self) -> u64 {
        self.allele_count
    }

    /// The expected background rate of qualifying alleles in the gene
    pub fn expected_rate(&self) -> f64 {
        self.expected_rate
    }

    /// The genotype likelihood ratio
    pub fn ratio(&self) -> f64 {
        self.ln_ratio.exp()
    }

    /// The natural log of [`GenotypeScore::ratio`]
    pub fn ln_ratio(&self) -> f64 {
        self.ln_ratio
    }
}

/// Calculates the genotype likelihood ratio of genes and diseases
///
/// The qualifying alleles of a gene are compared to the gene's background
/// rate with a [`PoissonBurdenTest`].
///
/// # Examples
///
/// ```
/// use hpo_lr::GeneId;
/// use hpo_lr::config::GenotypeConfig;
/// use hpo_lr::genotype::{GeneVariantBundle, Variant};
/// use hpo_lr::likelihood_ratio::GenotypeLikelihoodRatio;
///
/// let gene = GeneId::from(2200u32);
/// let mut bundle = GeneVariantBundle::new(gene, "FBN1");
/// bundle.add_variant(Variant::new(gene, 0.95, 0.0, 2).unwrap()).unwrap();
///
/// let engine = GenotypeLikelihoodRatio::new(GenotypeConfig::default());
/// let score = engine.likelihood_ratio(gene, Some(&bundle), 0.01).unwrap();
/// assert_eq!(score.allele_count(), 2);
/// assert!(score.ratio() > 1.0);
///
/// let score = engine.likelihood_ratio(gene, None, 0.01).unwrap();
/// assert!((score.ratio() - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GenotypeLikelihoodRatio {
    config: GenotypeConfig,
}

impl GenotypeLikelihoodRatio {
    /// Constructs a new `GenotypeLikelihoodRatio`
    pub fn new(config: GenotypeConfig) -> Self {
        Self { config }
    }

    /// Returns the likelihood ratio of a single gene
    ///
    /// Genes without qualifying variants get the missing evidence ratio
    /// of the configuration.
    ///
    /// # Errors
    ///
    /// - [`HpoError::InvalidBackgroundRate`] if `background_rate` is negative or not a number
    /// - [`HpoError::NumberIsTooLarge`] if `background_rate` is above [`MAX_EXPECTED_RATE`]
    pub fn likelihood_ratio(
        &self,
        gene: GeneId,
        bundle: Option<&GeneVariantBundle>,
        background_rate: f64,
    ) -> HpoResult<GenotypeScore> {
        if background_rate.is_nan() || background_rate < 0.0 {
            return Err(HpoError::InvalidBackgroundRate {
                gene,
                rate: background_rate,
            });
        }
        if background_rate > MAX_EXPECTED_RATE {
            return Err(HpoError::NumberIsTooLarge {
                value: background_rate,
                threshold: MAX_EXPECTED_RATE,
            });
        }

        let Some(bundle) = bundle else {
            return Ok(GenotypeScore::without_variants(
                Some(gene),
                background_rate,
                self.config.missing_evidence_ratio(),
            ));
        };

        let min_pathogenicity = self.config.min_pathogenicity();
        let max_frequency = self.config.max_allele_frequency();
        let allele_count = bundle.qualifying_allele_count(min_pathogenicity, max_frequency);
        if allele_count == 0 {
            let mut score = GenotypeScore::without_variants(
                Some(gene),
                background_rate,
                self.config.missing_evidence_ratio(),
            );
            score.set_symbol(bundle.symbol());
            return Ok(score);
        }

        let variants: Vec<Variant> = bundle
            .qualifying_variants(min_pathogenicity, max_frequency)
            .cloned()
            .collect();
        for variant in &variants {
            trace!(
                "{} ({}): {} variant {}",
                bundle.symbol(),
                gene,
                variant.bin(),
                variant.label().unwrap_or("without label")
            );
        }

        let test = PoissonBurdenTest::new(background_rate)?;
        let ln_ratio = test.ln_likelihood_ratio(allele_count, self.config.causal_allele_rate())?;
        Ok(GenotypeScore {
            gene: Some(gene),
            symbol: Some(bundle.symbol().to_string()),
            variants,
            allele_count,
            expected_rate: background_rate,
            ln_ratio,
        })
    }

    /// Returns the likelihood ratio of the best gene of the disease
    ///
    /// A disease without associated genes gets the missing evidence ratio.
    /// Genes with an invalid background frequency are scored neutral.
    /// Both conditions are reported as [`ScoringNote`]s.
    ///
    /// # Errors
    ///
    /// [`HpoError::NumberIsTooLarge`] if the background rate of a gene is too large
    pub fn disease_likelihood_ratio(
        &self,
        disease: &Disease,
        evidence: &GenotypeEvidence,
    ) -> HpoResult<(GenotypeScore, Vec<ScoringNote>)> {
        let mut notes = Vec::new();
        if disease.genes().is_empty() {
            debug!("{} has no associated gene", disease.id());
            notes.push(ScoringNote::NoKnownDiseaseGene);
            let score = GenotypeScore::without_variants(
                None,
                self.config.default_background_frequency(),
                self.config.missing_evidence_ratio(),
            );
            return Ok((score, notes));
        }

        let mut best: Option<GenotypeScore> = None;
        for gene in disease.genes() {
            let score = match self.gene_likelihood_ratio(*gene, evidence) {
                Ok(score) => score,
                Err(HpoError::InvalidBackgroundRate { gene, rate }) => {
                    warn!(
                        "Invalid background rate {} for {} of {}, scoring neutral",
                        rate,
                        gene,
                        disease.id()
                    );
                    notes.push(ScoringNote::InvalidBackgroundRate { gene, rate });
                    GenotypeScore::without_variants(Some(gene), rate, 1.0)
                }
                Err(err) => return Err(err),
            };
            match &best {
                Some(current) if current.ln_ratio >= score.ln_ratio => {}
                _ => best = Some(score),
            }
        }

        let score = best.ok_or(HpoError::DoesNotExist)?;
        Ok((score, notes))
    }

    fn gene_likelihood_ratio(
        &self,
        gene: GeneId,
        evidence: &GenotypeEvidence,
    ) -> HpoResult<GenotypeScore> {
        let rate = evidence
            .background()
            .background_rate(&gene, self.config.min_bin())?
            .unwrap_or_else(|| self.config.default_background_frequency());
        self.likelihood_ratio(gene, evidence.variants_for_gene(&gene), rate)
    }
}
