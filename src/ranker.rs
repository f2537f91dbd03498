//! Ranking of candidate diseases by their posttest probability
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::annotations::{DiseaseAnnotations, DiseaseId, GeneId};
use crate::case::{HpoCase, ObservedTerm, PretestProbabilities, ScoringNote, TestResult};
use crate::config::RankingConfig;
use crate::genotype::GenotypeEvidence;
use crate::likelihood_ratio::{GenotypeLikelihoodRatio, PhenotypeLikelihoodRatio, PhenotypeScore};
use crate::{HpoError, HpoResult, Ontology};

/// Ranks the candidate diseases of an [`HpoCase`]
///
/// For every candidate the ranker combines the pretest probability with the
/// phenotype likelihood ratio and, if genotype data is provided, with the
/// genotype likelihood ratio:
///
/// ```text
/// posttest odds = pretest odds * phenotype LR * genotype LR
/// ```
///
/// The results are sorted by descending posttest probability. Ties are broken
/// by the composite likelihood ratio, then by the [`DiseaseId`].
///
/// The ranker only reads the ontology, the annotations and the genotype data.
/// With the `parallel` feature, candidates are scored on the `rayon` thread pool.
///
/// # Examples
///
/// ```
/// use hpo_lr::{DiagnosisRanker, Disease, DiseaseAnnotations, DiseaseId, Ontology};
/// use hpo_lr::case::CaseBuilder;
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term("All".into(), 1u32);
/// ontology.insert_term("Seizure".into(), 1250u32);
/// ontology.insert_term("Ataxia".into(), 1251u32);
/// ontology.add_parent(1u32, 1250u32).unwrap();
/// ontology.add_parent(1u32, 1251u32).unwrap();
/// ontology.create_cache();
/// ontology.set_information_content(1250u32, 3.0).unwrap();
/// ontology.set_information_content(1251u32, 3.0).unwrap();
///
/// let mut epilepsy = Disease::new(DiseaseId::omim(1), "Epilepsy");
/// epilepsy.add_term(1250u32, None).unwrap();
/// let mut ataxia = Disease::new(DiseaseId::omim(2), "Ataxia");
/// ataxia.add_term(1251u32, None).unwrap();
/// let diseases: DiseaseAnnotations = [epilepsy, ataxia].into_iter().collect();
///
/// let mut case = CaseBuilder::new()
///     .present(1250u32)
///     .candidates([DiseaseId::omim(1), DiseaseId::omim(2)])
///     .build()
///     .unwrap();
///
/// let ranker = DiagnosisRanker::new(&ontology, &diseases);
/// let results = ranker.rank(&mut case).unwrap();
///
/// assert_eq!(results[0].disease_id(), &DiseaseId::omim(1));
/// assert_eq!(results[0].rank(), 1);
/// assert!(results[0].posttest_probability() > 0.9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiagnosisRanker<'a> {
    ontology: &'a Ontology,
    diseases: &'a DiseaseAnnotations,
    genotype: Option<&'a GenotypeEvidence>,
    config: RankingConfig,
}

impl<'a> DiagnosisRanker<'a> {
    /// Constructs a phenotype-only ranker with the default configuration
    pub fn new(ontology: &'a Ontology, diseases: &'a DiseaseAnnotations) -> Self {
        Self {
            ontology,
            diseases,
            genotype: None,
            config: RankingConfig::default(),
        }
    }

    /// Adds genotype data, so every disease also gets a genotype likelihood ratio
    #[must_use]
    pub fn with_genotype(mut self, evidence: &'a GenotypeEvidence) -> Self {
        self.genotype = Some(evidence);
        self
    }

    /// Replaces the configuration
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidConfiguration`] if the configuration is invalid
    pub fn with_config(mut self, config: RankingConfig) -> HpoResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The configuration of the ranker
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Scores and sorts all candidate diseases of the case
    ///
    /// Previous results of the case are replaced. If ranking fails, the
    /// case is left without any results.
    ///
    /// Missing phenotype annotations, diseases without genes and invalid
    /// background frequencies are scored neutral and reported as
    /// [`ScoringNote`]s of the [`TestResult`].
    ///
    /// # Errors
    ///
    /// - [`HpoError::UnknownTerm`] if an observed term is not part of the ontology
    /// - [`HpoError::UnknownDisease`] if a candidate is not part of the annotations
    /// - [`HpoError::NumberIsTooLarge`] if a background rate is too large
    pub fn rank<'c>(&self, case: &'c mut HpoCase) -> HpoResult<&'c [TestResult]> {
        case.clear_results();

        for term in case.observed_terms() {
            if !self.ontology.contains(&term.id()) {
                return Err(HpoError::UnknownTerm(term.id()));
            }
        }

        let mut results = self.score_candidates(case)?;
        sort_results(&mut results);
        for (idx, result) in results.iter_mut().enumerate() {
            result.set_rank(idx + 1);
        }
        debug!(
            "Ranked {} candidates with {} observed terms",
            results.len(),
            case.observed_terms().len()
        );

        case.set_results(results);
        Ok(case.results())
    }

    #[cfg(feature = "parallel")]
    fn score_candidates(&self, case: &HpoCase) -> HpoResult<Vec<TestResult>> {
        case.candidates()
            .par_iter()
            .map(|id| self.score(case.observed_terms(), case.pretest(), id))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn score_candidates(&self, case: &HpoCase) -> HpoResult<Vec<TestResult>> {
        case.candidates()
            .iter()
            .map(|id| self.score(case.observed_terms(), case.pretest(), id))
            .collect()
    }

    /// Calculates the [`TestResult`] of a single disease
    ///
    /// The result is not ranked.
    ///
    /// # Errors
    ///
    /// - [`HpoError::UnknownDisease`] if the disease is not annotated or has no pretest probability
    /// - all errors of [`DiagnosisRanker::rank`]
    pub fn score(
        &self,
        observed: &[ObservedTerm],
        pretest: &PretestProbabilities,
        disease_id: &DiseaseId,
    ) -> HpoResult<TestResult> {
        let disease = self
            .diseases
            .get(disease_id)
            .ok_or(HpoError::UnknownDisease(*disease_id))?;
        let pretest = pretest.get(disease_id)?;
        let mut notes = Vec::new();

        let phenotype = PhenotypeLikelihoodRatio::new(self.ontology, *self.config.term_match());
        let phenotype = match phenotype.likelihood_ratio(observed, disease) {
            Ok(score) => score,
            Err(HpoError::MissingAnnotation(id)) => {
                warn!("{} does not have any annotations, scoring neutral", id);
                notes.push(ScoringNote::MissingAnnotation);
                PhenotypeScore::neutral()
            }
            Err(err) => return Err(err),
        };

        let genotype = match self.genotype {
            Some(evidence) => {
                let engine = GenotypeLikelihoodRatio::new(*self.config.genotype());
                let (mut score, genotype_notes) =
                    engine.disease_likelihood_ratio(disease, evidence)?;
                notes.extend(genotype_notes);
                if score.symbol().is_none() {
                    if let Some(symbol) = score
                        .gene()
                        .and_then(|gene| self.gene_symbol(&gene, evidence))
                    {
                        score.set_symbol(symbol);
                    }
                }
                Some(score)
            }
            None => None,
        };

        let result = TestResult::new(disease, pretest, phenotype, genotype, notes);
        debug!(
            "{}: pretest {}, composite LR {}, posttest {}",
            disease_id,
            result.pretest_probability(),
            result.composite_lr(),
            result.posttest_probability()
        );
        Ok(result)
    }

    /// The symbol of a gene without variants, from the annotations or the background data
    fn gene_symbol(&self, gene: &GeneId, evidence: &'a GenotypeEvidence) -> Option<&'a str> {
        self.diseases
            .gene_symbol(gene)
            .or_else(|| evidence.background().gene_symbol(gene))
    }
}

/// Sorts by descending posttest probability, descending composite
/// likelihood ratio and ascending disease id
fn sort_results(results: &mut [TestResult]) {
    results.sort_by(compare_results);
}

fn compare_results(a: &TestResult, b: &TestResult) -> Ordering {
    b.posttest_probability()
        .total_cmp(&a.posttest_probability())
        .then_with(|| b.ln_composite_lr().total_cmp(&a.ln_composite_lr()))
        .then_with(|| a.disease_id().cmp(b.disease_id()))
}
