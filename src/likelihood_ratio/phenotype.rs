//! Phenotype likelihood ratio of all observed terms for one disease
use tracing::trace;

use crate::annotations::Disease;
use crate::case::{ObservedTerm, Polarity};
use crate::config::TermMatchConfig;
use crate::likelihood_ratio::matcher::{MatchType, TermMatcher};
use crate::{HpoError, HpoResult, HpoTermId, Ontology};

/// The likelihood ratio of one observed term for one disease
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermLikelihoodRatio {
    observed: ObservedTerm,
    ratio: f64,
    match_type: MatchType,
    disease_term: Option<HpoTermId>,
}

impl TermLikelihoodRatio {
    /// The observed term
    pub fn observed(&self) -> &ObservedTerm {
        &self.observed
    }

    /// The likelihood ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The relation to the best matching disease term
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// The best matching disease term, if any
    pub fn disease_term(&self) -> Option<HpoTermId> {
        self.disease_term
    }
}

/// The combined phenotype likelihood ratio of a disease
#[derive(Debug, Clone, PartialEq)]
pub struct PhenotypeScore {
    ln_ratio: f64,
    terms: Vec<TermLikelihoodRatio>,
}

impl PhenotypeScore {
    /// A score of `1.0` without any term information
    pub fn neutral() -> Self {
        Self {
            ln_ratio: 0.0,
            terms: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_ln_ratio(ln_ratio: f64) -> Self {
        Self {
            ln_ratio,
            terms: Vec::new(),
        }
    }

    /// The product of all term likelihood ratios
    pub fn ratio(&self) -> f64 {
        self.ln_ratio.exp()
    }

    /// The natural log of [`PhenotypeScore::ratio`]
    pub fn ln_ratio(&self) -> f64 {
        self.ln_ratio
    }

    /// The likelihood ratios of every observed term, in input order
    pub fn terms(&self) -> &[TermLikelihoodRatio] {
        &self.terms
    }
}

/// Calculates the phenotype likelihood ratio of a disease
///
/// Every observed term contributes its best single ratio. Ratios are
/// multiplied by summing their logs.
#[derive(Debug, Clone, Copy)]
pub struct PhenotypeLikelihoodRatio<'a> {
    matcher: TermMatcher<'a>,
}

impl<'a> PhenotypeLikelihoodRatio<'a> {
    /// Constructs a new `PhenotypeLikelihoodRatio`
    pub fn new(ontology: &'a Ontology, config: TermMatchConfig) -> Self {
        Self {
            matcher: TermMatcher::new(ontology, config),
        }
    }

    /// Returns the combined likelihood ratio of all observed terms
    ///
    /// # Errors
    ///
    /// - [`HpoError::UnknownTerm`] if an observed term is not part of the ontology
    /// - [`HpoError::MissingAnnotation`] if the disease has neither present nor excluded terms
    pub fn likelihood_ratio(
        &self,
        observed: &[ObservedTerm],
        disease: &Disease,
    ) -> HpoResult<PhenotypeScore> {
        if !disease.is_annotated() {
            return Err(HpoError::MissingAnnotation(*disease.id()));
        }

        let mut ln_ratio = 0.0;
        let mut terms = Vec::with_capacity(observed.len());
        for term in observed {
            let result = match term.polarity() {
                Polarity::Present => self.matcher.match_term(term.id(), disease)?,
                Polarity::Excluded => self.matcher.match_excluded_term(term.id(), disease)?,
            };
            ln_ratio += result.ratio().ln();
            terms.push(TermLikelihoodRatio {
                observed: *term,
                ratio: result.ratio(),
                match_type: result.match_type(),
                disease_term: result.disease_term(),
            });
        }
        trace!("Phenotype LR of {}: {}", disease.id(), ln_ratio.exp());
        Ok(PhenotypeScore { ln_ratio, terms })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{example_diseases, example_ontology};
    use crate::DiseaseId;

    #[test]
    fn terms_keep_input_order() {
        let ontology = example_ontology();
        let diseases = example_diseases();
        let disease = diseases.get(&DiseaseId::omim(100001)).expect("disease exists");
        let engine = PhenotypeLikelihoodRatio::new(&ontology, TermMatchConfig::default());

        let observed = [
            ObservedTerm::present(10978u32),
            ObservedTerm::present(100547u32),
            ObservedTerm::excluded(12638u32),
        ];
        let score = engine
            .likelihood_ratio(&observed, disease)
            .expect("all terms exist");

        let ids: Vec<HpoTermId> = score.terms().iter().map(|t| t.observed().id()).collect();
        assert_eq!(
            ids,
            vec![
                HpoTermId::from(10978u32),
                HpoTermId::from(100547u32),
                HpoTermId::from(12638u32)
            ]
        );
        assert_eq!(score.terms()[1].match_type(), MatchType::Exact);
    }

    #[test]
    fn product_of_term_ratios() {
        let ontology = example_ontology();
        let diseases = example_diseases();
        let disease = diseases.get(&DiseaseId::omim(100001)).expect("disease exists");
        let engine = PhenotypeLikelihoodRatio::new(&ontology, TermMatchConfig::default());

        let observed = [
            ObservedTerm::present(100547u32),
            ObservedTerm::present(12285u32),
            ObservedTerm::present(10978u32),
        ];
        let score = engine
            .likelihood_ratio(&observed, disease)
            .expect("all terms exist");
        let product: f64 = score.terms().iter().map(TermLikelihoodRatio::ratio).product();
        assert!((score.ratio() - product).abs() < 1e-9 * product);
        assert!(score.ratio() > 0.0);
    }

    #[test]
    fn no_observed_terms() {
        let ontology = example_ontology();
        let diseases = example_diseases();
        let disease = diseases.get(&DiseaseId::omim(100002)).expect("disease exists");
        let engine = PhenotypeLikelihoodRatio::new(&ontology, TermMatchConfig::default());

        let score = engine.likelihood_ratio(&[], disease).expect("nothing to match");
        assert_eq!(score.ratio(), 1.0);
        assert!(score.terms().is_empty());
    }

    #[test]
    fn missing_annotation() {
        let ontology = example_ontology();
        let diseases = example_diseases();
        let disease = diseases.get(&DiseaseId::omim(100003)).expect("disease exists");
        let engine = PhenotypeLikelihoodRatio::new(&ontology, TermMatchConfig::default());

        assert!(matches!(
            engine.likelihood_ratio(&[ObservedTerm::present(707u32)], disease),
            Err(HpoError::MissingAnnotation(id)) if id == DiseaseId::omim(100003)
        ));
    }

    #[test]
    fn unknown_term() {
        let ontology = example_ontology();
        let diseases = example_diseases();
        let disease = diseases.get(&DiseaseId::omim(100001)).expect("disease exists");
        let engine = PhenotypeLikelihoodRatio::new(&ontology, TermMatchConfig::default());

        assert!(matches!(
            engine.likelihood_ratio(
                &[ObservedTerm::present(707u32), ObservedTerm::excluded(4242u32)],
                disease
            ),
            Err(HpoError::UnknownTerm(_))
        ));
    }
}
