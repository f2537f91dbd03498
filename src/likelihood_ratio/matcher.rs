//! Matching of a single observed term against the annotations of a disease
//!
//! Every annotated disease term is classified by its relation to the
//! observed term and converted into a likelihood ratio. The best ratio wins.
//!
//! | Relation | Ratio |
//! | --- | --- |
//! | Exact | `f * e^IC(q)` |
//! | Observed ancestor | `f * max(1, e^(IC(q) - λ * (IC(d) - IC(q))))` |
//! | Observed descendant | `f * e^IC(d)` |
//! | Common ancestor `a` | `f * (floor + (1 - floor) * w * e^-(IC(q) - IC(a)))` |
//! | No relation | `floor` |
//!
//! `q` is the observed term, `d` the disease term with annotation frequency
//! `f`, `λ` the ancestor discount and `w` the common ancestor weight. Ancestor
//! and descendant matches never exceed the exact ratio of `q` and every ratio
//! is at least `floor`.
use tracing::trace;

use crate::annotations::Disease;
use crate::config::TermMatchConfig;
use crate::term::{probability_from_information_content, HpoTerm};
use crate::{HpoError, HpoResult, HpoTermId, Ontology, DEFAULT_ANNOTATION_FREQUENCY};

/// The relation between an observed term and the best matching disease term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// The disease is annotated with the observed term
    Exact,
    /// The observed term is an ancestor of a disease term
    ObservedAncestor,
    /// The observed term is a descendant of a disease term
    ObservedDescendant,
    /// Both terms share an informative ancestor
    CommonAncestor,
    /// No relation to any disease term
    NoMatch,
    /// The excluded term, or one of its ancestors, is excluded in the disease as well
    ExcludedInDisease,
    /// The excluded term, or one of its descendants, is present in the disease
    ExcludedButPresent,
    /// The excluded term is not related to the disease annotations
    ExcludedUnrelated,
}

/// The likelihood ratio of an observed term for one disease
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermMatch {
    ratio: f64,
    match_type: MatchType,
    disease_term: Option<HpoTermId>,
}

impl TermMatch {
    fn new(ratio: f64, match_type: MatchType, disease_term: Option<HpoTermId>) -> Self {
        Self {
            ratio,
            match_type,
            disease_term,
        }
    }

    /// The likelihood ratio
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The relation of the best matching disease term
    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    /// The best matching disease term
    ///
    /// `None` if no disease term is related
    pub fn disease_term(&self) -> Option<HpoTermId> {
        self.disease_term
    }
}

/// Calculates likelihood ratios of observed terms
///
/// # Examples
///
/// ```
/// use hpo_lr::{Disease, DiseaseId, Ontology};
/// use hpo_lr::config::TermMatchConfig;
/// use hpo_lr::likelihood_ratio::{MatchType, TermMatcher};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term("All".into(), 1u32);
/// ontology.insert_term("Abnormality of the nervous system".into(), 707u32);
/// ontology.add_parent(1u32, 707u32).unwrap();
/// ontology.create_cache();
/// ontology.set_information_content(707u32, 2.0).unwrap();
///
/// let mut disease = Disease::new(DiseaseId::omim(1), "Foo");
/// disease.add_term(707u32, Some(0.5)).unwrap();
///
/// let matcher = TermMatcher::new(&ontology, TermMatchConfig::default());
/// let result = matcher.match_term(707u32.into(), &disease).unwrap();
///
/// assert_eq!(result.match_type(), MatchType::Exact);
/// assert!((result.ratio() - 0.5 * 2f64.exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TermMatcher<'a> {
    ontology: &'a Ontology,
    config: TermMatchConfig,
}

impl<'a> TermMatcher<'a> {
    /// Constructs a new `TermMatcher`
    pub fn new(ontology: &'a Ontology, config: TermMatchConfig) -> Self {
        Self { ontology, config }
    }

    /// Returns the best likelihood ratio of a present term for the disease
    ///
    /// Disease terms that are not part of the ontology are skipped.
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownTerm`] if the observed term is not part of the ontology
    pub fn match_term(&self, observed: HpoTermId, disease: &Disease) -> HpoResult<TermMatch> {
        let query = self.query(observed)?;
        let floor = self.config.no_match_ratio();

        let mut best = TermMatch::new(floor, MatchType::NoMatch, None);
        for term_id in disease.annotated_terms() {
            let Some(term) = self.ontology.hpo(term_id) else {
                trace!("Skipping unknown term {} of {}", term_id, disease.id());
                continue;
            };
            let frequency = disease
                .frequency(term_id)
                .unwrap_or(DEFAULT_ANNOTATION_FREQUENCY);
            let Some((ratio, match_type)) = self.relation_ratio(&query, &term, frequency) else {
                continue;
            };
            let ratio = ratio.max(floor);
            if ratio > best.ratio {
                best = TermMatch::new(ratio, match_type, Some(term_id));
            }
        }
        trace!(
            "{} in {}: {:?} with ratio {}",
            observed,
            disease.id(),
            best.match_type,
            best.ratio
        );
        Ok(best)
    }

    /// Returns the likelihood ratio of an explicitly excluded term for the disease
    ///
    /// | Disease annotation | Ratio |
    /// | --- | --- |
    /// | excludes the term or an ancestor | `1 / max(1 - e^-IC(q), floor)` |
    /// | presents the term or a descendant with frequency `f` | `max(1 - f, floor)` |
    /// | unrelated | `1` |
    ///
    /// A disease that presents the excluded term never scores above an unrelated one.
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownTerm`] if the observed term is not part of the ontology
    pub fn match_excluded_term(
        &self,
        observed: HpoTermId,
        disease: &Disease,
    ) -> HpoResult<TermMatch> {
        let query = self.query(observed)?;
        let floor = self.config.no_match_ratio();
        let ic = query.information_content();
        let absent_in_population = (1.0 - probability_from_information_content(ic)).max(floor);

        let excluded = disease.excluded_terms();
        if excluded.contains(&observed) {
            return Ok(TermMatch::new(
                1.0 / absent_in_population,
                MatchType::ExcludedInDisease,
                Some(observed),
            ));
        }
        if let Some(ancestor) = (query.all_parent_ids() & excluded).iter().next() {
            return Ok(TermMatch::new(
                1.0 / absent_in_population,
                MatchType::ExcludedInDisease,
                Some(ancestor),
            ));
        }

        let mut present: Option<(f64, HpoTermId)> = None;
        for term_id in disease.annotated_terms() {
            let related = term_id == observed
                || self
                    .ontology
                    .hpo(term_id)
                    .is_some_and(|term| term.child_of(&query));
            if !related {
                continue;
            }
            let frequency = disease
                .frequency(term_id)
                .unwrap_or(DEFAULT_ANNOTATION_FREQUENCY);
            match present {
                Some((best, _)) if best >= frequency => {}
                _ => present = Some((frequency, term_id)),
            }
        }

        Ok(match present {
            Some((frequency, term_id)) => TermMatch::new(
                (1.0 - frequency).max(floor),
                MatchType::ExcludedButPresent,
                Some(term_id),
            ),
            None => TermMatch::new(1.0, MatchType::ExcludedUnrelated, None),
        })
    }

    fn query(&self, observed: HpoTermId) -> HpoResult<HpoTerm<'a>> {
        self.ontology
            .hpo(observed)
            .ok_or(HpoError::UnknownTerm(observed))
    }

    /// Classifies the relation between the observed and the disease term
    ///
    /// Returns `None` if they are not related through an informative term
    fn relation_ratio(
        &self,
        query: &HpoTerm,
        term: &HpoTerm,
        frequency: f64,
    ) -> Option<(f64, MatchType)> {
        let ic_query = query.information_content();
        let exact = frequency * ic_query.exp();

        if query.id() == term.id() {
            return Some((exact, MatchType::Exact));
        }

        if query.parent_of(term) {
            let distance = term.information_content() - ic_query;
            let ratio = (ic_query - self.config.ancestor_ic_discount() * distance)
                .exp()
                .max(1.0);
            return Some(((frequency * ratio).min(exact), MatchType::ObservedAncestor));
        }

        if query.child_of(term) {
            let ratio = frequency * term.information_content().exp();
            return Some((ratio.min(exact), MatchType::ObservedDescendant));
        }

        let ancestor = query.most_informative_common_ancestor(term)?;
        let floor = self.config.no_match_ratio();
        let distance = (ic_query - ancestor.information_content()).max(0.0);
        let similarity = self.config.common_ancestor_weight() * (-distance).exp();
        Some((
            frequency * (floor + (1.0 - floor) * similarity),
            MatchType::CommonAncestor,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::DiseaseId;
    use crate::test_utils::example_ontology;

    fn disease_with(terms: &[(u32, f64)]) -> Disease {
        let mut disease = Disease::new(DiseaseId::omim(1), "Test");
        for (term, frequency) in terms {
            disease
                .add_term(*term, Some(*frequency))
                .expect("valid frequency");
        }
        disease
    }

    fn matcher(ontology: &Ontology) -> TermMatcher<'_> {
        TermMatcher::new(ontology, TermMatchConfig::default())
    }

    #[test]
    fn exact_match() {
        let ontology = example_ontology();
        let disease = disease_with(&[(2011, 1.0)]);
        let result = matcher(&ontology)
            .match_term(2011u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::Exact);
        assert_eq!(result.disease_term(), Some(HpoTermId::from(2011u32)));
        assert!((result.ratio() - 2f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn observed_ancestor() {
        let ontology = example_ontology();
        // HP:0002011 (IC 2.0) is an ancestor of HP:0100547 (IC 3.0)
        let disease = disease_with(&[(100547, 1.0)]);
        let result = matcher(&ontology)
            .match_term(2011u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::ObservedAncestor);
        assert!((result.ratio() - 1.5f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn observed_descendant() {
        let ontology = example_ontology();
        let disease = disease_with(&[(2011, 1.0)]);
        let result = matcher(&ontology)
            .match_term(100547u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::ObservedDescendant);
        assert!((result.ratio() - 2f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn common_ancestor() {
        let ontology = example_ontology();
        // HP:0012638 (IC 1.5) and HP:0002011 share HP:0000707 (IC 1.0)
        let disease = disease_with(&[(2011, 1.0)]);
        let result = matcher(&ontology)
            .match_term(12638u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::CommonAncestor);
        let expected = 0.01 + 0.99 * 0.5 * (-0.5f64).exp();
        assert!((result.ratio() - expected).abs() < 1e-12);
        assert!(result.ratio() > 0.01 && result.ratio() < 1.0);
    }

    #[test]
    fn common_ancestor_between_floor_and_ancestor() {
        let ontology = example_ontology();
        let disease = disease_with(&[(2011, 1.0)]);
        let ancestor = matcher(&ontology)
            .match_term(707u32.into(), &disease)
            .expect("term exists");
        for weight in [0.001, 0.5, 0.99] {
            let config = TermMatchConfig::default().with_common_ancestor_weight(weight);
            config.validate().expect("valid weight");
            let result = TermMatcher::new(&ontology, config)
                .match_term(12638u32.into(), &disease)
                .expect("term exists");
            assert_eq!(result.match_type(), MatchType::CommonAncestor);
            assert!(result.ratio() > config.no_match_ratio());
            assert!(result.ratio() < ancestor.ratio());
        }
    }

    #[test]
    fn no_relation() {
        let ontology = example_ontology();
        let disease = disease_with(&[(100547, 1.0)]);
        let result = matcher(&ontology)
            .match_term(10978u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::NoMatch);
        assert_eq!(result.disease_term(), None);
        assert_eq!(result.ratio(), 0.01);
    }

    #[test]
    fn exact_is_the_best_match_type() {
        let ontology = example_ontology();
        let m = matcher(&ontology);
        let observed = HpoTermId::from(2011u32);
        let exact = m
            .match_term(observed, &disease_with(&[(2011, 0.7)]))
            .expect("term exists");
        for other in [12443u32, 100547, 12639, 707, 12638, 864] {
            let result = m
                .match_term(observed, &disease_with(&[(other, 0.7)]))
                .expect("term exists");
            assert!(
                exact.ratio() >= result.ratio(),
                "{other}: {:?}",
                result.match_type()
            );
        }
    }

    #[test]
    fn frequency_scales_ratio() {
        let ontology = example_ontology();
        let m = matcher(&ontology);
        let rare = m
            .match_term(2011u32.into(), &disease_with(&[(2011, 0.1)]))
            .expect("term exists");
        let common = m
            .match_term(2011u32.into(), &disease_with(&[(2011, 0.9)]))
            .expect("term exists");
        assert!(common.ratio() > rare.ratio());
    }

    #[test]
    fn best_disease_term_wins() {
        let ontology = example_ontology();
        let disease = disease_with(&[(10978, 1.0), (12638, 1.0), (2011, 1.0)]);
        let result = matcher(&ontology)
            .match_term(2011u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::Exact);
    }

    #[test]
    fn unknown_observed_term() {
        let ontology = example_ontology();
        let disease = disease_with(&[(2011, 1.0)]);
        assert!(matches!(
            matcher(&ontology).match_term(4242u32.into(), &disease),
            Err(HpoError::UnknownTerm(id)) if id == HpoTermId::from(4242u32)
        ));
        assert!(matcher(&ontology)
            .match_excluded_term(4242u32.into(), &disease)
            .is_err());
    }

    #[test]
    fn unknown_disease_term_is_skipped() {
        let ontology = example_ontology();
        let disease = disease_with(&[(4242, 1.0), (2011, 1.0)]);
        let result = matcher(&ontology)
            .match_term(2011u32.into(), &disease)
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::Exact);
    }

    #[test]
    fn excluded_in_disease() {
        let ontology = example_ontology();
        let mut disease = disease_with(&[(10978, 1.0)]);
        disease.add_excluded_term(2011u32);
        let m = matcher(&ontology);

        let direct = m
            .match_excluded_term(2011u32.into(), &disease)
            .expect("term exists");
        assert_eq!(direct.match_type(), MatchType::ExcludedInDisease);
        assert!((direct.ratio() - 1.0 / (1.0 - (-2f64).exp())).abs() < 1e-12);
        assert!(direct.ratio() > 1.0);

        // HP:0100547 is a descendant of the excluded HP:0002011
        let descendant = m
            .match_excluded_term(100547u32.into(), &disease)
            .expect("term exists");
        assert_eq!(descendant.match_type(), MatchType::ExcludedInDisease);
        assert_eq!(descendant.disease_term(), Some(HpoTermId::from(2011u32)));
    }

    #[test]
    fn excluded_but_present() {
        let ontology = example_ontology();
        let m = matcher(&ontology);

        let rare = m
            .match_excluded_term(2011u32.into(), &disease_with(&[(100547, 0.2)]))
            .expect("term exists");
        let frequent = m
            .match_excluded_term(2011u32.into(), &disease_with(&[(100547, 0.9)]))
            .expect("term exists");
        let always = m
            .match_excluded_term(2011u32.into(), &disease_with(&[(2011, 1.0)]))
            .expect("term exists");

        assert_eq!(rare.match_type(), MatchType::ExcludedButPresent);
        assert!(rare.ratio() > frequent.ratio());
        assert!((rare.ratio() - 0.8).abs() < 1e-12);
        assert_eq!(always.ratio(), 0.01);
    }

    #[test]
    fn presenting_an_excluded_term_is_never_rewarded() {
        let ontology = example_ontology();
        let m = matcher(&ontology);
        // broad and specific excluded terms, each with a present descendant
        let pairs = [(118u32, 2011u32), (707, 12639), (707, 100547), (12639, 12443), (2011, 2011)];
        for (excluded, present) in pairs {
            for frequency in [0.01, 0.17, 0.5, 0.9, 1.0] {
                let presents = m
                    .match_excluded_term(excluded.into(), &disease_with(&[(present, frequency)]))
                    .expect("term exists");
                let unrelated = m
                    .match_excluded_term(excluded.into(), &disease_with(&[(1, frequency)]))
                    .expect("term exists");
                assert_eq!(presents.match_type(), MatchType::ExcludedButPresent);
                assert_eq!(unrelated.match_type(), MatchType::ExcludedUnrelated);
                assert!(
                    presents.ratio() <= unrelated.ratio(),
                    "HP:{excluded} with {present} at {frequency}: {}",
                    presents.ratio()
                );
            }
        }
    }

    #[test]
    fn excluded_unrelated() {
        let ontology = example_ontology();
        // HP:0000707 is an ancestor, not a descendant, of the excluded term
        let result = matcher(&ontology)
            .match_excluded_term(2011u32.into(), &disease_with(&[(707, 1.0)]))
            .expect("term exists");
        assert_eq!(result.match_type(), MatchType::ExcludedUnrelated);
        assert_eq!(result.ratio(), 1.0);
    }
}
