//! The [`Ontology`] holds all [`HpoTerm`]s and their relationships
use core::fmt::Debug;
use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::annotations::DiseaseAnnotations;
use crate::term::internal::HpoTermInternal;
use crate::term::{information_content_from_probability, HpoGroup, HpoTerm};
use crate::{f64_from_usize, HpoError, HpoResult, HpoTermId};

mod termarena;
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` is the read-only term graph that observations are matched against
///
/// It contains all [`HpoTerm`]s, their `is_a` relationships and the
/// information content of every term. Each term caches the closure of all
/// its ancestors, so ancestor and descendant checks are simple lookups.
///
/// The ontology is built once and then only shared by reference. It does not
/// contain any interior mutability, so it can be read from many threads.
///
/// # Construction
///
/// 1. construct an empty Ontology [`Ontology::default`]
/// 2. Add all terms [`Ontology::insert_term`]
/// 3. Connect terms to their parents [`Ontology::add_parent`]
/// 4. Cache all ancestors [`Ontology::create_cache`]
/// 5. Set the information content, either externally derived values via
///    [`Ontology::set_information_content`] or from disease annotations
///    via [`Ontology::calculate_information_content`]
///
/// # Examples
///
/// ```
/// use hpo_lr::{HpoTermId, Ontology};
///
/// let mut ontology = Ontology::default();
/// ontology.insert_term("All".into(), 1u32);
/// ontology.insert_term("Phenotypic abnormality".into(), 118u32);
/// ontology.insert_term("Abnormality of the nervous system".into(), 707u32);
///
/// ontology.add_parent(1u32, 118u32).unwrap();
/// ontology.add_parent(118u32, 707u32).unwrap();
/// ontology.create_cache();
///
/// ontology.set_information_content(707u32, 1.2).unwrap();
///
/// let ancestors = ontology.ancestors_of(707u32.into()).unwrap();
/// assert!(ancestors.contains(&HpoTermId::from(1u32)));
/// assert_eq!(ontology.information_content(707u32.into()).unwrap(), 1.2);
///
/// assert!(ontology.ancestors_of(9999u32.into()).is_err());
/// ```
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ HPOTERM : contains
///     HPOTERM ||--|{ HPOTERM : is_a
///     HPOTERM }|--o{ DISEASE : annotated_to
///     DISEASE }o--o{ GENE : caused_by
///     HPOTERM {
///         HpoTermId id
///         str name
///         HpoGroup all_parents
///         f64 information_content
///     }
///     DISEASE {
///         DiseaseId id
///         HpoGroup terms
///         HpoGroup excluded_terms
///     }
/// ```
#[derive(Default, Clone)]
pub struct Ontology {
    hpo_terms: Arena,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.hpo_terms.len())
    }
}

/// Public API of the Ontology
///
/// Those methods are all safe to use
impl Ontology {
    /// Returns the number of terms in the Ontology
    pub fn len(&self) -> usize {
        self.hpo_terms.len()
    }

    /// Returns `true` if the Ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.hpo_terms.len() == 0
    }

    /// Returns `true` if the term is part of the Ontology
    pub fn contains(&self, term_id: &HpoTermId) -> bool {
        self.hpo_terms.get(*term_id).is_some()
    }

    /// Returns the [`HpoTerm`] of the provided [`HpoTermId`]
    ///
    /// If no such term is present in the Ontolgy, `None` is returned
    pub fn hpo<I: Into<HpoTermId>>(&self, term_id: I) -> Option<HpoTerm<'_>> {
        self.get(term_id).map(|term| HpoTerm::new(self, term))
    }

    /// Returns an Iterator of all [`HpoTerm`]s from the Ontology
    pub fn hpos(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns all direct and indirect ancestors of the term
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownTerm`] if the term is not part of the Ontology
    pub fn ancestors_of(&self, term_id: HpoTermId) -> HpoResult<&HpoGroup> {
        self.get(term_id)
            .map(HpoTermInternal::all_parents)
            .ok_or(HpoError::UnknownTerm(term_id))
    }

    /// Returns the information content of the term
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownTerm`] if the term is not part of the Ontology
    pub fn information_content(&self, term_id: HpoTermId) -> HpoResult<f64> {
        self.get(term_id)
            .map(HpoTermInternal::information_content)
            .ok_or(HpoError::UnknownTerm(term_id))
    }

    /// Returns the `HpoTermInternal` with the given `HpoTermId`
    ///
    /// Returns `None` if no such term is present
    pub(crate) fn get<I: Into<HpoTermId>>(&self, term_id: I) -> Option<&HpoTermInternal> {
        self.hpo_terms.get(term_id.into())
    }
}

/// Methods to build the Ontology
///
/// These methods are used during the setup phase, before any
/// case is ranked.
impl Ontology {
    /// Crates and inserts a new term to the ontology
    ///
    /// This method does not link the term to its parents
    ///
    /// # Examples
    ///
    /// ```
    /// use hpo_lr::Ontology;
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.insert_term("FooBar".into(), 1u32);
    ///
    /// assert_eq!(ontology.len(), 1);
    /// ```
    pub fn insert_term<I: Into<HpoTermId>>(&mut self, name: String, id: I) {
        let term = HpoTermInternal::new(name, id.into());
        self.hpo_terms.insert(term);
    }

    /// Add a connection from an [`HpoTerm`] to its parent
    ///
    /// The ancestor cache is not updated, call [`Ontology::create_cache`]
    /// once all connections are added.
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownTerm`] if the `parent_id` or `child_id` is not present in the Ontology
    pub fn add_parent<I: Into<HpoTermId>, J: Into<HpoTermId>>(
        &mut self,
        parent_id: I,
        child_id: J,
    ) -> HpoResult<()> {
        let parent_id = parent_id.into();
        let child_id = child_id.into();
        if !self.contains(&parent_id) {
            return Err(HpoError::UnknownTerm(parent_id));
        }

        self.hpo_terms
            .get_mut(child_id)
            .ok_or(HpoError::UnknownTerm(child_id))?
            .add_parent(parent_id);
        Ok(())
    }

    /// Crates and caches the `all_parents` values for every term
    ///
    /// Calling this method again rebuilds the whole cache, e.g. after
    /// more terms or connections were added.
    ///
    /// # Examples
    ///
    /// ```
    /// use hpo_lr::Ontology;
    ///
    /// let mut ontology = Ontology::default();
    /// ontology.insert_term("Root".into(), 1u32);
    /// ontology.insert_term("Foo".into(), 2u32);
    /// ontology.insert_term("Bar".into(), 3u32);
    ///
    /// ontology.add_parent(1u32, 2u32).unwrap();
    /// ontology.add_parent(2u32, 3u32).unwrap();
    ///
    /// // At this point #3 does not have info about grandparents
    /// assert!(!ontology.hpo(3u32).unwrap().all_parent_ids().contains(&1u32.into()));
    ///
    /// ontology.create_cache();
    /// assert!(ontology.hpo(3u32).unwrap().all_parent_ids().contains(&1u32.into()));
    /// ```
    pub fn create_cache(&mut self) {
        for term in self.hpo_terms.values_mut() {
            term.reset_cache();
        }
        for id in self.hpo_terms.keys() {
            if let Some(term) = self.hpo_terms.get(id) {
                if !term.parents_cached() {
                    self.create_cache_of_grandparents(id);
                }
            }
        }
    }

    /// Sets an externally derived information content of the term
    ///
    /// # Errors
    ///
    /// - [`HpoError::UnknownTerm`] if the term is not present
    /// - [`HpoError::InvalidInput`] if the value is negative or not finite
    pub fn set_information_content<I: Into<HpoTermId>>(
        &mut self,
        term_id: I,
        ic: f64,
    ) -> HpoResult<()> {
        let term_id = term_id.into();
        if !ic.is_finite() || ic < 0.0 {
            return Err(HpoError::InvalidInput(format!(
                "information content of {term_id} must be a positive number, not {ic}"
            )));
        }
        let term = self
            .hpo_terms
            .get_mut(term_id)
            .ok_or(HpoError::UnknownTerm(term_id))?;
        *term.information_content_mut() = ic;
        Ok(())
    }

    /// Calculates the information content of every term from disease annotations
    ///
    /// A disease counts towards a term if it is annotated with the term or any
    /// of its descendants. The IC is `-ln(n_term / n_diseases)`. Terms without
    /// any annotation get the IC of a term annotated to a single disease.
    ///
    /// The ancestor cache must be created before. Annotations with terms
    /// that are not part of the ontology are skipped.
    pub fn calculate_information_content(&mut self, diseases: &DiseaseAnnotations) {
        let n_diseases = diseases.len();
        if n_diseases == 0 {
            warn!("No diseases present, information content is not calculated");
            return;
        }

        let mut counts: HashMap<HpoTermId, usize> = HashMap::with_capacity(self.len());
        let mut skipped = 0usize;
        for disease in diseases {
            let mut terms = HpoGroup::new();
            for term_id in disease.annotated_terms() {
                let Ok(ancestors) = self.ancestors_of(term_id) else {
                    trace!("Skipping unknown term {} of {}", term_id, disease.id());
                    skipped += 1;
                    continue;
                };
                terms.insert(term_id);
                for ancestor in ancestors {
                    terms.insert(ancestor);
                }
            }
            for term_id in &terms {
                *counts.entry(term_id).or_default() += 1;
            }
        }

        let total = f64_from_usize(n_diseases);
        let unannotated = information_content_from_probability(1.0 / total);
        for term in self.hpo_terms.values_mut() {
            let ic = match counts.get(term.id()) {
                Some(count) => information_content_from_probability(f64_from_usize(*count) / total),
                None => unannotated,
            };
            *term.information_content_mut() = ic;
        }
        if skipped > 0 {
            warn!("Skipped {} annotations with unknown terms", skipped);
        }
        debug!(
            "Calculated information content from {} diseases for {} terms",
            n_diseases,
            self.len()
        );
    }

    /// This method is part of the cache creation to link all terms to their
    /// direct and indirect parents (grandparents)
    fn all_grandparents(&mut self, term_id: HpoTermId) -> HpoGroup {
        match self.hpo_terms.get(term_id) {
            Some(term) if term.parents_cached() => {}
            Some(_) => self.create_cache_of_grandparents(term_id),
            None => return HpoGroup::new(),
        }
        self.hpo_terms
            .get(term_id)
            .map(|term| term.all_parents().clone())
            .unwrap_or_default()
    }

    /// This method is part of the cache creation to link all terms to their
    /// direct and indirect parents (grandparents)
    ///
    /// It will (somewhat) recursively iterate all parents and copy all their parents.
    /// During this recursion, the list of `all_parents` is cached in each term that was
    /// iterated.
    ///
    /// The recursion bubbles up to the top of the ontolgy and then caches the
    /// list of direct and indirect parents for every term bubbling back down.
    /// It stops once it reaches a term with already cached `all_parents`.
    fn create_cache_of_grandparents(&mut self, term_id: HpoTermId) {
        let Some(term) = self.hpo_terms.get(term_id) else {
            return;
        };
        let parents = term.parents().clone();
        let mut res = HpoGroup::default();
        for parent in &parents {
            for gp in &self.all_grandparents(parent) {
                res.insert(gp);
            }
        }
        if let Some(term) = self.hpo_terms.get_mut(term_id) {
            term.set_all_parents(&res | &parents);
        }
    }
}

/// Iterates the Ontology and yields [`HpoTerm`]s
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, HpoTermInternal>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = HpoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|term| HpoTerm::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = HpoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.hpo_terms.values(),
            ontology: self,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::annotations::{Disease, DiseaseId};
    use crate::test_utils::example_ontology;

    #[test]
    fn add_parent_of_missing_term() {
        let mut ont = Ontology::default();
        ont.insert_term("Root".into(), 1u32);
        assert!(matches!(
            ont.add_parent(1u32, 2u32),
            Err(HpoError::UnknownTerm(id)) if id == HpoTermId::from(2u32)
        ));
        assert!(matches!(
            ont.add_parent(3u32, 1u32),
            Err(HpoError::UnknownTerm(id)) if id == HpoTermId::from(3u32)
        ));
    }

    #[test]
    fn cache_with_multiple_parents() {
        let ont = example_ontology();
        let ancestors = ont.ancestors_of(12285u32.into()).expect("term exists");
        for id in [864u32, 818, 12638, 707, 118, 1] {
            assert!(ancestors.contains(&id.into()), "missing {id}");
        }
        assert_eq!(ancestors.len(), 6);
    }

    #[test]
    fn recreate_cache() {
        let mut ont = Ontology::default();
        ont.insert_term("Root".into(), 1u32);
        ont.insert_term("Foo".into(), 2u32);
        ont.add_parent(1u32, 2u32).expect("terms exist");
        ont.create_cache();

        ont.insert_term("Bar".into(), 3u32);
        ont.add_parent(2u32, 3u32).expect("terms exist");
        ont.create_cache();

        let ancestors = ont.ancestors_of(3u32.into()).expect("term exists");
        assert_eq!(ancestors.len(), 2);
    }

    #[test]
    fn unknown_term() {
        let ont = example_ontology();
        assert!(matches!(
            ont.information_content(4242u32.into()),
            Err(HpoError::UnknownTerm(_))
        ));
        assert!(ont.hpo(4242u32).is_none());
    }

    #[test]
    fn invalid_information_content() {
        let mut ont = example_ontology();
        assert!(ont.set_information_content(707u32, -1.0).is_err());
        assert!(ont.set_information_content(707u32, f64::NAN).is_err());
        assert!(ont.set_information_content(4242u32, 1.0).is_err());
    }

    #[test]
    fn information_content_from_diseases() {
        let mut ont = example_ontology();
        let mut diseases = DiseaseAnnotations::default();

        let mut d1 = Disease::new(DiseaseId::omim(1), "D1");
        d1.add_term(100547u32, None).expect("valid frequency");
        let mut d2 = Disease::new(DiseaseId::omim(2), "D2");
        d2.add_term(12638u32, None).expect("valid frequency");
        let mut d3 = Disease::new(DiseaseId::omim(3), "D3");
        d3.add_term(10978u32, None).expect("valid frequency");
        let mut d4 = Disease::new(DiseaseId::omim(4), "D4");
        d4.add_term(707u32, None).expect("valid frequency");
        diseases.insert(d1);
        diseases.insert(d2);
        diseases.insert(d3);
        diseases.insert(d4);

        ont.calculate_information_content(&diseases);

        let ic = |id: u32| ont.information_content(id.into()).expect("term exists");

        assert!(ic(1).abs() < f64::EPSILON);
        assert!(ic(118).abs() < f64::EPSILON);
        // 3 of 4 diseases are below the nervous system
        assert!((ic(707) - (4f64 / 3f64).ln()).abs() < 1e-12);
        assert!((ic(100547) - 4f64.ln()).abs() < 1e-12);
        // not annotated at all, treated like a single annotation
        assert!((ic(864) - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn information_content_skips_unknown_terms() {
        let mut ont = example_ontology();
        let mut disease = Disease::new(DiseaseId::omim(1), "D1");
        disease.add_term(100547u32, None).expect("valid frequency");
        disease.add_term(4242u32, None).expect("valid frequency");
        let diseases: DiseaseAnnotations = [disease, Disease::new(DiseaseId::omim(2), "D2")]
            .into_iter()
            .collect();

        ont.calculate_information_content(&diseases);
        let ic = ont
            .information_content(707u32.into())
            .expect("term exists");
        assert!((ic - 2f64.ln()).abs() < 1e-12);
        assert!(ont.information_content(4242u32.into()).is_err());
    }

    #[test]
    fn iterate_terms() {
        let ont = example_ontology();
        assert_eq!(ont.hpos().count(), ont.len());
        assert!(!ont.is_empty());
    }
}
