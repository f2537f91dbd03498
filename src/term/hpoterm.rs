use crate::term::internal::HpoTermInternal;
use crate::term::{HpoGroup, HpoParents, HpoTermIds};
use crate::HpoError;
use crate::HpoResult;
use crate::HpoTermId;
use crate::Ontology;

/// The `HpoTerm` represents a single term from the HP Ontology
///
/// The term holds references to its relationship data and its
/// information content. It provides the ancestor/descendant predicates
/// that are needed to match observed terms against disease annotations.
#[derive(Debug, Clone, Copy)]
pub struct HpoTerm<'a> {
    id: &'a HpoTermId,
    name: &'a str,
    parents: &'a HpoParents,
    all_parents: &'a HpoParents,
    information_content: f64,
    ontology: &'a Ontology,
}

impl<'a> HpoTerm<'a> {
    /// Constructs a new [`HpoTerm`]
    ///
    /// # Errors
    ///
    /// If the given [`HpoTermId`] does not match an existing term
    /// it returns [`HpoError::UnknownTerm`]
    pub fn try_new(ontology: &'a Ontology, term: HpoTermId) -> HpoResult<HpoTerm<'a>> {
        let term = ontology.get(term).ok_or(HpoError::UnknownTerm(term))?;
        Ok(HpoTerm::new(ontology, term))
    }

    /// Constructs a new [`HpoTerm`] from an `HpoTermInternal`
    pub(crate) fn new(ontology: &'a Ontology, term: &'a HpoTermInternal) -> HpoTerm<'a> {
        HpoTerm {
            id: term.id(),
            name: term.name(),
            parents: term.parents(),
            all_parents: term.all_parents(),
            information_content: term.information_content(),
            ontology,
        }
    }

    /// Returns the [`HpoTermId`] of the term
    ///
    /// e.g.: `HP:0012345`
    pub fn id(&self) -> HpoTermId {
        *self.id
    }

    /// Returns the name of the term
    ///
    /// e.g.: `Abnormality of the nervous system`
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the [`HpoTermId`]s of the direct parents
    pub fn parent_ids(&self) -> &HpoParents {
        self.parents
    }

    /// Returns the [`HpoTermId`]s of all direct and indirect parents
    pub fn all_parent_ids(&self) -> &HpoParents {
        self.all_parents
    }

    /// Returns an iterator of the direct parents of the term
    pub fn parents(&self) -> HpoTerms<'a> {
        HpoTerms::new(self.parents, self.ontology)
    }

    /// Returns the information content of the term
    ///
    /// The value is `-ln(p)`, with `p` being the probability that
    /// a disease is annotated with the term or any of its descendants.
    pub fn information_content(&self) -> f64 {
        self.information_content
    }

    /// Returns `true` if `self` is a child (direct or indirect) of `other`
    pub fn child_of(&self, other: &HpoTerm) -> bool {
        self.all_parents.contains(other.id)
    }

    /// Returns `true` if `self` is a parent (direct or indirect) of `other`
    pub fn parent_of(&self, other: &HpoTerm) -> bool {
        other.child_of(self)
    }

    /// Returns the [`HpoTermId`]s that are parents of both `self` **and** `other`
    ///
    /// If one term is an ancestor of the other, it is part of the result as well.
    pub fn common_ancestor_ids(&self, other: &HpoTerm) -> HpoGroup {
        let mut res = self.all_parent_ids() & other.all_parent_ids();

        if other.all_parent_ids().contains(self.id) {
            res.insert(*self.id);
        }

        if self.all_parent_ids().contains(other.id) {
            res.insert(*other.id);
        }

        res
    }

    /// Returns the common ancestor of `self` and `other` with the highest
    /// information content
    ///
    /// Ancestors without information content (e.g. the root term) are ignored.
    /// Ties are resolved towards the lower [`HpoTermId`].
    pub fn most_informative_common_ancestor(&self, other: &HpoTerm) -> Option<HpoTerm<'a>> {
        let mut best: Option<HpoTerm<'a>> = None;
        for id in &self.common_ancestor_ids(other) {
            let Some(ancestor) = self.ontology.hpo(id) else {
                continue;
            };
            if ancestor.information_content() <= 0.0 {
                continue;
            }
            match best {
                Some(b) if b.information_content() >= ancestor.information_content() => {}
                _ => best = Some(ancestor),
            }
        }
        best
    }
}

impl PartialEq for HpoTerm<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HpoTerm<'_> {}

/// Iterates [`HpoTerm`]s of an [`HpoGroup`]
pub struct HpoTerms<'a> {
    ontology: &'a Ontology,
    group: HpoTermIds<'a>,
}

impl<'a> HpoTerms<'a> {
    /// Constructs a new iterator of [`HpoTerm`]s from an [`HpoGroup`]
    pub fn new(group: &'a HpoGroup, ontology: &'a Ontology) -> Self {
        HpoTerms {
            group: group.iter(),
            ontology,
        }
    }
}

impl<'a> Iterator for HpoTerms<'a> {
    type Item = HpoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        // terms of a group are always part of the ontology they came from
        let ontology = self.ontology;
        self.group.by_ref().find_map(|id| ontology.hpo(id))
    }
}

impl std::fmt::Debug for HpoTerms<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoTerms")
    }
}
