use std::collections::HashMap;

use crate::term::internal::HpoTermInternal;
use crate::{HpoTermId, DEFAULT_NUM_TERMS};

/// Storage of all terms of the ontology
///
/// Terms are stored in a contiguous `Vec` and are addressed through an
/// index map. Once the ontology is built, the arena is only read.
#[derive(Debug, Clone)]
pub(crate) struct Arena {
    terms: Vec<HpoTermInternal>,
    ids: HashMap<HpoTermId, usize>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts a new term
    ///
    /// If a term with the same id exists already, it is replaced
    pub fn insert(&mut self, term: HpoTermInternal) {
        match self.ids.get(term.id()) {
            Some(idx) => self.terms[*idx] = term,
            None => {
                self.ids.insert(*term.id(), self.terms.len());
                self.terms.push(term);
            }
        }
    }

    pub fn get(&self, id: HpoTermId) -> Option<&HpoTermInternal> {
        self.ids.get(&id).map(|idx| &self.terms[*idx])
    }

    pub fn get_mut(&mut self, id: HpoTermId) -> Option<&mut HpoTermInternal> {
        match self.ids.get(&id) {
            Some(idx) => self.terms.get_mut(*idx),
            None => None,
        }
    }

    pub fn values(&self) -> std::slice::Iter<'_, HpoTermInternal> {
        self.terms.iter()
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, HpoTermInternal> {
        self.terms.iter_mut()
    }

    /// Returns all ids in insertion order
    pub fn keys(&self) -> Vec<HpoTermId> {
        self.terms.iter().map(|term| *term.id()).collect()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: Vec::with_capacity(DEFAULT_NUM_TERMS),
            ids: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}
