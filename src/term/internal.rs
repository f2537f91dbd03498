use crate::term::{HpoGroup, HpoParents, HpoTermId};
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_PARENTS};

/// The owned representation of a term, stored in the ontology arena
#[derive(Debug, Clone)]
pub(crate) struct HpoTermInternal {
    id: HpoTermId,
    name: String,
    parents: HpoParents,
    all_parents: HpoParents,
    ic: f64,
    parents_cached: bool,
}

impl HpoTermInternal {
    pub fn new(name: String, id: HpoTermId) -> HpoTermInternal {
        HpoTermInternal {
            id,
            name,
            parents: HpoGroup::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: HpoGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            ic: 0.0,
            parents_cached: false,
        }
    }

    pub fn id(&self) -> &HpoTermId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &HpoParents {
        &self.parents
    }

    pub fn all_parents(&self) -> &HpoParents {
        &self.all_parents
    }

    pub fn set_all_parents(&mut self, all_parents: HpoParents) {
        self.all_parents = all_parents;
        self.parents_cached = true;
    }

    pub fn parents_cached(&self) -> bool {
        self.parents_cached
    }

    pub fn reset_cache(&mut self) {
        self.parents_cached = false;
    }

    pub fn add_parent<I: Into<HpoTermId>>(&mut self, parent_id: I) {
        self.parents.insert(parent_id);
    }

    pub fn information_content(&self) -> f64 {
        self.ic
    }

    pub fn information_content_mut(&mut self) -> &mut f64 {
        &mut self.ic
    }
}

impl PartialEq for HpoTermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HpoTermInternal {}
