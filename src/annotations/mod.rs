//! Diseases, genes and the disease annotation store
//!
//! [`DiseaseAnnotations`] holds every [`Disease`] that can be ranked,
//! together with its annotated and excluded HPO terms and its associated
//! genes. It is built once, e.g. from a `phenotype.hpoa` file, and then
//! only read during ranking.
use std::collections::btree_map::Values;
use std::collections::{BTreeMap, HashMap};

use crate::term::HpoGroup;
use crate::{HpoError, HpoResult};

mod disease;
mod gene;

pub use disease::{Disease, DiseaseDatabase, DiseaseId};
pub use gene::GeneId;

/// The store of all annotated diseases
///
/// Diseases are kept ordered by their [`DiseaseId`].
///
/// # Examples
///
/// ```
/// use hpo_lr::{Disease, DiseaseAnnotations, DiseaseId, GeneId};
///
/// let mut diseases = DiseaseAnnotations::default();
/// let mut marfan = Disease::new(DiseaseId::omim(154700), "Marfan syndrome");
/// marfan.add_term(1166u32, Some(0.8)).unwrap();
/// marfan.add_gene(GeneId::from(2200u32));
/// diseases.insert(marfan);
///
/// let id = DiseaseId::omim(154700);
/// assert_eq!(diseases.annotated_terms(&id).unwrap().len(), 1);
/// assert_eq!(diseases.associated_genes(&id).unwrap(), &[GeneId::from(2200u32)]);
/// assert!(diseases.annotated_terms(&DiseaseId::omim(1)).is_err());
///
/// diseases.add_gene_symbol(GeneId::from(2200u32), "FBN1");
/// assert_eq!(diseases.gene_symbol(&GeneId::from(2200u32)), Some("FBN1"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct DiseaseAnnotations {
    diseases: BTreeMap<DiseaseId, Disease>,
    gene_symbols: HashMap<GeneId, String>,
}

impl DiseaseAnnotations {
    /// Constructs a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of diseases
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Returns `true` if the store does not contain any disease
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    /// Inserts a disease
    ///
    /// If a disease with the same id was present, it is replaced
    /// and returned.
    pub fn insert(&mut self, disease: Disease) -> Option<Disease> {
        self.diseases.insert(*disease.id(), disease)
    }

    /// Returns the disease with the id, inserting a new, empty one if needed
    pub fn get_or_insert(&mut self, id: DiseaseId, name: &str) -> &mut Disease {
        self.diseases
            .entry(id)
            .or_insert_with(|| Disease::new(id, name))
    }

    /// Returns the [`Disease`] with the id
    pub fn get(&self, id: &DiseaseId) -> Option<&Disease> {
        self.diseases.get(id)
    }

    /// Returns a mutable reference to the [`Disease`] with the id
    pub fn get_mut(&mut self, id: &DiseaseId) -> Option<&mut Disease> {
        self.diseases.get_mut(id)
    }

    /// Returns `true` if the disease is part of the store
    pub fn contains(&self, id: &DiseaseId) -> bool {
        self.diseases.contains_key(id)
    }

    /// Returns the present terms of the disease
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownDisease`] if the disease is not part of the store
    pub fn annotated_terms(&self, id: &DiseaseId) -> HpoResult<&HpoGroup> {
        self.try_get(id).map(Disease::annotated_terms)
    }

    /// Returns the excluded terms of the disease
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownDisease`] if the disease is not part of the store
    pub fn excluded_terms(&self, id: &DiseaseId) -> HpoResult<&HpoGroup> {
        self.try_get(id).map(Disease::excluded_terms)
    }

    /// Returns the genes associated with the disease
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownDisease`] if the disease is not part of the store
    pub fn associated_genes(&self, id: &DiseaseId) -> HpoResult<&[GeneId]> {
        self.try_get(id).map(Disease::genes)
    }

    /// Records the symbol of a gene, replacing an earlier one
    pub fn add_gene_symbol(&mut self, gene: GeneId, symbol: &str) {
        self.gene_symbols.insert(gene, symbol.to_string());
    }

    /// Returns the symbol of the gene, e.g. `FBN1`
    pub fn gene_symbol(&self, gene: &GeneId) -> Option<&str> {
        self.gene_symbols.get(gene).map(String::as_str)
    }

    /// Returns the ids of all diseases, in ascending order
    pub fn ids(&self) -> impl Iterator<Item = &DiseaseId> {
        self.diseases.keys()
    }

    /// Returns an Iterator of all diseases, ordered by id
    pub fn iter(&self) -> Values<'_, DiseaseId, Disease> {
        self.diseases.values()
    }

    fn try_get(&self, id: &DiseaseId) -> HpoResult<&Disease> {
        self.diseases.get(id).ok_or(HpoError::UnknownDisease(*id))
    }
}

impl<'a> IntoIterator for &'a DiseaseAnnotations {
    type Item = &'a Disease;
    type IntoIter = Values<'a, DiseaseId, Disease>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Disease> for DiseaseAnnotations {
    fn from_iter<T: IntoIterator<Item = Disease>>(iter: T) -> Self {
        let mut store = DiseaseAnnotations::new();
        for disease in iter {
            store.insert(disease);
        }
        store
    }
}
