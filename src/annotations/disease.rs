use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use smallvec::SmallVec;

use crate::annotations::GeneId;
use crate::term::HpoGroup;
use crate::{HpoError, HpoResult, HpoTermId, DEFAULT_ANNOTATION_FREQUENCY, DEFAULT_NUM_GENES};

/// The database that a [`DiseaseId`] belongs to
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum DiseaseDatabase {
    /// Online Mendelian Inheritance in Man
    Omim,
    /// Orphanet
    Orpha,
    /// DECIPHER
    Decipher,
}

impl Display for DiseaseDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self {
            DiseaseDatabase::Omim => "OMIM",
            DiseaseDatabase::Orpha => "ORPHA",
            DiseaseDatabase::Decipher => "DECIPHER",
        };
        write!(f, "{prefix}")
    }
}

impl TryFrom<&str> for DiseaseDatabase {
    type Error = HpoError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "OMIM" => Ok(DiseaseDatabase::Omim),
            "ORPHA" => Ok(DiseaseDatabase::Orpha),
            "DECIPHER" => Ok(DiseaseDatabase::Decipher),
            _ => Err(HpoError::InvalidInput(format!(
                "unknown disease database {value}"
            ))),
        }
    }
}

/// A unique identifier for a [`Disease`]
///
/// The id consists of the source database and the numerical
/// identifier within that database, e.g. `OMIM:154700`.
///
/// Ids are ordered by database first, then by number. This order is
/// used to break ties when ranking diagnoses.
///
/// # Examples
///
/// ```
/// use hpo_lr::DiseaseId;
///
/// let marfan = DiseaseId::try_from("OMIM:154700").unwrap();
/// assert_eq!(marfan, DiseaseId::omim(154700));
/// assert_eq!(marfan.to_string(), "OMIM:154700");
///
/// assert!(DiseaseId::omim(1) < DiseaseId::omim(2));
/// assert!(DiseaseId::try_from("MONDO:0007947").is_err());
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct DiseaseId {
    database: DiseaseDatabase,
    inner: u32,
}

impl DiseaseId {
    /// Constructs a new `DiseaseId`
    pub fn new(database: DiseaseDatabase, id: u32) -> Self {
        Self {
            database,
            inner: id,
        }
    }

    /// Constructs a new OMIM `DiseaseId`
    pub fn omim(id: u32) -> Self {
        Self::new(DiseaseDatabase::Omim, id)
    }

    /// Constructs a new Orphanet `DiseaseId`
    pub fn orpha(id: u32) -> Self {
        Self::new(DiseaseDatabase::Orpha, id)
    }

    /// Constructs a new DECIPHER `DiseaseId`
    pub fn decipher(id: u32) -> Self {
        Self::new(DiseaseDatabase::Decipher, id)
    }

    /// Returns the source database
    pub fn database(&self) -> DiseaseDatabase {
        self.database
    }

    /// Returns the numerical id within the database
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for DiseaseId {
    type Error = HpoError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let Some((database, number)) = value.trim().split_once(':') else {
            return Err(HpoError::InvalidInput(format!("invalid disease id {value}")));
        };
        Ok(DiseaseId {
            database: DiseaseDatabase::try_from(database)?,
            inner: number.parse::<u32>()?,
        })
    }
}

impl Display for DiseaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.database, self.inner)
    }
}

/// A single disease
///
/// A disease has a unique [`DiseaseId`] and a name. It is annotated
/// with a set of HPO terms that are present in patients with the disease,
/// each with the frequency of its occurrence, and with terms that are
/// explicitly excluded (`NOT` annotations). Most diseases are associated
/// with one or two genes.
#[derive(Debug, Clone)]
pub struct Disease {
    id: DiseaseId,
    name: String,
    hpos: HpoGroup,
    frequencies: HashMap<HpoTermId, f64>,
    excluded: HpoGroup,
    genes: SmallVec<[GeneId; DEFAULT_NUM_GENES]>,
}

impl Disease {
    /// Initializes a new disease without any annotations
    pub fn new(id: DiseaseId, name: &str) -> Disease {
        Disease {
            id,
            name: name.to_string(),
            hpos: HpoGroup::default(),
            frequencies: HashMap::new(),
            excluded: HpoGroup::default(),
            genes: SmallVec::new(),
        }
    }

    /// The unique [`DiseaseId`] of the disease
    pub fn id(&self) -> &DiseaseId {
        &self.id
    }

    /// The disease name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annotates the disease with a present HPO term
    ///
    /// `frequency` is the fraction of patients that present the term.
    /// If it is `None`, the term is assumed to be always present. If the
    /// term is annotated multiple times, the highest frequency is kept.
    ///
    /// Returns whether the term was newly inserted.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidInput`] if the frequency is not within `(0, 1]`
    ///
    /// # Examples
    ///
    /// ```
    /// use hpo_lr::{Disease, DiseaseId, HpoTermId};
    ///
    /// let mut disease = Disease::new(DiseaseId::omim(154700), "Marfan syndrome");
    /// assert!(disease.add_term(1166u32, Some(0.8)).unwrap());
    /// assert!(!disease.add_term(1166u32, Some(0.5)).unwrap());
    /// assert_eq!(disease.frequency(HpoTermId::from(1166u32)), Some(0.8));
    ///
    /// assert!(disease.add_term(2u32, Some(0.0)).is_err());
    /// ```
    pub fn add_term<I: Into<HpoTermId>>(
        &mut self,
        term_id: I,
        frequency: Option<f64>,
    ) -> HpoResult<bool> {
        let term_id = term_id.into();
        let frequency = frequency.unwrap_or(DEFAULT_ANNOTATION_FREQUENCY);
        if !(frequency > 0.0 && frequency <= 1.0) {
            return Err(HpoError::InvalidInput(format!(
                "frequency {frequency} of {term_id} in {} is not within (0, 1]",
                self.id
            )));
        }
        let current = self.frequencies.entry(term_id).or_insert(frequency);
        if frequency > *current {
            *current = frequency;
        }
        Ok(self.hpos.insert(term_id))
    }

    /// Annotates the disease with an explicitly excluded HPO term
    ///
    /// Returns whether the term was newly inserted.
    pub fn add_excluded_term<I: Into<HpoTermId>>(&mut self, term_id: I) -> bool {
        self.excluded.insert(term_id)
    }

    /// Associates a gene with the disease
    ///
    /// Returns whether the gene was newly associated.
    pub fn add_gene(&mut self, gene: GeneId) -> bool {
        if self.genes.contains(&gene) {
            false
        } else {
            self.genes.push(gene);
            true
        }
    }

    /// The set of HPO terms that are present in the disease
    pub fn annotated_terms(&self) -> &HpoGroup {
        &self.hpos
    }

    /// The set of HPO terms that are explicitly excluded in the disease
    pub fn excluded_terms(&self) -> &HpoGroup {
        &self.excluded
    }

    /// Returns the frequency of a present HPO term
    ///
    /// Returns `None` if the term is not annotated.
    pub fn frequency(&self, term_id: HpoTermId) -> Option<f64> {
        self.frequencies.get(&term_id).copied()
    }

    /// The genes associated with the disease
    pub fn genes(&self) -> &[GeneId] {
        &self.genes
    }

    /// Returns `true` if the disease has any present or excluded term
    pub fn is_annotated(&self) -> bool {
        !(self.hpos.is_empty() && self.excluded.is_empty())
    }
}

impl PartialEq for Disease {
    fn eq(&self, other: &Disease) -> bool {
        self.id == other.id
    }
}
impl Eq for Disease {}

impl Hash for Disease {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
