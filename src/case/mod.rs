//! A patient case: observed terms, candidate diseases and their ranking
//!
//! An [`HpoCase`] is created through the [`CaseBuilder`]. The builder first
//! collects the observed terms, then the candidate diseases and optionally
//! explicit pretest probabilities:
//!
//! ```
//! use hpo_lr::case::CaseBuilder;
//! use hpo_lr::DiseaseId;
//!
//! let case = CaseBuilder::new()
//!     .present(1166u32)
//!     .present(1083u32)
//!     .excluded(1631u32)
//!     .candidates([DiseaseId::omim(154700), DiseaseId::omim(609192)])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(case.observed_terms().len(), 3);
//! assert_eq!(case.pretest().get(&DiseaseId::omim(154700)).unwrap(), 0.5);
//! assert!(case.results().is_empty());
//! ```
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::annotations::DiseaseId;
use crate::{f64_from_usize, HpoError, HpoResult, HpoTermId, PRETEST_SUM_TOLERANCE};

mod test_result;
pub use test_result::{ScoringNote, TestResult};

/// Whether an observed term is present in the patient or explicitly excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// The patient presents the phenotype
    Present,
    /// The phenotype was explicitly ruled out in the patient
    Excluded,
}

/// A single clinical observation of the patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservedTerm {
    id: HpoTermId,
    polarity: Polarity,
}

impl ObservedTerm {
    /// Constructs a new observation
    pub fn new<I: Into<HpoTermId>>(id: I, polarity: Polarity) -> Self {
        Self {
            id: id.into(),
            polarity,
        }
    }

    /// A phenotype that is present in the patient
    pub fn present<I: Into<HpoTermId>>(id: I) -> Self {
        Self::new(id, Polarity::Present)
    }

    /// A phenotype that was ruled out in the patient
    pub fn excluded<I: Into<HpoTermId>>(id: I) -> Self {
        Self::new(id, Polarity::Excluded)
    }

    /// The observed term
    pub fn id(&self) -> HpoTermId {
        self.id
    }

    /// Present or excluded
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Returns `true` if the phenotype was ruled out
    pub fn is_excluded(&self) -> bool {
        self.polarity == Polarity::Excluded
    }
}

/// The pretest probability of every candidate disease
///
/// All values are within `(0, 1]` and sum up to `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PretestProbabilities {
    values: HashMap<DiseaseId, f64>,
}

impl PretestProbabilities {
    /// Constructs pretest probabilities from explicit values
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidPretestProbability`] if a value is not within `(0, 1]`,
    /// a disease occurs twice or the sum differs from `1.0` by more than `1e-6`
    ///
    /// # Examples
    ///
    /// ```
    /// use hpo_lr::{DiseaseId, PretestProbabilities};
    ///
    /// let pretest = PretestProbabilities::new([
    ///     (DiseaseId::omim(1), 0.9),
    ///     (DiseaseId::omim(2), 0.1),
    /// ]).unwrap();
    /// assert_eq!(pretest.get(&DiseaseId::omim(2)).unwrap(), 0.1);
    ///
    /// assert!(PretestProbabilities::new([(DiseaseId::omim(1), 0.9)]).is_err());
    /// ```
    pub fn new<I: IntoIterator<Item = (DiseaseId, f64)>>(values: I) -> HpoResult<Self> {
        let mut map = HashMap::new();
        let mut sum = 0.0;
        for (disease, p) in values {
            if !(p > 0.0 && p <= 1.0) {
                return Err(HpoError::InvalidPretestProbability(format!(
                    "{p} for {disease} is not within (0, 1]"
                )));
            }
            if map.insert(disease, p).is_some() {
                return Err(HpoError::InvalidPretestProbability(format!(
                    "{disease} is present multiple times"
                )));
            }
            sum += p;
        }
        if map.is_empty() {
            return Err(HpoError::InvalidPretestProbability(
                "no candidate diseases".to_string(),
            ));
        }
        if (sum - 1.0).abs() > PRETEST_SUM_TOLERANCE {
            return Err(HpoError::InvalidPretestProbability(format!(
                "probabilities sum up to {sum}"
            )));
        }
        Ok(Self { values: map })
    }

    /// Constructs the same pretest probability for every disease
    ///
    /// Duplicate diseases are counted once.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidPretestProbability`] if no disease is provided
    pub fn uniform<'a, I: IntoIterator<Item = &'a DiseaseId>>(diseases: I) -> HpoResult<Self> {
        let mut values: HashMap<DiseaseId, f64> =
            diseases.into_iter().map(|id| (*id, 0.0)).collect();
        if values.is_empty() {
            return Err(HpoError::InvalidPretestProbability(
                "no candidate diseases".to_string(),
            ));
        }
        let p = 1.0 / f64_from_usize(values.len());
        for value in values.values_mut() {
            *value = p;
        }
        Ok(Self { values })
    }

    /// Returns the pretest probability of the disease
    ///
    /// # Errors
    ///
    /// [`HpoError::UnknownDisease`] if the disease is not a candidate
    pub fn get(&self, disease: &DiseaseId) -> HpoResult<f64> {
        self.values
            .get(disease)
            .copied()
            .ok_or(HpoError::UnknownDisease(*disease))
    }

    /// Returns `true` if the disease has a pretest probability
    pub fn contains(&self, disease: &DiseaseId) -> bool {
        self.values.contains_key(disease)
    }

    /// Number of diseases
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no diseases
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A patient with observed terms and the differential diagnosis of the candidate diseases
///
/// The observations and candidates are fixed once the case is built.
/// Ranking the case replaces the list of results.
#[derive(Debug, Clone)]
pub struct HpoCase {
    observed: Vec<ObservedTerm>,
    candidates: Vec<DiseaseId>,
    pretest: PretestProbabilities,
    results: Vec<TestResult>,
}

impl HpoCase {
    /// The observed terms, in the order they were added
    pub fn observed_terms(&self) -> &[ObservedTerm] {
        &self.observed
    }

    /// The candidate diseases, in the order they were added
    pub fn candidates(&self) -> &[DiseaseId] {
        &self.candidates
    }

    /// The pretest probabilities of the candidates
    pub fn pretest(&self) -> &PretestProbabilities {
        &self.pretest
    }

    /// The ranked results, most likely diagnosis first
    ///
    /// Empty before the case is ranked, or if ranking failed
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Returns the result of the disease
    pub fn result(&self, disease: &DiseaseId) -> Option<&TestResult> {
        self.results.iter().find(|res| res.disease_id() == disease)
    }

    pub(crate) fn clear_results(&mut self) {
        self.results.clear();
    }

    pub(crate) fn set_results(&mut self, results: Vec<TestResult>) {
        self.results = results;
    }
}

/// Builder state: collecting observed terms
pub struct Observations;
/// Builder state: candidate diseases are set
pub struct Candidates;

/// Builds an [`HpoCase`]
///
/// Terms can only be added before the candidates are set,
/// and only a builder with candidates can build a case.
pub struct CaseBuilder<T> {
    observed: Vec<ObservedTerm>,
    candidates: Vec<DiseaseId>,
    pretest: Option<PretestProbabilities>,
    state: PhantomData<T>,
}

impl Default for CaseBuilder<Observations> {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseBuilder<Observations> {
    /// Constructs a new builder without any observations
    pub fn new() -> Self {
        CaseBuilder {
            observed: Vec::new(),
            candidates: Vec::new(),
            pretest: None,
            state: PhantomData,
        }
    }

    /// Adds an observation
    #[must_use]
    pub fn observe(mut self, term: ObservedTerm) -> Self {
        self.observed.push(term);
        self
    }

    /// Adds a phenotype that is present in the patient
    #[must_use]
    pub fn present<I: Into<HpoTermId>>(self, id: I) -> Self {
        self.observe(ObservedTerm::present(id))
    }

    /// Adds a phenotype that was ruled out in the patient
    #[must_use]
    pub fn excluded<I: Into<HpoTermId>>(self, id: I) -> Self {
        self.observe(ObservedTerm::excluded(id))
    }

    /// Sets the candidate diseases
    ///
    /// Duplicates are removed, keeping the first occurrence.
    pub fn candidates<I: IntoIterator<Item = DiseaseId>>(
        self,
        diseases: I,
    ) -> CaseBuilder<Candidates> {
        let mut candidates: Vec<DiseaseId> = Vec::new();
        for disease in diseases {
            if !candidates.contains(&disease) {
                candidates.push(disease);
            }
        }
        CaseBuilder {
            observed: self.observed,
            candidates,
            pretest: self.pretest,
            state: PhantomData,
        }
    }
}

impl CaseBuilder<Candidates> {
    /// Uses explicit pretest probabilities instead of a uniform distribution
    #[must_use]
    pub fn pretest(mut self, pretest: PretestProbabilities) -> Self {
        self.pretest = Some(pretest);
        self
    }

    /// Builds the case
    ///
    /// # Errors
    ///
    /// - [`HpoError::InvalidPretestProbability`] if there are no candidates
    /// - [`HpoError::UnknownDisease`] if a candidate has no pretest probability
    /// - [`HpoError::InvalidPretestProbability`] if the pretest probabilities
    ///   contain diseases that are not candidates
    pub fn build(self) -> HpoResult<HpoCase> {
        let pretest = match self.pretest {
            Some(pretest) => {
                for candidate in &self.candidates {
                    if !pretest.contains(candidate) {
                        return Err(HpoError::UnknownDisease(*candidate));
                    }
                }
                if pretest.len() != self.candidates.len() {
                    return Err(HpoError::InvalidPretestProbability(
                        "pretest probabilities contain non-candidate diseases".to_string(),
                    ));
                }
                pretest
            }
            None => PretestProbabilities::uniform(&self.candidates)?,
        };
        Ok(HpoCase {
            observed: self.observed,
            candidates: self.candidates,
            pretest,
            results: Vec::new(),
        })
    }
}
