//! Variant data of a patient and background variant frequencies per gene
//!
//! The variants of a patient are grouped by gene into [`GeneVariantBundle`]s.
//! Every variant carries a pathogenicity score, which places it into a
//! [`PathogenicityBin`]. [`BackgroundFrequencies`] hold the expected number
//! of variants per gene and bin in the healthy population.
//!
//! Both are combined into [`GenotypeEvidence`], which is built once per case
//! and then only read during ranking.
use std::collections::HashMap;
use std::fmt::Display;

use crate::annotations::GeneId;
use crate::{HpoError, HpoResult};

mod background;
pub use background::BackgroundFrequencies;

/// Lowest pathogenicity score of the [`PathogenicityBin::Uncertain`] bin
pub const UNCERTAIN_BIN_THRESHOLD: f64 = 0.5;
/// Lowest pathogenicity score of the [`PathogenicityBin::Pathogenic`] bin
pub const PATHOGENIC_BIN_THRESHOLD: f64 = 0.8;

/// The pathogenicity class of a variant, derived from its score
///
/// Bins are ordered from benign to pathogenic.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PathogenicityBin {
    /// Score below [`UNCERTAIN_BIN_THRESHOLD`]
    Benign,
    /// Score between [`UNCERTAIN_BIN_THRESHOLD`] and [`PATHOGENIC_BIN_THRESHOLD`]
    Uncertain,
    /// Score of at least [`PATHOGENIC_BIN_THRESHOLD`]
    Pathogenic,
}

impl PathogenicityBin {
    /// Returns the bin of a pathogenicity score
    ///
    /// ```
    /// use hpo_lr::genotype::PathogenicityBin;
    ///
    /// assert_eq!(PathogenicityBin::from_score(0.1), PathogenicityBin::Benign);
    /// assert_eq!(PathogenicityBin::from_score(0.5), PathogenicityBin::Uncertain);
    /// assert_eq!(PathogenicityBin::from_score(0.8), PathogenicityBin::Pathogenic);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score >= PATHOGENIC_BIN_THRESHOLD {
            PathogenicityBin::Pathogenic
        } else if score >= UNCERTAIN_BIN_THRESHOLD {
            PathogenicityBin::Uncertain
        } else {
            PathogenicityBin::Benign
        }
    }

    /// All bins, from benign to pathogenic
    pub fn all() -> [PathogenicityBin; 3] {
        [
            PathogenicityBin::Benign,
            PathogenicityBin::Uncertain,
            PathogenicityBin::Pathogenic,
        ]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PathogenicityBin::Benign => 0,
            PathogenicityBin::Uncertain => 1,
            PathogenicityBin::Pathogenic => 2,
        }
    }
}

impl TryFrom<&str> for PathogenicityBin {
    type Error = HpoError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "B" | "Benign" => Ok(PathogenicityBin::Benign),
            "U" | "Uncertain" => Ok(PathogenicityBin::Uncertain),
            "P" | "Pathogenic" => Ok(PathogenicityBin::Pathogenic),
            _ => Err(HpoError::InvalidInput(format!(
                "unknown pathogenicity bin {value}"
            ))),
        }
    }
}

impl Display for PathogenicityBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            PathogenicityBin::Benign => "B",
            PathogenicityBin::Uncertain => "U",
            PathogenicityBin::Pathogenic => "P",
        };
        write!(f, "{code}")
    }
}

/// A single variant of the patient
///
/// # Examples
///
/// ```
/// use hpo_lr::GeneId;
/// use hpo_lr::genotype::{PathogenicityBin, Variant};
///
/// let variant = Variant::new(GeneId::from(2200u32), 0.95, 0.0001, 1)
///     .unwrap()
///     .with_label("chr15:g.48487338C>T");
///
/// assert_eq!(variant.bin(), PathogenicityBin::Pathogenic);
/// assert_eq!(variant.label(), Some("chr15:g.48487338C>T"));
///
/// assert!(Variant::new(GeneId::from(2200u32), 1.5, 0.0001, 1).is_err());
/// assert!(Variant::new(GeneId::from(2200u32), 0.9, 0.0001, 3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    gene: GeneId,
    pathogenicity: f64,
    frequency: f64,
    allele_count: u8,
    label: Option<String>,
}

impl Variant {
    /// Constructs a new variant
    ///
    /// `allele_count` is `1` for heterozygous and `2` for homozygous variants.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidInput`] if pathogenicity or frequency are not
    /// within `[0, 1]` or the allele count is not `1` or `2`
    pub fn new(
        gene: GeneId,
        pathogenicity: f64,
        frequency: f64,
        allele_count: u8,
    ) -> HpoResult<Self> {
        if !(0.0..=1.0).contains(&pathogenicity) {
            return Err(HpoError::InvalidInput(format!(
                "pathogenicity {pathogenicity} is not within [0, 1]"
            )));
        }
        if !(0.0..=1.0).contains(&frequency) {
            return Err(HpoError::InvalidInput(format!(
                "allele frequency {frequency} is not within [0, 1]"
            )));
        }
        if !(1..=2).contains(&allele_count) {
            return Err(HpoError::InvalidInput(format!(
                "allele count must be 1 or 2, not {allele_count}"
            )));
        }
        Ok(Self {
            gene,
            pathogenicity,
            frequency,
            allele_count,
            label: None,
        })
    }

    /// Attaches a human readable label, e.g. the HGVS notation
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// The gene of the variant
    pub fn gene(&self) -> GeneId {
        self.gene
    }

    /// The pathogenicity score, between `0.0` (benign) and `1.0` (pathogenic)
    pub fn pathogenicity(&self) -> f64 {
        self.pathogenicity
    }

    /// The population allele frequency
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Number of affected alleles
    pub fn allele_count(&self) -> u8 {
        self.allele_count
    }

    /// The label of the variant, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The [`PathogenicityBin`] of the variant
    pub fn bin(&self) -> PathogenicityBin {
        PathogenicityBin::from_score(self.pathogenicity)
    }
}

/// All variants of the patient in one gene
///
/// The variants keep the order in which they were added.
#[derive(Debug, Clone)]
pub struct GeneVariantBundle {
    gene: GeneId,
    symbol: String,
    variants: Vec<Variant>,
}

impl GeneVariantBundle {
    /// Constructs a new bundle without variants
    pub fn new(gene: GeneId, symbol: &str) -> Self {
        Self {
            gene,
            symbol: symbol.to_string(),
            variants: Vec::new(),
        }
    }

    /// Adds a variant to the bundle
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidInput`] if the variant belongs to a different gene
    pub fn add_variant(&mut self, variant: Variant) -> HpoResult<()> {
        if variant.gene != self.gene {
            return Err(HpoError::InvalidInput(format!(
                "variant of {} can't be added to {}",
                variant.gene, self.gene
            )));
        }
        self.variants.push(variant);
        Ok(())
    }

    /// The gene of the bundle
    pub fn gene(&self) -> GeneId {
        self.gene
    }

    /// The gene symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All variants of the bundle
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Returns an iterator of the variants with a pathogenicity of at least
    /// `min_pathogenicity` and an allele frequency of at most `max_frequency`
    ///
    /// Common variants are not considered causal, regardless of their pathogenicity.
    pub fn qualifying_variants(
        &self,
        min_pathogenicity: f64,
        max_frequency: f64,
    ) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(move |variant| {
            variant.pathogenicity >= min_pathogenicity && variant.frequency <= max_frequency
        })
    }

    /// Returns the number of alleles that carry a qualifying variant
    pub fn qualifying_allele_count(&self, min_pathogenicity: f64, max_frequency: f64) -> u64 {
        self.qualifying_variants(min_pathogenicity, max_frequency)
            .map(|variant| u64::from(variant.allele_count))
            .sum()
    }
}

/// The genotype data of a case
///
/// Holds the [`GeneVariantBundle`] of every gene that has variants and the
/// [`BackgroundFrequencies`] of all genes.
#[derive(Debug, Clone, Default)]
pub struct GenotypeEvidence {
    bundles: HashMap<GeneId, GeneVariantBundle>,
    background: BackgroundFrequencies,
}

impl GenotypeEvidence {
    /// Constructs new evidence without any variants
    pub fn new(background: BackgroundFrequencies) -> Self {
        Self {
            bundles: HashMap::new(),
            background,
        }
    }

    /// Adds the variants of a gene
    ///
    /// If variants of the gene were added already, the new ones are appended.
    pub fn add_bundle(&mut self, bundle: GeneVariantBundle) {
        match self.bundles.get_mut(&bundle.gene) {
            Some(existing) => existing.variants.extend(bundle.variants),
            None => {
                self.bundles.insert(bundle.gene, bundle);
            }
        }
    }

    /// Adds a single variant, creating the bundle of its gene if needed
    pub fn add_variant(&mut self, symbol: &str, variant: Variant) {
        self.bundles
            .entry(variant.gene)
            .or_insert_with(|| GeneVariantBundle::new(variant.gene, symbol))
            .variants
            .push(variant);
    }

    /// Returns the variants of the gene
    ///
    /// Returns `None` if the patient does not have any variant in the gene
    pub fn variants_for_gene(&self, gene: &GeneId) -> Option<&GeneVariantBundle> {
        self.bundles.get(gene)
    }

    /// The background frequencies of all genes
    pub fn background(&self) -> &BackgroundFrequencies {
        &self.background
    }

    /// Number of genes with variants
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Returns `true` if no gene has any variant
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn variant(gene: u32, pathogenicity: f64, alleles: u8) -> Variant {
        Variant::new(GeneId::from(gene), pathogenicity, 0.0001, alleles).expect("valid variant")
    }

    fn common_variant(gene: u32, pathogenicity: f64, frequency: f64) -> Variant {
        Variant::new(GeneId::from(gene), pathogenicity, frequency, 1).expect("valid variant")
    }

    #[test]
    fn bin_order() {
        assert!(PathogenicityBin::Benign < PathogenicityBin::Uncertain);
        assert!(PathogenicityBin::Uncertain < PathogenicityBin::Pathogenic);
        assert_eq!(
            PathogenicityBin::try_from("P").expect("valid bin"),
            PathogenicityBin::Pathogenic
        );
        assert!(PathogenicityBin::try_from("X").is_err());
    }

    #[test]
    fn qualifying_alleles() {
        let mut bundle = GeneVariantBundle::new(GeneId::from(1u32), "GENE1");
        bundle.add_variant(variant(1, 0.9, 2)).expect("same gene");
        bundle.add_variant(variant(1, 0.8, 1)).expect("same gene");
        bundle.add_variant(variant(1, 0.3, 1)).expect("same gene");

        assert_eq!(bundle.qualifying_allele_count(0.8, 0.01), 3);
        assert_eq!(bundle.qualifying_allele_count(0.85, 0.01), 2);
        assert_eq!(bundle.qualifying_allele_count(0.0, 0.01), 4);
        assert_eq!(bundle.qualifying_variants(0.8, 0.01).count(), 2);
    }

    #[test]
    fn common_variants_do_not_qualify() {
        let mut bundle = GeneVariantBundle::new(GeneId::from(1u32), "GENE1");
        bundle
            .add_variant(common_variant(1, 0.99, 0.2))
            .expect("same gene");
        bundle
            .add_variant(common_variant(1, 0.9, 0.01))
            .expect("same gene");

        assert_eq!(bundle.qualifying_allele_count(0.8, 0.01), 1);
        assert_eq!(bundle.qualifying_allele_count(0.8, 0.001), 0);
        assert_eq!(bundle.qualifying_allele_count(0.8, 1.0), 2);
        let qualifying: Vec<f64> = bundle
            .qualifying_variants(0.8, 0.01)
            .map(Variant::frequency)
            .collect();
        assert_eq!(qualifying, vec![0.01]);
    }

    #[test]
    fn variant_of_other_gene() {
        let mut bundle = GeneVariantBundle::new(GeneId::from(1u32), "GENE1");
        assert!(bundle.add_variant(variant(2, 0.9, 1)).is_err());
        assert!(bundle.variants().is_empty());
    }

    #[test]
    fn evidence_merges_bundles() {
        let mut evidence = GenotypeEvidence::default();
        let mut bundle = GeneVariantBundle::new(GeneId::from(1u32), "GENE1");
        bundle.add_variant(variant(1, 0.9, 1)).expect("same gene");
        evidence.add_bundle(bundle);
        evidence.add_variant("GENE1", variant(1, 0.95, 1));
        evidence.add_variant("GENE2", variant(2, 0.95, 1));

        assert_eq!(evidence.len(), 2);
        let bundle = evidence
            .variants_for_gene(&GeneId::from(1u32))
            .expect("gene has variants");
        assert_eq!(bundle.variants().len(), 2);
        assert!(evidence.variants_for_gene(&GeneId::from(3u32)).is_none());
    }
}
