use std::collections::HashMap;

use crate::annotations::GeneId;
use crate::genotype::PathogenicityBin;
use crate::{HpoError, HpoResult};

/// Expected number of variants per gene and [`PathogenicityBin`] in the
/// healthy population
///
/// Values are stored as provided. They are validated when they are read,
/// so a single broken entry only affects its own gene.
///
/// # Examples
///
/// ```
/// use hpo_lr::GeneId;
/// use hpo_lr::genotype::{BackgroundFrequencies, PathogenicityBin};
///
/// let mut background = BackgroundFrequencies::default();
/// background.insert(GeneId::from(2200u32), PathogenicityBin::Pathogenic, 0.002);
/// background.insert(GeneId::from(2200u32), PathogenicityBin::Uncertain, 0.01);
///
/// let fbn1 = GeneId::from(2200u32);
/// assert_eq!(
///     background.background_frequency(&fbn1, PathogenicityBin::Pathogenic).unwrap(),
///     Some(0.002)
/// );
/// let rate = background.background_rate(&fbn1, PathogenicityBin::Uncertain).unwrap();
/// assert!((rate.unwrap() - 0.012).abs() < 1e-12);
///
/// assert_eq!(
///     background.background_rate(&GeneId::from(1u32), PathogenicityBin::Pathogenic).unwrap(),
///     None
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct BackgroundFrequencies {
    genes: HashMap<GeneId, [Option<f64>; 3]>,
    symbols: HashMap<GeneId, String>,
}

impl BackgroundFrequencies {
    /// Constructs a new, empty set of background frequencies
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background frequency of a gene in one bin
    ///
    /// An existing value is replaced.
    pub fn insert(&mut self, gene: GeneId, bin: PathogenicityBin, frequency: f64) {
        self.genes.entry(gene).or_default()[bin.index()] = Some(frequency);
    }

    /// Records the symbol of a gene
    pub fn insert_symbol(&mut self, gene: GeneId, symbol: &str) {
        self.symbols.insert(gene, symbol.to_string());
    }

    /// Returns the symbol of the gene, if it was provided with the frequencies
    pub fn gene_symbol(&self, gene: &GeneId) -> Option<&str> {
        self.symbols.get(gene).map(String::as_str)
    }

    /// Number of genes with any background frequency
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if no gene has a background frequency
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the background frequency of a gene in one bin
    ///
    /// Returns `None` if there is no value for the gene and bin.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidBackgroundRate`] if the stored value is negative,
    /// above `1.0` or not a finite number
    pub fn background_frequency(
        &self,
        gene: &GeneId,
        bin: PathogenicityBin,
    ) -> HpoResult<Option<f64>> {
        let Some(frequency) = self.genes.get(gene).and_then(|bins| bins[bin.index()]) else {
            return Ok(None);
        };
        if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
            return Err(HpoError::InvalidBackgroundRate {
                gene: *gene,
                rate: frequency,
            });
        }
        Ok(Some(frequency))
    }

    /// Returns the summed background frequency of all bins at or above `min_bin`
    ///
    /// Returns `None` if the gene has no value in any of these bins.
    ///
    /// # Errors
    ///
    /// [`HpoError::InvalidBackgroundRate`] if any of the values is invalid
    pub fn background_rate(
        &self,
        gene: &GeneId,
        min_bin: PathogenicityBin,
    ) -> HpoResult<Option<f64>> {
        let mut rate: Option<f64> = None;
        for bin in PathogenicityBin::all() {
            if bin < min_bin {
                continue;
            }
            if let Some(frequency) = self.background_frequency(gene, bin)? {
                rate = Some(rate.unwrap_or_default() + frequency);
            }
        }
        Ok(rate)
    }
}
