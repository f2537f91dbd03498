//! Parses the expected background frequencies of variants per gene
//!
//! Every line contains the gene, its symbol, the [`PathogenicityBin`]
//! and the summed frequency of all variants of that bin in a reference
//! population:
//!
//! ```text
//! #gene          symbol  bin  frequency
//! NCBIGene:2200  FBN1    P    0.000312
//! NCBIGene:2200  FBN1    U    0.0051
//! ```
//!
//! Lines with only two columns (`gene` and `frequency`) are pathogenic
//! frequencies. Values are not range checked while parsing, invalid
//! values are reported when a gene is scored. Gene symbols are kept for
//! reporting.
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, error};

use crate::annotations::GeneId;
use crate::genotype::{BackgroundFrequencies, PathogenicityBin};
use crate::parser::{invalid_data, open_file};
use crate::{HpoError, HpoResult};

const SOURCE: &str = "background frequency file";

struct BackgroundLine<'a> {
    gene: GeneId,
    symbol: Option<&'a str>,
    bin: PathogenicityBin,
    frequency: f64,
}

fn parse_line(line: &str) -> HpoResult<Option<BackgroundLine<'_>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
    let (gene, symbol, bin, frequency) = match cols.as_slice() {
        [gene, frequency] => (*gene, None, PathogenicityBin::Pathogenic, *frequency),
        [gene, symbol, bin, frequency, ..] => (
            *gene,
            Some(*symbol),
            PathogenicityBin::try_from(*bin)?,
            *frequency,
        ),
        _ => return Err(HpoError::InvalidInput(line.to_string())),
    };

    Ok(Some(BackgroundLine {
        gene: GeneId::try_from(gene)?,
        symbol: symbol.filter(|symbol| !symbol.is_empty()),
        bin,
        frequency: frequency.parse()?,
    }))
}

/// Reads all background frequencies
///
/// Malformed lines are skipped. A later line for the same gene and bin
/// replaces the earlier value.
///
/// # Errors
///
/// [`HpoError::InvalidInput`] if the data cannot be read
pub fn read<R: BufRead>(reader: R) -> HpoResult<BackgroundFrequencies> {
    let mut background = BackgroundFrequencies::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|_| invalid_data(SOURCE))?;
        match parse_line(&line) {
            Ok(Some(entry)) => {
                background.insert(entry.gene, entry.bin, entry.frequency);
                if let Some(symbol) = entry.symbol {
                    background.insert_symbol(entry.gene, symbol);
                }
            }
            Ok(None) => {}
            Err(err) => error!("Skipping malformed line {} of {}: {}", idx + 1, SOURCE, err),
        }
    }
    debug!("Parsed background frequencies of {} genes", background.len());
    Ok(background)
}

/// Parses a background frequency file
///
/// # Errors
///
/// - [`HpoError::CannotOpenFile`] if the file is not present or cannot be opened
/// - [`HpoError::InvalidInput`] if the file cannot be read
///
/// # Examples
///
/// ```no_run
/// use hpo_lr::genotype::GenotypeEvidence;
/// use hpo_lr::parser::background_frequency;
///
/// let background = background_frequency::parse("data/background-freq.txt").unwrap();
/// let evidence = GenotypeEvidence::new(background);
/// ```
pub fn parse<P: AsRef<Path>>(file: P) -> HpoResult<BackgroundFrequencies> {
    read(open_file(file)?)
}
