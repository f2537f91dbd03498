//! Parses disease annotations from the `phenotype.hpoa` file
//!
//! # Example lines
//!
//! ```text
//! #description: "HPO annotations for rare diseases"
//! database_id   disease_name                qualifier  hpo_id      reference      evidence  onset  frequency   sex  modifier  aspect  biocuration
//! OMIM:619340   Developmental and epileptic            HP:0011097  PMID:31675180  PCS              1/2                   P       HPO:probinson[2021-06-21]
//! OMIM:609153   Pseudohyperkalemia          NOT        HP:0001878  PMID:2766660   PCS                                    P       HPO:lccarmody[2018-10-03]
//! ORPHA:1899    Arthrogryposis                         HP:0002804  ORPHA:1899     TAS              HP:0040281            P       ORPHA:orphadata[2024-02-08]
//! ```
//!
//! Only phenotypic abnormalities (aspect `P`) are used. Annotations with
//! the `NOT` qualifier or a frequency of `0` become excluded terms.
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, error, trace};

use crate::annotations::{DiseaseAnnotations, DiseaseId};
use crate::parser::{invalid_data, open_file};
use crate::{HpoError, HpoResult, HpoTermId};

const SOURCE: &str = "phenotype.hpoa";

/// The frequency categories of the HPO and their representative value
const FREQUENCY_TERMS: [(u32, f64); 6] = [
    // Obligate
    (40280, 1.0),
    // Very frequent
    (40281, 0.895),
    // Frequent
    (40282, 0.545),
    // Occasional
    (40283, 0.17),
    // Very rare
    (40284, 0.025),
    // Excluded
    (40285, 0.0),
];

#[derive(Debug)]
struct Annotation<'a> {
    disease: DiseaseId,
    name: &'a str,
    term: HpoTermId,
    excluded: bool,
    frequency: Option<f64>,
}

/// Parses the value of the `frequency` column
///
/// Supports HPO frequency terms, `n/m` fractions and percentages.
/// Returns `None` for an empty column.
fn parse_frequency(value: &str) -> HpoResult<Option<f64>> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return Ok(None);
    }

    if value.starts_with("HP:") {
        let term = HpoTermId::try_from(value)?;
        return FREQUENCY_TERMS
            .iter()
            .find(|(id, _)| term == HpoTermId::from(*id))
            .map(|(_, frequency)| Some(*frequency))
            .ok_or_else(|| HpoError::InvalidInput(format!("{value} is not a frequency term")));
    }

    if let Some((n, m)) = value.split_once('/') {
        let n: u32 = n.parse()?;
        let m: u32 = m.parse()?;
        if m == 0 || n > m {
            return Err(HpoError::InvalidInput(format!("invalid frequency {value}")));
        }
        return Ok(Some(f64::from(n) / f64::from(m)));
    }

    if let Some(percent) = value.strip_suffix('%') {
        let percent: f64 = percent.trim().parse()?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(HpoError::InvalidInput(format!("invalid frequency {value}")));
        }
        return Ok(Some(percent / 100.0));
    }

    Err(HpoError::InvalidInput(format!("invalid frequency {value}")))
}

/// Parses a single line
///
/// Returns `Ok(None)` for comments, the header and all non-phenotype rows
fn parse_line(line: &str) -> HpoResult<Option<Annotation<'_>>> {
    if line.starts_with('#') || line.starts_with("database_id") || line.trim().is_empty() {
        return Ok(None);
    }

    let cols: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if cols.len() < 11 {
        return Err(HpoError::InvalidInput(line.to_string()));
    }

    if cols[10] != "P" {
        return Ok(None);
    }

    let disease = DiseaseId::try_from(cols[0])?;
    let term = HpoTermId::try_from(cols[3])?;
    let frequency = parse_frequency(cols[7])?;

    let excluded = match cols[2] {
        "NOT" => true,
        "" => frequency == Some(0.0),
        other => {
            return Err(HpoError::InvalidInput(format!("unknown qualifier {other}")));
        }
    };

    Ok(Some(Annotation {
        disease,
        name: cols[1],
        term,
        excluded,
        frequency,
    }))
}

/// Reads all annotations into `diseases`
///
/// Diseases are created on their first annotation. Malformed lines are
/// skipped. Returns the number of added annotations.
///
/// # Errors
///
/// [`HpoError::InvalidInput`] if the data cannot be read
pub fn read<R: BufRead>(reader: R, diseases: &mut DiseaseAnnotations) -> HpoResult<usize> {
    let mut added = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|_| invalid_data(SOURCE))?;
        let annotation = match parse_line(&line) {
            Ok(Some(annotation)) => annotation,
            Ok(None) => {
                trace!("Skipping line {}", idx + 1);
                continue;
            }
            Err(err) => {
                error!("Skipping malformed line {} of {}: {}", idx + 1, SOURCE, err);
                continue;
            }
        };

        let disease = diseases.get_or_insert(annotation.disease, annotation.name);
        let is_new = if annotation.excluded {
            disease.add_excluded_term(annotation.term)
        } else {
            match disease.add_term(annotation.term, annotation.frequency) {
                Ok(is_new) => is_new,
                Err(err) => {
                    error!("Skipping malformed line {} of {}: {}", idx + 1, SOURCE, err);
                    continue;
                }
            }
        };
        if is_new {
            added += 1;
        }
    }
    debug!("Parsed {} annotations of {} diseases", added, diseases.len());
    Ok(added)
}

/// Parses a `phenotype.hpoa` file
///
/// # Errors
///
/// - [`HpoError::CannotOpenFile`] if the file is not present or cannot be opened
/// - [`HpoError::InvalidInput`] if the file cannot be read
///
/// # Examples
///
/// ```no_run
/// use hpo_lr::parser::phenotype_hpoa;
///
/// let diseases = phenotype_hpoa::parse("data/phenotype.hpoa").unwrap();
/// println!("{} diseases", diseases.len());
/// ```
pub fn parse<P: AsRef<Path>>(file: P) -> HpoResult<DiseaseAnnotations> {
    let reader = open_file(file)?;
    let mut diseases = DiseaseAnnotations::new();
    read(reader, &mut diseases)?;
    Ok(diseases)
}
