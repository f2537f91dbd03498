//! Parsing the HPO annotation data and the genotype background data
//!
//! - [`phenotype_hpoa`] builds the [`DiseaseAnnotations`](crate::DiseaseAnnotations) from `phenotype.hpoa`
//! - [`genes_to_disease`] links genes to the diseases from `genes_to_disease.txt`
//! - [`background_frequency`] reads the expected background frequencies of pathogenic variants
//!
//! Malformed lines are logged and skipped. Missing or unreadable files are errors.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{HpoError, HpoResult};

pub mod background_frequency;
pub mod genes_to_disease;
pub mod phenotype_hpoa;

/// Opens a file for buffered, line-based reading
fn open_file<P: AsRef<Path>>(file: P) -> HpoResult<BufReader<File>> {
    let filename = file.as_ref().display().to_string();
    let file = File::open(file).map_err(|_| HpoError::CannotOpenFile(filename))?;
    Ok(BufReader::new(file))
}

/// Maps an IO error of a single line to [`HpoError::InvalidInput`]
fn invalid_data(source: &str) -> HpoError {
    HpoError::InvalidInput(format!("Invalid data in {source}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file() {
        assert!(matches!(
            open_file("does/not/exist.txt"),
            Err(HpoError::CannotOpenFile(name)) if name == "does/not/exist.txt"
        ));
    }
}
