//! Links genes to diseases from the `genes_to_disease.txt` file
//!
//! ```text
//! ncbi_gene_id     gene_symbol  association_type  disease_id    source
//! NCBIGene:64170   CARD9        MENDELIAN         OMIM:212050   ftp://ftp.omim.org/mim2gene
//! NCBIGene:1017    CDK2         POLYGENIC         OMIM:619178   ftp://ftp.omim.org/mim2gene
//! ```
//!
//! Only diseases that are already part of the [`DiseaseAnnotations`] are linked.
//! The gene symbols of all lines are recorded.
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, error, trace};

use crate::annotations::{DiseaseAnnotations, DiseaseId, GeneId};
use crate::parser::{invalid_data, open_file};
use crate::{HpoError, HpoResult};

const SOURCE: &str = "genes_to_disease.txt";

struct GeneLink<'a> {
    gene: GeneId,
    symbol: &'a str,
    disease: DiseaseId,
}

fn parse_line(line: &str) -> HpoResult<Option<GeneLink<'_>>> {
    if line.starts_with('#') || line.starts_with("ncbi_gene_id") || line.trim().is_empty() {
        return Ok(None);
    }
    let mut cols = line.split('\t');

    // Column 1 is the NCBI-ID of the gene
    let Some(gene) = cols.next() else {
        return Err(HpoError::InvalidInput(line.to_string()));
    };

    // Column 2 is the gene symbol
    let Some(symbol) = cols.next() else {
        return Err(HpoError::InvalidInput(line.to_string()));
    };

    // Column 3 is the association type
    if cols.next().is_none() {
        return Err(HpoError::InvalidInput(line.to_string()));
    }

    // Column 4 is the disease
    let Some(disease) = cols.next() else {
        return Err(HpoError::InvalidInput(line.to_string()));
    };

    Ok(Some(GeneLink {
        gene: GeneId::try_from(gene)?,
        symbol,
        disease: DiseaseId::try_from(disease)?,
    }))
}

/// Adds the genes of every line to the linked disease
///
/// Returns the number of new gene-disease links.
///
/// # Errors
///
/// [`HpoError::InvalidInput`] if the data cannot be read
pub fn read<R: BufRead>(reader: R, diseases: &mut DiseaseAnnotations) -> HpoResult<usize> {
    let mut added = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|_| invalid_data(SOURCE))?;
        let link = match parse_line(&line) {
            Ok(Some(link)) => link,
            Ok(None) => continue,
            Err(err) => {
                error!("Skipping malformed line {} of {}: {}", idx + 1, SOURCE, err);
                continue;
            }
        };
        diseases.add_gene_symbol(link.gene, link.symbol);
        match diseases.get_mut(&link.disease) {
            Some(disease) => {
                if disease.add_gene(link.gene) {
                    added += 1;
                }
            }
            None => trace!(
                "{} ({}) is linked to unknown disease {}",
                link.symbol,
                link.gene,
                link.disease
            ),
        }
    }
    debug!("Added {} gene-disease links", added);
    Ok(added)
}

/// Parses a `genes_to_disease.txt` file and links the genes to `diseases`
///
/// # Errors
///
/// - [`HpoError::CannotOpenFile`] if the file is not present or cannot be opened
/// - [`HpoError::InvalidInput`] if the file cannot be read
pub fn parse<P: AsRef<Path>>(file: P, diseases: &mut DiseaseAnnotations) -> HpoResult<usize> {
    read(open_file(file)?, diseases)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Disease;

    #[test]
    fn correct_line() {
        let line = "NCBIGene:64170\tCARD9\tMENDELIAN\tOMIM:212050\tftp://ftp.omim.org";
        let link = parse_line(line)
            .expect("valid line")
            .expect("not a header");
        assert_eq!(link.gene, GeneId::from(64170u32));
        assert_eq!(link.symbol, "CARD9");
        assert_eq!(link.disease, DiseaseId::omim(212050));
    }

    #[test]
    fn header() {
        let line = "ncbi_gene_id\tgene_symbol\tassociation_type\tdisease_id\tsource";
        assert!(parse_line(line).expect("valid header").is_none());
    }

    #[test]
    fn missing_columns() {
        assert!(parse_line("NCBIGene:64170\tCARD9\tMENDELIAN").is_err());
        assert!(parse_line("NCBIGene:64170").is_err());
    }

    #[test]
    fn invalid_ids() {
        assert!(parse_line("Ensembl:64170\tCARD9\tMENDELIAN\tOMIM:212050").is_err());
        assert!(parse_line("NCBIGene:64170\tCARD9\tMENDELIAN\tMONDO:212050").is_err());
    }

    #[test]
    fn link_known_diseases() {
        let data = "ncbi_gene_id\tgene_symbol\tassociation_type\tdisease_id\tsource\n\
            NCBIGene:64170\tCARD9\tMENDELIAN\tOMIM:212050\tomim\n\
            NCBIGene:64170\tCARD9\tMENDELIAN\tOMIM:212050\torphadata\n\
            NCBIGene:2200\tFBN1\tMENDELIAN\tOMIM:154700\tomim\n\
            NCBIGene:1017\tCDK2\tPOLYGENIC\tOMIM:212050\tomim\n";

        let mut diseases: DiseaseAnnotations =
            [Disease::new(DiseaseId::omim(212050), "Candidiasis")]
                .into_iter()
                .collect();
        let added = read(data.as_bytes(), &mut diseases).expect("valid data");
        assert_eq!(added, 2);
        assert_eq!(
            diseases
                .associated_genes(&DiseaseId::omim(212050))
                .expect("disease exists"),
            &[GeneId::from(64170u32), GeneId::from(1017u32)]
        );
        assert!(!diseases.contains(&DiseaseId::omim(154700)));

        assert_eq!(diseases.gene_symbol(&GeneId::from(64170u32)), Some("CARD9"));
        assert_eq!(diseases.gene_symbol(&GeneId::from(2200u32)), Some("FBN1"));
        assert_eq!(diseases.gene_symbol(&GeneId::from(7273u32)), None);
    }
}
