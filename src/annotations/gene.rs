use core::fmt::Debug;
use std::convert::TryFrom;
use std::fmt::Display;
use std::hash::Hash;

use crate::HpoError;

/// A unique identifier for a gene
///
/// This value can - in theory - represent any numerical unique value.
/// When using the default JAX provided masterdata, it represents
/// the NCBI Gene ID
#[derive(Clone, Copy, Default, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct GeneId {
    inner: u32,
}

impl GeneId {
    /// Returns the numerical gene id
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

/// Parses `NCBIGene:2200` or the plain number `2200`
///
/// # Examples
///
/// ```
/// use hpo_lr::GeneId;
///
/// let gene = GeneId::try_from("NCBIGene:2200").unwrap();
/// assert_eq!(gene, GeneId::from(2200u32));
/// assert_eq!(GeneId::try_from("2200").unwrap(), gene);
/// assert!(GeneId::try_from("HGNC:3603").is_err());
/// ```
impl TryFrom<&str> for GeneId {
    type Error = HpoError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let number = match value.split_once(':') {
            Some(("NCBIGene", number)) => number,
            Some(_) => return Err(HpoError::InvalidInput(format!("invalid gene id {value}"))),
            None => value,
        };
        Ok(GeneId {
            inner: number.trim().parse::<u32>()?,
        })
    }
}

impl From<u32> for GeneId {
    fn from(inner: u32) -> Self {
        GeneId { inner }
    }
}

impl Display for GeneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NCBIGene:{}", self.inner)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(GeneId::from(2200u32).to_string(), "NCBIGene:2200");
    }

    #[test]
    fn parse_invalid() {
        assert!(matches!(
            GeneId::try_from("NCBIGene:FBN1"),
            Err(HpoError::ParseIntError)
        ));
        assert!(GeneId::try_from("").is_err());
    }
}
