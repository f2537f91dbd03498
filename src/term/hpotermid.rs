use core::fmt::Debug;
use std::fmt::Display;

use crate::{HpoError, HpoResult};

/// The unique identifier of an [`crate::HpoTerm`]
///
/// It is internally represented as `u32` and printed as `HP:0000118`.
///
/// # Examples
///
/// ```
/// use hpo_lr::HpoTermId;
///
/// let id = HpoTermId::try_from("HP:0000118").unwrap();
/// assert_eq!(id.as_u32(), 118u32);
/// assert_eq!(id.to_string(), "HP:0000118");
/// ```
#[derive(Copy, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HpoTermId {
    inner: u32,
}

impl HpoTermId {
    /// Returns the integer representation of the [`HpoTermId`]
    pub fn as_u32(&self) -> u32 {
        self.inner
    }
}

impl TryFrom<&str> for HpoTermId {
    type Error = HpoError;
    fn try_from(s: &str) -> HpoResult<Self> {
        let Some(number) = s.strip_prefix("HP:") else {
            return Err(HpoError::InvalidInput(format!("invalid HPO term ID {s}")));
        };
        if number.len() != 7 {
            return Err(HpoError::InvalidInput(format!("invalid HPO term ID {s}")));
        }
        Ok(HpoTermId {
            inner: number.parse::<u32>()?,
        })
    }
}

impl From<u32> for HpoTermId {
    fn from(inner: u32) -> Self {
        Self { inner }
    }
}

impl Debug for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HpoTermId({self})")
    }
}

impl Display for HpoTermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HP:{:07}", self.inner)
    }
}

impl PartialEq<str> for HpoTermId {
    fn eq(&self, other: &str) -> bool {
        HpoTermId::try_from(other).map_or(false, |other| self == &other)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_valid_id() {
        let id = HpoTermId::try_from("HP:0012345").expect("valid id");
        assert_eq!(id.as_u32(), 12345);
        assert_eq!(&id, "HP:0012345");
    }

    #[test]
    fn parse_invalid_prefix() {
        assert!(HpoTermId::try_from("XP:0012345").is_err());
        assert!(HpoTermId::try_from("0012345").is_err());
    }

    #[test]
    fn parse_invalid_number() {
        assert!(HpoTermId::try_from("HP:00123A5").is_err());
        assert!(HpoTermId::try_from("HP:12345").is_err());
    }

    #[test]
    fn display_pads_zeros() {
        assert_eq!(HpoTermId::from(7u32).to_string(), "HP:0000007");
        assert_eq!(format!("{:?}", HpoTermId::from(7u32)), "HpoTermId(HP:0000007)");
    }
}
