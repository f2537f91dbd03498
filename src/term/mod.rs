//! [`HpoTerm`]s are the nodes of the ontology graph that observations and
//! disease annotations refer to
//!
//! This module contains the identifier [`HpoTermId`], the set type [`HpoGroup`]
//! that is used for parents and annotations, and [`HpoTerm`], a
//! lightweight view into a term of the [`crate::Ontology`].

mod group;
mod hpoterm;
mod hpotermid;
pub(crate) mod internal;

pub use group::{HpoGroup, HpoTermIds};
pub use hpoterm::HpoTerm;
pub use hpotermid::HpoTermId;

/// A set of parent [`HpoTermId`]s
pub type HpoParents = HpoGroup;

/// Converts a probability of annotation into information content
///
/// Information content is `-ln(p)`. Probabilities of `0` (terms without
/// any annotation) have no information content.
pub(crate) fn information_content_from_probability(p: f64) -> f64 {
    if p <= 0.0 || !p.is_finite() {
        0.0
    } else {
        (-p.ln()).max(0.0)
    }
}

/// Converts information content back into the probability of annotation
pub(crate) fn probability_from_information_content(ic: f64) -> f64 {
    (-ic).exp()
}
