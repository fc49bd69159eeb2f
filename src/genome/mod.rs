//! Genome representations
//!
//! This module provides the capability traits the engine relies on and a
//! small set of concrete genes, chromosomes and the multi-chromosome genotype.

pub mod boolean;
pub mod bounds;
pub mod chromosome;
pub mod genotype;
pub mod numeric;
pub mod permutation;
pub mod traits;

pub mod prelude {
    pub use super::boolean::*;
    pub use super::bounds::*;
    pub use super::chromosome::*;
    pub use super::genotype::*;
    pub use super::numeric::*;
    pub use super::permutation::*;
    pub use super::traits::*;
}
