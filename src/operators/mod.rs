//! Genetic operators
//!
//! This module provides selectors and the alterers (mutators and crossovers)
//! applied to the parent pool.

pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
