//! Population management
//!
//! This module provides the Individual, Population and EvolutionState types.

pub mod individual;
#[allow(clippy::module_inception)]
pub mod population;
pub mod state;

pub mod prelude {
    pub use super::individual::*;
    pub use super::population::*;
    pub use super::state::*;
}
