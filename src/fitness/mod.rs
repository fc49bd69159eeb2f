//! Fitness evaluation and benchmarks
//!
//! This module provides the fitness and factory abstractions and a few
//! benchmark functions.

pub mod benchmarks;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::traits::*;
}
