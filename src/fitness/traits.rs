//! Fitness traits
//!
//! This module defines the two collaborators an engine is built from: the
//! fitness function scoring a representation and the factory creating the
//! initial ones.

use rand::RngCore;

/// Scores a representation
///
/// Implemented for every `Fn(&R) -> f64` closure. The function must not
/// return NaN; evaluators report NaN as an error.
pub trait Fitness<R>: Send + Sync {
    fn evaluate(&self, representation: &R) -> f64;
}

impl<R, F> Fitness<R> for F
where
    F: Fn(&R) -> f64 + Send + Sync,
{
    fn evaluate(&self, representation: &R) -> f64 {
        self(representation)
    }
}

/// Creates fresh representations for the initial population
///
/// Implemented for every `Fn(&mut dyn RngCore) -> R` closure.
pub trait GenotypeFactory<R>: Send + Sync {
    fn create(&self, rng: &mut dyn RngCore) -> R;
}

impl<R, F> GenotypeFactory<R> for F
where
    F: Fn(&mut dyn RngCore) -> R + Send + Sync,
{
    fn create(&self, rng: &mut dyn RngCore) -> R {
        self(rng)
    }
}
