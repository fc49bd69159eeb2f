//! Individual wrapper type
//!
//! This module provides the Individual type that pairs a representation with
//! its fitness.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::genome::traits::Representation;

/// An individual in the population
///
/// Once evaluated an individual never changes: assigning fitness consumes the
/// unevaluated value and returns a new one.
///
/// Equality and hashing only look at the representation, so duplicates can be
/// detected before evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Individual<R> {
    representation: R,
    fitness: Option<f64>,
    birth_generation: usize,
}

impl<R: Representation> Individual<R> {
    /// Create a new, unevaluated individual
    pub fn new(representation: R) -> Self {
        Self {
            representation,
            fitness: None,
            birth_generation: 0,
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(representation: R, fitness: f64) -> Self {
        Self {
            representation,
            fitness: Some(fitness),
            birth_generation: 0,
        }
    }

    /// Create a new, unevaluated individual born in `generation`
    pub fn with_generation(representation: R, generation: usize) -> Self {
        Self {
            representation,
            fitness: None,
            birth_generation: generation,
        }
    }

    /// This individual with `fitness` assigned
    pub fn evaluated(self, fitness: f64) -> Self {
        Self {
            fitness: Some(fitness),
            ..self
        }
    }

    /// Check if this individual has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// The fitness, `None` until evaluated
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// The representation
    pub fn representation(&self) -> &R {
        &self.representation
    }

    /// Take the representation out of this individual
    pub fn into_representation(self) -> R {
        self.representation
    }

    /// Generation when this individual was created
    pub fn birth_generation(&self) -> usize {
        self.birth_generation
    }

    /// Age of this individual (generations since birth)
    pub fn age(&self, current_generation: usize) -> usize {
        current_generation.saturating_sub(self.birth_generation)
    }

    /// Whether the representation is valid and the fitness is a real number
    pub fn verify(&self) -> bool {
        self.representation.is_valid() && matches!(self.fitness, Some(f) if !f.is_nan())
    }
}

impl<R: PartialEq> PartialEq for Individual<R> {
    fn eq(&self, other: &Self) -> bool {
        self.representation == other.representation
    }
}

impl<R: Eq> Eq for Individual<R> {}

impl<R: Hash> Hash for Individual<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.representation.hash(state);
    }
}
