//! Ranking
//!
//! A ranker defines the total order over evaluated individuals that every
//! selector and limit relies on, and the transform that turns raw fitness
//! values into non-negative selection weights.

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::{EvoResult, EvolutionError};
use crate::genome::traits::Representation;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Total order over evaluated individuals
///
/// `Ordering::Greater` means the left-hand side is the better individual.
pub trait Ranker<R: Representation>: Send + Sync + Debug {
    /// Compare two raw fitness values. Neither is NaN.
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering;

    /// Compare two individuals
    ///
    /// Fails if either individual is unevaluated or carries a NaN fitness.
    fn compare(&self, a: &Individual<R>, b: &Individual<R>) -> EvoResult<Ordering> {
        Ok(self.compare_fitness(ranked_fitness(a)?, ranked_fitness(b)?))
    }

    /// Sort a population best first
    ///
    /// The sort is stable: equally ranked individuals keep their relative
    /// order.
    fn sort(&self, population: Population<R>) -> EvoResult<Population<R>> {
        let mut keyed = population
            .into_iter()
            .map(|individual| ranked_fitness(&individual).map(|f| (f, individual)))
            .collect::<EvoResult<Vec<_>>>()?;
        keyed.sort_by(|(a, _), (b, _)| self.compare_fitness(*b, *a));
        Ok(keyed.into_iter().map(|(_, individual)| individual).collect())
    }

    /// Map raw fitness values to selection weights, same length and order
    fn fitness_transform(&self, fitness: &[f64]) -> Vec<f64> {
        fitness.to_vec()
    }
}

/// Fitness of an individual that is allowed to take part in ranking
pub fn ranked_fitness<R: Representation>(individual: &Individual<R>) -> EvoResult<f64> {
    match individual.fitness() {
        Some(f) if !f.is_nan() => Ok(f),
        Some(_) => Err(EvolutionError::InvariantViolation(
            "cannot rank an individual with NaN fitness".to_string(),
        )),
        None => Err(EvolutionError::InvariantViolation(
            "cannot rank an unevaluated individual".to_string(),
        )),
    }
}

fn natural_order(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Higher fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitnessMaxRanker;

impl<R: Representation> Ranker<R> for FitnessMaxRanker {
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering {
        natural_order(a, b)
    }
}

/// Lower fitness is better
///
/// Selection weights are `sum(fitness) - fitness[i]`, so the smallest raw
/// value receives the largest weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitnessMinRanker;

impl<R: Representation> Ranker<R> for FitnessMinRanker {
    fn compare_fitness(&self, a: f64, b: f64) -> Ordering {
        natural_order(b, a)
    }

    fn fitness_transform(&self, fitness: &[f64]) -> Vec<f64> {
        let sum: f64 = fitness.iter().sum();
        fitness.iter().map(|f| sum - f).collect()
    }
}

pub mod prelude {
    pub use super::{FitnessMaxRanker, FitnessMinRanker, Ranker};
}
