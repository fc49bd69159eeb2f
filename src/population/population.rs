//! Population type
//!
//! This module provides the Population container type.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::genome::traits::Representation;
use crate::population::individual::Individual;

/// An ordered collection of individuals
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Population<R> {
    individuals: Vec<Individual<R>>,
}

impl<R: Representation> Population<R> {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<R>>) -> Self {
        Self { individuals }
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual<R>> {
        self.individuals.get(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<R>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> std::slice::Iter<'_, Individual<R>> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual<R>] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<Individual<R>> {
        self.individuals
    }

    /// This population followed by `other`
    pub fn concat(mut self, other: Population<R>) -> Self {
        self.individuals.extend(other.individuals);
        self
    }

    /// Check if all individuals have been evaluated
    pub fn all_evaluated(&self) -> bool {
        self.individuals.iter().all(Individual::is_evaluated)
    }

    /// Count the number of evaluated individuals
    pub fn count_evaluated(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_evaluated()).count()
    }

    /// Fitness of every evaluated individual, in order
    pub fn fitness_values(&self) -> Vec<f64> {
        self.individuals.iter().filter_map(Individual::fitness).collect()
    }

    /// Compute mean fitness
    pub fn mean_fitness(&self) -> Option<f64> {
        let evaluated = self.fitness_values();
        if evaluated.is_empty() {
            None
        } else {
            Some(evaluated.iter().sum::<f64>() / evaluated.len() as f64)
        }
    }

    /// Compute fitness standard deviation
    pub fn fitness_std(&self) -> Option<f64> {
        let evaluated = self.fitness_values();
        if evaluated.len() < 2 {
            return None;
        }
        let mean = evaluated.iter().sum::<f64>() / evaluated.len() as f64;
        let variance = evaluated.iter().map(|f| (f - mean).powi(2)).sum::<f64>()
            / (evaluated.len() - 1) as f64;
        Some(variance.sqrt())
    }
}

impl<R: Representation> Default for Population<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Index<usize> for Population<R> {
    type Output = Individual<R>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<R: Representation> FromIterator<Individual<R>> for Population<R> {
    fn from_iter<I: IntoIterator<Item = Individual<R>>>(iter: I) -> Self {
        Self {
            individuals: iter.into_iter().collect(),
        }
    }
}

impl<R> IntoIterator for Population<R> {
    type Item = Individual<R>;
    type IntoIter = std::vec::IntoIter<Individual<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Population<R> {
    type Item = &'a Individual<R>;
    type IntoIter = std::slice::Iter<'a, Individual<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl<R: Representation> From<Vec<Individual<R>>> for Population<R> {
    fn from(individuals: Vec<Individual<R>>) -> Self {
        Self::from_individuals(individuals)
    }
}
