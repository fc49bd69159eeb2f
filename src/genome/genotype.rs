//! Genotype
//!
//! A genotype is an ordered list of chromosomes of the same kind. It is the
//! representation the built-in alterers work on.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::genome::traits::{Chromosome, Flatten, Gene, Validate};

/// Ordered list of chromosomes
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genotype<C> {
    chromosomes: Vec<C>,
}

impl<C: Chromosome> Genotype<C> {
    /// Create a genotype from chromosomes
    pub fn new(chromosomes: Vec<C>) -> Self {
        Self { chromosomes }
    }

    /// Create a genotype holding a single chromosome
    pub fn single(chromosome: C) -> Self {
        Self {
            chromosomes: vec![chromosome],
        }
    }

    /// The chromosomes in order
    pub fn chromosomes(&self) -> &[C] {
        &self.chromosomes
    }

    /// Get a specific chromosome
    pub fn get(&self, index: usize) -> Option<&C> {
        self.chromosomes.get(index)
    }

    /// Number of chromosomes
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Whether the genotype holds no chromosome
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Total number of genes across chromosomes
    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::len).sum()
    }

    /// Take the chromosomes out of the genotype
    pub fn into_chromosomes(self) -> Vec<C> {
        self.chromosomes
    }
}

impl<C: Chromosome> Validate for Genotype<C> {
    fn is_valid(&self) -> bool {
        !self.chromosomes.is_empty() && self.chromosomes.iter().all(Validate::is_valid)
    }
}

impl<C: Chromosome> Flatten for Genotype<C> {
    type Value = <C::Gene as Gene>::Value;

    fn flatten(&self) -> Vec<Self::Value> {
        self.chromosomes.iter().flat_map(|c| c.values()).collect()
    }
}

impl<C> Index<usize> for Genotype<C> {
    type Output = C;

    fn index(&self, index: usize) -> &C {
        &self.chromosomes[index]
    }
}

impl<C: Chromosome> From<C> for Genotype<C> {
    fn from(chromosome: C) -> Self {
        Self::single(chromosome)
    }
}
