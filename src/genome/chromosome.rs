//! Linear chromosome
//!
//! A plain sequence of genes whose only constraint is that every gene is
//! valid on its own.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::genome::traits::{Chromosome, Gene, Validate};

/// Fixed-length sequence of independent genes
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearChromosome<G> {
    genes: Vec<G>,
}

impl<G: Gene> LinearChromosome<G> {
    /// Create a chromosome holding `genes`
    pub fn new(genes: Vec<G>) -> Self {
        Self { genes }
    }

    /// Get a specific gene
    pub fn get(&self, index: usize) -> Option<&G> {
        self.genes.get(index)
    }

    /// Take the genes out of the chromosome
    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }
}

impl<G: Gene> Validate for LinearChromosome<G> {
    fn is_valid(&self) -> bool {
        self.genes.iter().all(Validate::is_valid)
    }
}

impl<G: Gene> Chromosome for LinearChromosome<G> {
    type Gene = G;

    fn genes(&self) -> &[G] {
        &self.genes
    }

    fn with_genes(&self, genes: Vec<G>) -> Self {
        Self { genes }
    }
}

impl<G> Index<usize> for LinearChromosome<G> {
    type Output = G;

    fn index(&self, index: usize) -> &G {
        &self.genes[index]
    }
}

impl<G: Gene> FromIterator<G> for LinearChromosome<G> {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self {
            genes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::numeric::IntGene;

    #[test]
    fn test_linear_chromosome_validity_is_per_gene() {
        let valid = LinearChromosome::new(vec![IntGene::new(1, 0, 5), IntGene::new(5, 0, 5)]);
        assert!(valid.is_valid());

        let invalid = LinearChromosome::new(vec![IntGene::new(1, 0, 5), IntGene::new(9, 0, 5)]);
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_linear_chromosome_with_genes() {
        let chromosome = LinearChromosome::new(vec![IntGene::new(1, 0, 5)]);
        let replaced = chromosome.with_genes(vec![IntGene::new(2, 0, 5), IntGene::new(3, 0, 5)]);
        assert_eq!(replaced.len(), 2);
        assert_eq!(replaced.values(), vec![2, 3]);
        assert_eq!(*replaced[1].value(), 3);
    }
}
