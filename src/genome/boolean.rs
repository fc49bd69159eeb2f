//! Boolean genes
//!
//! Binary optimization problems are encoded as chromosomes of [`BooleanGene`]s.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::genome::chromosome::LinearChromosome;
use crate::genome::traits::{Chromosome, Gene, Generate, Validate};

/// A single bit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BooleanGene(bool);

impl BooleanGene {
    /// The `true` gene
    pub const TRUE: Self = Self(true);
    /// The `false` gene
    pub const FALSE: Self = Self(false);

    /// Create a gene holding `value`
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    /// The gene with the opposite value
    pub fn flip(&self) -> Self {
        Self(!self.0)
    }

    /// The carried bit
    pub fn get(&self) -> bool {
        self.0
    }
}

impl Validate for BooleanGene {
    fn is_valid(&self) -> bool {
        true
    }
}

impl Generate for BooleanGene {
    fn generate(&self, rng: &mut dyn RngCore) -> Self {
        Self(rng.gen())
    }
}

impl Gene for BooleanGene {
    type Value = bool;

    fn value(&self) -> &bool {
        &self.0
    }

    fn with_value(&self, value: bool) -> Self {
        Self(value)
    }
}

impl From<bool> for BooleanGene {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

/// Chromosome of bits
pub type BooleanChromosome = LinearChromosome<BooleanGene>;

impl LinearChromosome<BooleanGene> {
    /// Random chromosome where each bit is `true` with probability `true_rate`
    pub fn random<R: Rng + ?Sized>(size: usize, true_rate: f64, rng: &mut R) -> Self {
        let true_rate = true_rate.clamp(0.0, 1.0);
        (0..size).map(|_| BooleanGene(rng.gen_bool(true_rate))).collect()
    }

    /// Chromosome from raw bits
    pub fn from_bools(bits: &[bool]) -> Self {
        bits.iter().copied().map(BooleanGene).collect()
    }

    /// All-`false` chromosome
    pub fn zeros(size: usize) -> Self {
        Self::new(vec![BooleanGene::FALSE; size])
    }

    /// All-`true` chromosome
    pub fn ones(size: usize) -> Self {
        Self::new(vec![BooleanGene::TRUE; size])
    }

    /// Number of `true` bits
    pub fn count_ones(&self) -> usize {
        self.genes().iter().filter(|g| g.get()).count()
    }

    /// Number of `false` bits
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Raw bits
    pub fn to_bools(&self) -> Vec<bool> {
        self.genes().iter().map(BooleanGene::get).collect()
    }
}

impl std::fmt::Display for LinearChromosome<BooleanGene> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for gene in self.genes() {
            write!(f, "{}", if gene.get() { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_boolean_gene_flip() {
        assert_eq!(BooleanGene::TRUE.flip(), BooleanGene::FALSE);
        assert_eq!(BooleanGene::new(false).flip().get(), true);
    }

    #[test]
    fn test_boolean_chromosome_counts() {
        let chromosome = BooleanChromosome::from_bools(&[true, false, true, true, false]);
        assert_eq!(chromosome.count_ones(), 3);
        assert_eq!(chromosome.count_zeros(), 2);
        assert_eq!(chromosome.to_string(), "10110");
    }

    #[test]
    fn test_boolean_chromosome_zeros_ones() {
        assert_eq!(BooleanChromosome::zeros(4).count_ones(), 0);
        assert_eq!(BooleanChromosome::ones(4).count_ones(), 4);
    }

    #[test]
    fn test_boolean_chromosome_random_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(BooleanChromosome::random(16, 1.0, &mut rng).count_ones(), 16);
        assert_eq!(BooleanChromosome::random(16, 0.0, &mut rng).count_ones(), 0);
        assert_eq!(BooleanChromosome::random(16, 0.5, &mut rng).len(), 16);
    }

    #[test]
    fn test_boolean_roundtrip_bools() {
        let bits = vec![false, true, true];
        assert_eq!(BooleanChromosome::from_bools(&bits).to_bools(), bits);
    }
}
