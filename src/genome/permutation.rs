//! Permutation genes
//!
//! Ordering problems (routing, scheduling) are encoded as a
//! [`PermutationChromosome`]: an arrangement of the elements of a shared
//! alphabet in which every element appears at most once.

use std::fmt::Debug;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::traits::{Chromosome, Gene, Generate, Validate};

/// Element of a permutation, tied to the alphabet it was drawn from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermutationGene<T> {
    value: T,
    alphabet: Arc<Vec<T>>,
}

impl<T> PermutationGene<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    /// Create a gene carrying `value` from `alphabet`
    pub fn new(value: T, alphabet: Arc<Vec<T>>) -> Self {
        Self { value, alphabet }
    }

    /// The alphabet this gene belongs to
    pub fn alphabet(&self) -> &[T] {
        &self.alphabet
    }
}

impl<T> Validate for PermutationGene<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    fn is_valid(&self) -> bool {
        self.alphabet.contains(&self.value)
    }
}

impl<T> Generate for PermutationGene<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    fn generate(&self, rng: &mut dyn RngCore) -> Self {
        match self.alphabet.choose(rng) {
            Some(value) => Self::new(value.clone(), Arc::clone(&self.alphabet)),
            None => self.clone(),
        }
    }
}

impl<T> Gene for PermutationGene<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn with_value(&self, value: T) -> Self {
        Self::new(value, Arc::clone(&self.alphabet))
    }
}

/// An arrangement of distinct alphabet elements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermutationChromosome<T> {
    genes: Vec<PermutationGene<T>>,
}

impl<T> PermutationChromosome<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    /// Create a chromosome from genes, without checking distinctness
    pub fn new(genes: Vec<PermutationGene<T>>) -> Self {
        Self { genes }
    }

    /// The alphabet in its own order
    pub fn identity(alphabet: Vec<T>) -> Self {
        let alphabet = Arc::new(alphabet);
        let genes = alphabet
            .iter()
            .map(|v| PermutationGene::new(v.clone(), Arc::clone(&alphabet)))
            .collect();
        Self { genes }
    }

    /// A uniformly shuffled arrangement of the alphabet
    pub fn shuffled<R: Rng + ?Sized>(alphabet: Vec<T>, rng: &mut R) -> Self {
        let mut chromosome = Self::identity(alphabet);
        chromosome.genes.shuffle(rng);
        chromosome
    }

    /// Arrange `values` over `alphabet`, returning an error unless the result
    /// is a valid permutation
    pub fn try_from_values(values: Vec<T>, alphabet: Vec<T>) -> Result<Self, GenomeError> {
        let alphabet = Arc::new(alphabet);
        let chromosome = Self {
            genes: values
                .into_iter()
                .map(|v| PermutationGene::new(v, Arc::clone(&alphabet)))
                .collect(),
        };
        if chromosome.is_valid() {
            Ok(chromosome)
        } else {
            Err(GenomeError::InvalidStructure(format!(
                "{:?} is not a permutation over {:?}",
                chromosome.values(),
                alphabet
            )))
        }
    }

    /// Whether no element appears twice
    pub fn is_distinct(&self) -> bool {
        self.genes
            .iter()
            .enumerate()
            .all(|(i, g)| !self.genes[i + 1..].iter().any(|o| o.value == g.value))
    }
}

impl<T> Validate for PermutationChromosome<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    fn is_valid(&self) -> bool {
        self.genes.iter().all(Validate::is_valid) && self.is_distinct()
    }
}

impl<T> Chromosome for PermutationChromosome<T>
where
    T: Clone + Debug + PartialEq + Send + Sync + 'static,
{
    type Gene = PermutationGene<T>;

    fn genes(&self) -> &[PermutationGene<T>] {
        &self.genes
    }

    fn with_genes(&self, genes: Vec<PermutationGene<T>>) -> Self {
        Self { genes }
    }
}
