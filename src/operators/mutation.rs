//! Mutation operators
//!
//! Mutators work on [`Genotype`]s in three stages: an individual is picked
//! with `individual_rate`, each of its chromosomes with `chromosome_rate`,
//! and the concrete mutator then decides per gene (usually with `gene_rate`).

use std::fmt::Debug;

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, EvoResult, OperatorError};
use crate::genome::boolean::BooleanGene;
use crate::genome::genotype::Genotype;
use crate::genome::traits::{Chromosome, Generate, NumericGene};
use crate::operators::traits::{gene_differences, Alteration, Alterer};
use crate::population::individual::Individual;
use crate::population::population::Population;

fn check_probability(errors: &mut ConfigurationError, name: &str, value: f64) {
    errors.ensure((0.0..=1.0).contains(&value), || {
        format!("{name} ({value}) must be in [0, 1]")
    });
}

/// Probabilities driving a mutator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    /// Probability that an individual is mutated at all
    pub individual_rate: f64,
    /// Probability that a chromosome of a mutated individual is touched
    pub chromosome_rate: f64,
    /// Per-gene probability used by the concrete mutator
    pub gene_rate: f64,
}

impl MutationRates {
    /// Create validated rates
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        gene_rate: f64,
    ) -> Result<Self, ConfigurationError> {
        let rates = Self {
            individual_rate,
            chromosome_rate,
            gene_rate,
        };
        rates.validate()?;
        Ok(rates)
    }

    /// Default rates with a different gene rate
    pub fn with_gene_rate(gene_rate: f64) -> Result<Self, ConfigurationError> {
        Self::new(0.5, 1.0, gene_rate)
    }

    /// Every rate must lie in [0, 1]
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut errors = ConfigurationError::empty();
        check_probability(&mut errors, "individual rate", self.individual_rate);
        check_probability(&mut errors, "chromosome rate", self.chromosome_rate);
        check_probability(&mut errors, "gene rate", self.gene_rate);
        errors.into_result()
    }
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            individual_rate: 0.5,
            chromosome_rate: 1.0,
            gene_rate: 0.5,
        }
    }
}

/// Mutation of a single chromosome
pub trait Mutator<C: Chromosome>: Send + Sync + Debug {
    fn rates(&self) -> &MutationRates;

    /// Mutated copy of `chromosome`
    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C>;
}

/// Drive a [`Mutator`] over a whole population
///
/// Individuals that come out identical keep their fitness.
pub fn mutate_population<C, M>(
    mutator: &M,
    population: Population<Genotype<C>>,
    generation: usize,
    rng: &mut dyn RngCore,
) -> EvoResult<Alteration<Genotype<C>>>
where
    C: Chromosome,
    M: Mutator<C> + ?Sized,
{
    let rates = *mutator.rates();
    let mut altered_genes = 0;
    let mut mutated = Population::with_capacity(population.len());

    for individual in population {
        if !rng.gen_bool(rates.individual_rate) {
            mutated.push(individual);
            continue;
        }

        let mut changed = 0;
        let mut chromosomes = Vec::with_capacity(individual.representation().len());
        for chromosome in individual.representation().chromosomes() {
            if rng.gen_bool(rates.chromosome_rate) {
                let mutant = mutator.mutate_chromosome(chromosome, rng)?;
                changed += gene_differences(chromosome, &mutant);
                chromosomes.push(mutant);
            } else {
                chromosomes.push(chromosome.clone());
            }
        }

        if changed == 0 {
            mutated.push(individual);
        } else {
            altered_genes += changed;
            mutated.push(Individual::with_generation(
                Genotype::new(chromosomes),
                generation,
            ));
        }
    }

    Ok(Alteration {
        population: mutated,
        altered_genes,
    })
}

macro_rules! mutator_alterer {
    ($mutator:ty, $($bound:tt)+) => {
        impl<C> Alterer<Genotype<C>> for $mutator
        where
            C: $($bound)+,
        {
            fn alter(
                &self,
                population: Population<Genotype<C>>,
                generation: usize,
                rng: &mut dyn RngCore,
            ) -> EvoResult<Alteration<Genotype<C>>> {
                mutate_population(self, population, generation, rng)
            }
        }
    };
}

/// Replaces genes with freshly generated ones
///
/// Each gene is replaced with `gene_rate` by a new gene drawn from its own
/// valid range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RandomMutator {
    rates: MutationRates,
}

impl RandomMutator {
    pub fn new(rates: MutationRates) -> Result<Self, ConfigurationError> {
        rates.validate()?;
        Ok(Self { rates })
    }
}

impl<C: Chromosome> Mutator<C> for RandomMutator {
    fn rates(&self) -> &MutationRates {
        &self.rates
    }

    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C> {
        let genes = chromosome
            .genes()
            .iter()
            .map(|gene| {
                if rng.gen_bool(self.rates.gene_rate) {
                    gene.generate(rng)
                } else {
                    gene.clone()
                }
            })
            .collect();
        Ok(chromosome.with_genes(genes))
    }
}

mutator_alterer!(RandomMutator, Chromosome);

/// Flips boolean genes, each with `gene_rate`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BitFlipMutator {
    rates: MutationRates,
}

impl BitFlipMutator {
    pub fn new(rates: MutationRates) -> Result<Self, ConfigurationError> {
        rates.validate()?;
        Ok(Self { rates })
    }
}

impl<C: Chromosome<Gene = BooleanGene>> Mutator<C> for BitFlipMutator {
    fn rates(&self) -> &MutationRates {
        &self.rates
    }

    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C> {
        let genes = chromosome
            .genes()
            .iter()
            .map(|gene| {
                if rng.gen_bool(self.rates.gene_rate) {
                    gene.flip()
                } else {
                    *gene
                }
            })
            .collect();
        Ok(chromosome.with_genes(genes))
    }
}

mutator_alterer!(BitFlipMutator, Chromosome<Gene = BooleanGene>);

/// Reverses a random contiguous segment of the chromosome
///
/// Only the individual and chromosome rates apply; the gene rate is unused.
/// Keeps the multiset of genes intact, so it is safe on permutations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InversionMutator {
    rates: MutationRates,
}

impl InversionMutator {
    pub fn new(rates: MutationRates) -> Result<Self, ConfigurationError> {
        rates.validate()?;
        Ok(Self { rates })
    }
}

impl<C: Chromosome> Mutator<C> for InversionMutator {
    fn rates(&self) -> &MutationRates {
        &self.rates
    }

    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C> {
        let len = chromosome.len();
        if len < 2 {
            return Ok(chromosome.clone());
        }
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        let (start, end) = (a.min(b), a.max(b));

        let mut genes = chromosome.genes().to_vec();
        genes[start..=end].reverse();
        Ok(chromosome.with_genes(genes))
    }
}

mutator_alterer!(InversionMutator, Chromosome);

/// Swaps genes with random positions, each with `gene_rate`
///
/// Keeps the multiset of genes intact, so it is safe on permutations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwapMutator {
    rates: MutationRates,
}

impl SwapMutator {
    pub fn new(rates: MutationRates) -> Result<Self, ConfigurationError> {
        rates.validate()?;
        Ok(Self { rates })
    }
}

impl<C: Chromosome> Mutator<C> for SwapMutator {
    fn rates(&self) -> &MutationRates {
        &self.rates
    }

    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C> {
        let len = chromosome.len();
        if len < 2 {
            return Ok(chromosome.clone());
        }
        let mut genes = chromosome.genes().to_vec();
        for i in 0..len {
            if rng.gen_bool(self.rates.gene_rate) {
                let j = rng.gen_range(0..len);
                genes.swap(i, j);
            }
        }
        Ok(chromosome.with_genes(genes))
    }
}

mutator_alterer!(SwapMutator, Chromosome);

/// Gaussian perturbation of numeric genes
///
/// The standard deviation is `sigma` times the width of the gene's range.
/// Results are clamped back into the range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianMutator {
    rates: MutationRates,
    sigma: f64,
}

impl GaussianMutator {
    pub const DEFAULT_SIGMA: f64 = 0.25;

    pub fn new(rates: MutationRates, sigma: f64) -> Result<Self, ConfigurationError> {
        let mut errors = ConfigurationError::empty();
        if let Err(e) = rates.validate() {
            errors.absorb(e);
        }
        errors.ensure(sigma.is_finite() && sigma > 0.0, || {
            format!("gaussian sigma ({sigma}) must be positive and finite")
        });
        errors.into_result()?;
        Ok(Self { rates, sigma })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Default for GaussianMutator {
    fn default() -> Self {
        Self {
            rates: MutationRates::default(),
            sigma: Self::DEFAULT_SIGMA,
        }
    }
}

impl<C> Mutator<C> for GaussianMutator
where
    C: Chromosome,
    C::Gene: NumericGene,
{
    fn rates(&self) -> &MutationRates {
        &self.rates
    }

    fn mutate_chromosome(&self, chromosome: &C, rng: &mut dyn RngCore) -> EvoResult<C> {
        let mut genes = Vec::with_capacity(chromosome.len());
        for gene in chromosome.genes() {
            if !rng.gen_bool(self.rates.gene_rate) {
                genes.push(gene.clone());
                continue;
            }
            let (min, max) = gene.range();
            let normal = Normal::new(gene.to_f64(), self.sigma * (max - min))
                .map_err(|e| OperatorError::MutationFailed(e.to_string()))?;
            genes.push(gene.from_f64(normal.sample(rng)));
        }
        Ok(chromosome.with_genes(genes))
    }
}

impl<C> Alterer<Genotype<C>> for GaussianMutator
where
    C: Chromosome,
    C::Gene: NumericGene,
{
    fn alter(
        &self,
        population: Population<Genotype<C>>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Alteration<Genotype<C>>> {
        mutate_population(self, population, generation, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::boolean::BooleanChromosome;
    use crate::genome::bounds::Bounds;
    use crate::genome::numeric::{DoubleChromosome, IntChromosome};
    use crate::genome::permutation::PermutationChromosome;
    use crate::genome::traits::Validate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn always(gene_rate: f64) -> MutationRates {
        MutationRates::new(1.0, 1.0, gene_rate).unwrap()
    }

    fn bits(n: usize, ones: bool) -> Population<Genotype<BooleanChromosome>> {
        (0..n)
            .map(|_| {
                let chromosome = if ones {
                    BooleanChromosome::ones(8)
                } else {
                    BooleanChromosome::zeros(8)
                };
                Individual::with_fitness(Genotype::single(chromosome), 1.0)
            })
            .collect()
    }

    #[test]
    fn test_rates_validation() {
        assert!(MutationRates::new(0.0, 1.0, 0.5).is_ok());
        let err = MutationRates::new(1.5, -0.1, 0.5).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert!(GaussianMutator::new(MutationRates::default(), 0.0).is_err());
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mutator = BitFlipMutator::new(MutationRates::new(0.0, 1.0, 1.0).unwrap()).unwrap();
        let input = bits(10, false);
        let output = mutator.alter(input.clone(), 1, &mut rng).unwrap();
        assert_eq!(output.population, input);
        assert_eq!(output.altered_genes, 0);
        assert!(output.population.all_evaluated());
    }

    #[test]
    fn test_bit_flip_all_genes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mutator = BitFlipMutator::new(always(1.0)).unwrap();
        let output = mutator.alter(bits(4, false), 5, &mut rng).unwrap();
        assert_eq!(output.altered_genes, 32);
        for individual in output.population.iter() {
            assert!(!individual.is_evaluated());
            assert_eq!(individual.birth_generation(), 5);
            assert_eq!(individual.representation()[0].count_ones(), 8);
        }
    }

    #[test]
    fn test_random_mutator_keeps_genes_valid() {
        let mut rng = StdRng::seed_from_u64(11);
        let population: Population<Genotype<IntChromosome>> = (0..20)
            .map(|_| Individual::new(Genotype::single(IntChromosome::random(10, -5, 5, &mut rng))))
            .collect();
        let output = RandomMutator::new(always(0.7))
            .unwrap()
            .alter(population, 1, &mut rng)
            .unwrap();
        assert_eq!(output.population.len(), 20);
        assert!(output.population.iter().all(|i| i.representation().is_valid()));
    }

    #[test]
    fn test_gaussian_mutator_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = Bounds::new(-1.0, 1.0);
        let population: Population<Genotype<DoubleChromosome>> = (0..20)
            .map(|_| Individual::new(Genotype::single(DoubleChromosome::random(6, bounds, &mut rng))))
            .collect();
        let mutator = GaussianMutator::new(always(1.0), 2.0).unwrap();
        let output = mutator.alter(population, 1, &mut rng).unwrap();
        assert!(output.altered_genes > 0);
        for individual in output.population.iter() {
            assert!(individual.representation()[0]
                .to_f64s()
                .iter()
                .all(|v| bounds.contains(*v)));
        }
    }

    #[test]
    fn test_inversion_and_swap_preserve_permutations() {
        let mut rng = StdRng::seed_from_u64(9);
        let population: Population<Genotype<PermutationChromosome<u32>>> = (0..10)
            .map(|_| {
                Individual::new(Genotype::single(PermutationChromosome::shuffled(
                    (0..12).collect(),
                    &mut rng,
                )))
            })
            .collect();

        let inverted = InversionMutator::new(always(1.0))
            .unwrap()
            .alter(population, 1, &mut rng)
            .unwrap();
        let swapped = SwapMutator::new(always(0.5))
            .unwrap()
            .alter(inverted.population, 2, &mut rng)
            .unwrap();

        for individual in swapped.population.iter() {
            let chromosome = &individual.representation()[0];
            assert!(chromosome.is_valid());
            let mut values = chromosome.values();
            values.sort_unstable();
            assert_eq!(values, (0..12).collect::<Vec<u32>>());
        }
    }

    #[test]
    fn test_inversion_short_chromosome_unchanged() {
        let mut rng = StdRng::seed_from_u64(9);
        let chromosome = BooleanChromosome::from_bools(&[true]);
        let mutated = Mutator::<BooleanChromosome>::mutate_chromosome(
            &InversionMutator::default(),
            &chromosome,
            &mut rng,
        )
        .unwrap();
        assert_eq!(mutated, chromosome);
    }
}
