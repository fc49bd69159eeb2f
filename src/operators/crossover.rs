//! Crossover operators
//!
//! A crossover consumes the parent pool in consecutive groups of
//! `num_inputs` individuals (wrapping around at the end of the pool). A
//! recombined group yields `num_outputs` offspring, a group left alone passes
//! its parents through. Groups are drawn until the output has as many
//! individuals as the input.

use std::fmt::Debug;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, EvoResult, EvolutionError, OperatorError};
use crate::genome::genotype::Genotype;
use crate::genome::traits::{Chromosome, NumericGene};
use crate::operators::traits::{gene_differences, Alteration, Alterer};
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Shape and probabilities of a crossover
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossoverConfig {
    /// Probability that a group of parents is recombined
    pub individual_rate: f64,
    /// Probability that a chromosome position of a recombined group is crossed
    pub chromosome_rate: f64,
    /// Parents per group
    pub num_inputs: usize,
    /// Offspring per group
    pub num_outputs: usize,
}

impl CrossoverConfig {
    /// Create a validated configuration
    pub fn new(
        individual_rate: f64,
        chromosome_rate: f64,
        num_inputs: usize,
        num_outputs: usize,
    ) -> Result<Self, ConfigurationError> {
        let config = Self {
            individual_rate,
            chromosome_rate,
            num_inputs,
            num_outputs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Two parents, two offspring, recombined with `individual_rate`
    pub fn pairwise(individual_rate: f64) -> Result<Self, ConfigurationError> {
        Self::new(individual_rate, 1.0, 2, 2)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut errors = ConfigurationError::empty();
        errors.ensure((0.0..=1.0).contains(&self.individual_rate), || {
            format!("individual rate ({}) must be in [0, 1]", self.individual_rate)
        });
        errors.ensure((0.0..=1.0).contains(&self.chromosome_rate), || {
            format!("chromosome rate ({}) must be in [0, 1]", self.chromosome_rate)
        });
        errors.ensure(self.num_inputs >= 2, || {
            format!("crossover inputs ({}) must be at least 2", self.num_inputs)
        });
        errors.ensure(self.num_outputs >= 1, || {
            format!("crossover outputs ({}) must be at least 1", self.num_outputs)
        });
        errors.into_result()
    }
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            individual_rate: 1.0,
            chromosome_rate: 1.0,
            num_inputs: 2,
            num_outputs: 2,
        }
    }
}

/// Recombination of one chromosome position
pub trait Crossover<C: Chromosome>: Send + Sync + Debug {
    fn config(&self) -> &CrossoverConfig;

    /// Cross `parents` (exactly `num_inputs` of them) into exactly
    /// `num_outputs` chromosomes
    fn crossover_chromosomes(&self, parents: &[&C], rng: &mut dyn RngCore) -> EvoResult<Vec<C>>;
}

/// Drive a [`Crossover`] over a parent pool
///
/// Offspring identical to their primary parent (output `j` of a group has
/// parent `j % num_inputs` as primary) keep that parent's fitness.
pub fn crossover_population<C, X>(
    crossover: &X,
    population: Population<Genotype<C>>,
    generation: usize,
    rng: &mut dyn RngCore,
) -> EvoResult<Alteration<Genotype<C>>>
where
    C: Chromosome,
    X: Crossover<C> + ?Sized,
{
    let config = *crossover.config();
    let size = population.len();
    if size == 0 {
        return Ok(Alteration::unchanged(population));
    }

    let parents = population.into_individuals();
    let mut offspring = Vec::with_capacity(size + config.num_outputs);
    let mut altered_genes = 0;
    let mut cursor = 0;

    while offspring.len() < size {
        let group: Vec<&Individual<Genotype<C>>> = (0..config.num_inputs)
            .map(|i| &parents[(cursor + i) % size])
            .collect();
        cursor = (cursor + config.num_inputs) % size;

        if !rng.gen_bool(config.individual_rate) {
            offspring.extend(group.into_iter().cloned());
            continue;
        }

        let positions = group[0].representation().len();
        if let Some(other) = group.iter().find(|p| p.representation().len() != positions) {
            return Err(OperatorError::CrossoverFailed(format!(
                "parents carry different chromosome counts ({positions} and {})",
                other.representation().len()
            ))
            .into());
        }

        let mut children: Vec<Vec<C>> = vec![Vec::with_capacity(positions); config.num_outputs];
        for position in 0..positions {
            let chromosomes: Vec<&C> = group
                .iter()
                .map(|p| &p.representation()[position])
                .collect();
            if rng.gen_bool(config.chromosome_rate) {
                let crossed = crossover.crossover_chromosomes(&chromosomes, rng)?;
                if crossed.len() != config.num_outputs {
                    return Err(EvolutionError::InvariantViolation(format!(
                        "crossover produced {} chromosomes, expected {}",
                        crossed.len(),
                        config.num_outputs
                    )));
                }
                for (child, chromosome) in children.iter_mut().zip(crossed) {
                    child.push(chromosome);
                }
            } else {
                for (j, child) in children.iter_mut().enumerate() {
                    child.push(chromosomes[j % chromosomes.len()].clone());
                }
            }
        }

        for (j, chromosomes) in children.into_iter().enumerate() {
            if offspring.len() == size {
                break;
            }
            let primary = group[j % group.len()];
            let changed: usize = primary
                .representation()
                .chromosomes()
                .iter()
                .zip(&chromosomes)
                .map(|(a, b)| gene_differences(a, b))
                .sum();
            if changed == 0 {
                offspring.push(primary.clone());
            } else {
                altered_genes += changed;
                offspring.push(Individual::with_generation(
                    Genotype::new(chromosomes),
                    generation,
                ));
            }
        }
    }

    offspring.truncate(size);
    Ok(Alteration {
        population: Population::from_individuals(offspring),
        altered_genes,
    })
}

/// Fails unless every parent holds the same multiset of genes as the first
fn same_genes<C: Chromosome>(parents: &[&C]) -> EvoResult<()> {
    let Some((first, others)) = parents.split_first() else {
        return Ok(());
    };
    for other in others {
        let mut pending: Vec<&C::Gene> = first.genes().iter().collect();
        for gene in other.genes() {
            match pending.iter().position(|p| *p == gene) {
                Some(index) => {
                    pending.swap_remove(index);
                }
                None => {
                    return Err(OperatorError::CrossoverFailed(
                        "ordered crossover parents are not permutations of each other"
                            .to_string(),
                    )
                    .into())
                }
            }
        }
    }
    Ok(())
}

fn same_length<C: Chromosome>(parents: &[&C]) -> EvoResult<usize> {
    let len = parents.first().map_or(0, |p| p.len());
    match parents.iter().find(|p| p.len() != len) {
        Some(other) => Err(OperatorError::CrossoverFailed(format!(
            "chromosome lengths differ ({len} and {})",
            other.len()
        ))
        .into()),
        None => Ok(len),
    }
}

macro_rules! crossover_alterer {
    ($crossover:ty, $($bound:tt)+) => {
        impl<C> Alterer<Genotype<C>> for $crossover
        where
            C: $($bound)+,
        {
            fn alter(
                &self,
                population: Population<Genotype<C>>,
                generation: usize,
                rng: &mut dyn RngCore,
            ) -> EvoResult<Alteration<Genotype<C>>> {
                crossover_population(self, population, generation, rng)
            }
        }
    };
}

/// Single point crossover
///
/// One cut point is drawn in `0..=len` and the tails of the two parents are
/// exchanged. Always two inputs; one or two outputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinglePointCrossover {
    config: CrossoverConfig,
}

impl SinglePointCrossover {
    pub fn new(individual_rate: f64) -> Result<Self, ConfigurationError> {
        Self::with_config(CrossoverConfig::pairwise(individual_rate)?)
    }

    pub fn with_config(config: CrossoverConfig) -> Result<Self, ConfigurationError> {
        let mut errors = config.validate().err().unwrap_or_default();
        errors.ensure(config.num_inputs == 2, || {
            format!("single point crossover inputs ({}) must be 2", config.num_inputs)
        });
        errors.ensure(config.num_outputs <= 2, || {
            format!("single point crossover outputs ({}) must be at most 2", config.num_outputs)
        });
        errors.into_result()?;
        Ok(Self { config })
    }
}

impl Default for SinglePointCrossover {
    fn default() -> Self {
        Self {
            config: CrossoverConfig::default(),
        }
    }
}

impl<C: Chromosome> Crossover<C> for SinglePointCrossover {
    fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    fn crossover_chromosomes(&self, parents: &[&C], rng: &mut dyn RngCore) -> EvoResult<Vec<C>> {
        let len = same_length(parents)?;
        let (a, b) = (parents[0].genes(), parents[1].genes());
        let cut = rng.gen_range(0..=len);

        let first: Vec<_> = a[..cut].iter().chain(&b[cut..]).cloned().collect();
        let second: Vec<_> = b[..cut].iter().chain(&a[cut..]).cloned().collect();

        let mut children = vec![parents[0].with_genes(first), parents[1].with_genes(second)];
        children.truncate(self.config.num_outputs);
        Ok(children)
    }
}

crossover_alterer!(SinglePointCrossover, Chromosome);

/// Uniform crossover
///
/// Every gene of every output comes from a uniformly chosen parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UniformCrossover {
    config: CrossoverConfig,
}

impl UniformCrossover {
    pub fn new(config: CrossoverConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl<C: Chromosome> Crossover<C> for UniformCrossover {
    fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    fn crossover_chromosomes(&self, parents: &[&C], rng: &mut dyn RngCore) -> EvoResult<Vec<C>> {
        let len = same_length(parents)?;
        Ok((0..self.config.num_outputs)
            .map(|j| {
                let genes = (0..len)
                    .map(|i| parents[rng.gen_range(0..parents.len())].genes()[i].clone())
                    .collect();
                parents[j % parents.len()].with_genes(genes)
            })
            .collect())
    }
}

crossover_alterer!(UniformCrossover, Chromosome);

/// Arithmetic mean of numeric genes
///
/// Each gene is replaced with `gene_rate` by the (optionally weighted) mean
/// of the parents' genes, otherwise it keeps the first parent's value.
/// Defaults to two inputs and one output.
#[derive(Clone, Debug, PartialEq)]
pub struct MeanCrossover {
    config: CrossoverConfig,
    gene_rate: f64,
    weights: Option<Vec<f64>>,
}

impl MeanCrossover {
    pub fn new(config: CrossoverConfig, gene_rate: f64) -> Result<Self, ConfigurationError> {
        let mut errors = config.validate().err().unwrap_or_default();
        errors.ensure((0.0..=1.0).contains(&gene_rate), || {
            format!("gene rate ({gene_rate}) must be in [0, 1]")
        });
        errors.into_result()?;
        Ok(Self {
            config,
            gene_rate,
            weights: None,
        })
    }

    /// Weight the parents' values, one weight per input
    pub fn with_weights(self, weights: Vec<f64>) -> Result<Self, ConfigurationError> {
        let mut errors = ConfigurationError::empty();
        errors.ensure(weights.len() == self.config.num_inputs, || {
            format!(
                "mean crossover weights ({}) must match inputs ({})",
                weights.len(),
                self.config.num_inputs
            )
        });
        errors.ensure(weights.iter().all(|w| w.is_finite() && *w >= 0.0), || {
            format!("mean crossover weights ({weights:?}) must be finite and non-negative")
        });
        errors.ensure(weights.iter().sum::<f64>() > 0.0, || {
            "mean crossover weights must not sum to zero".to_string()
        });
        errors.into_result()?;
        Ok(Self {
            weights: Some(weights),
            ..self
        })
    }

    pub fn gene_rate(&self) -> f64 {
        self.gene_rate
    }

    fn mean(&self, values: &[f64]) -> f64 {
        match &self.weights {
            Some(weights) => {
                let total: f64 = weights.iter().sum();
                values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
            }
            None => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

impl Default for MeanCrossover {
    fn default() -> Self {
        Self {
            config: CrossoverConfig {
                num_outputs: 1,
                ..CrossoverConfig::default()
            },
            gene_rate: 1.0,
            weights: None,
        }
    }
}

impl<C> Crossover<C> for MeanCrossover
where
    C: Chromosome,
    C::Gene: NumericGene,
{
    fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    fn crossover_chromosomes(&self, parents: &[&C], rng: &mut dyn RngCore) -> EvoResult<Vec<C>> {
        let len = same_length(parents)?;
        let mut outputs = Vec::with_capacity(self.config.num_outputs);
        for _ in 0..self.config.num_outputs {
            let mut genes = Vec::with_capacity(len);
            for i in 0..len {
                let base = &parents[0].genes()[i];
                if rng.gen_bool(self.gene_rate) {
                    let values: Vec<f64> = parents.iter().map(|p| p.genes()[i].to_f64()).collect();
                    genes.push(base.from_f64(self.mean(&values)));
                } else {
                    genes.push(base.clone());
                }
            }
            outputs.push(parents[0].with_genes(genes));
        }
        Ok(outputs)
    }
}

impl<C> Alterer<Genotype<C>> for MeanCrossover
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
        crossover_population(self, population, generation, rng)
    }
}

/// Ordered crossover (OX) for permutations
///
/// Output `j` keeps a random segment of parent `j` in place and fills the
/// remaining positions with the genes of parent `(j + 1) % k` in their
/// relative order, skipping the ones already taken. Offspring are always
/// rearrangements of their parents' genes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrderedCrossover {
    config: CrossoverConfig,
}

impl OrderedCrossover {
    pub fn new(config: CrossoverConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    fn order<C: Chromosome>(
        donor: &C,
        filler: &C,
        start: usize,
        end: usize,
    ) -> EvoResult<C> {
        let donor_genes = donor.genes();
        let segment = &donor_genes[start..end];

        // Multiset difference: each segment gene cancels one occurrence
        let mut pending: Vec<&C::Gene> = segment.iter().collect();
        let mut rest = Vec::with_capacity(donor_genes.len() - segment.len());
        for gene in filler.genes() {
            match pending.iter().position(|p| *p == gene) {
                Some(index) => {
                    pending.swap_remove(index);
                }
                None => rest.push(gene.clone()),
            }
        }
        if !pending.is_empty() || rest.len() != donor_genes.len() - segment.len() {
            return Err(OperatorError::CrossoverFailed(
                "ordered crossover parents are not permutations of each other".to_string(),
            )
            .into());
        }

        let mut rest = rest.into_iter();
        let genes = (0..donor_genes.len())
            .map(|i| {
                if (start..end).contains(&i) {
                    Ok(donor_genes[i].clone())
                } else {
                    rest.next().ok_or_else(|| {
                        EvolutionError::from(OperatorError::CrossoverFailed(
                            "ordered crossover ran out of filler genes".to_string(),
                        ))
                    })
                }
            })
            .collect::<EvoResult<Vec<_>>>()?;
        Ok(donor.with_genes(genes))
    }
}

impl<C: Chromosome> Crossover<C> for OrderedCrossover {
    fn config(&self) -> &CrossoverConfig {
        &self.config
    }

    fn crossover_chromosomes(&self, parents: &[&C], rng: &mut dyn RngCore) -> EvoResult<Vec<C>> {
        let len = same_length(parents)?;
        same_genes(parents)?;
        let k = parents.len();
        (0..self.config.num_outputs)
            .map(|j| {
                let a = rng.gen_range(0..=len);
                let b = rng.gen_range(0..=len);
                Self::order(parents[j % k], parents[(j + 1) % k], a.min(b), a.max(b))
            })
            .collect()
    }
}

crossover_alterer!(OrderedCrossover, Chromosome);
