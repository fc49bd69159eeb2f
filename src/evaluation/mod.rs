//! Population evaluation
//!
//! Evaluators assign fitness to every unevaluated individual of a population.
//! Individuals that already carry a fitness are passed through untouched and
//! the order of the population is preserved.

use std::fmt::Debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ConfigurationError, EvoResult, EvolutionError};
use crate::fitness::traits::Fitness;
use crate::genome::traits::Representation;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Strategy for evaluating a population
pub trait Evaluator<R: Representation>: Send + Sync + Debug {
    fn evaluate(
        &self,
        population: Population<R>,
        fitness: &dyn Fitness<R>,
    ) -> EvoResult<Population<R>>;
}

fn score<R: Representation>(
    index: usize,
    individual: Individual<R>,
    fitness: &dyn Fitness<R>,
) -> EvoResult<Individual<R>> {
    if individual.is_evaluated() {
        return Ok(individual);
    }
    let value = fitness.evaluate(individual.representation());
    if value.is_nan() {
        return Err(EvolutionError::FitnessEvaluation(format!(
            "fitness function returned NaN for individual {index}"
        )));
    }
    Ok(individual.evaluated(value))
}

/// Evaluates one individual after the other on the calling thread
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequentialEvaluator;

impl<R: Representation> Evaluator<R> for SequentialEvaluator {
    fn evaluate(
        &self,
        population: Population<R>,
        fitness: &dyn Fitness<R>,
    ) -> EvoResult<Population<R>> {
        population
            .into_iter()
            .enumerate()
            .map(|(index, individual)| score(index, individual, fitness))
            .collect()
    }
}

/// Evaluates individuals on the rayon thread pool
///
/// Each task handles at least `chunk_size` individuals. Without the
/// `parallel` feature this falls back to sequential evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConcurrentEvaluator {
    chunk_size: usize,
}

impl ConcurrentEvaluator {
    pub fn new(chunk_size: usize) -> Result<Self, ConfigurationError> {
        if chunk_size == 0 {
            return Err(ConfigurationError::new(format!(
                "evaluation chunk size ({chunk_size}) must be positive"
            )));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for ConcurrentEvaluator {
    fn default() -> Self {
        Self { chunk_size: 1 }
    }
}

#[cfg(feature = "parallel")]
impl<R: Representation> Evaluator<R> for ConcurrentEvaluator {
    fn evaluate(
        &self,
        population: Population<R>,
        fitness: &dyn Fitness<R>,
    ) -> EvoResult<Population<R>> {
        let individuals = population
            .into_individuals()
            .into_par_iter()
            .with_min_len(self.chunk_size)
            .enumerate()
            .map(|(index, individual)| score(index, individual, fitness))
            .collect::<EvoResult<Vec<_>>>()?;
        Ok(Population::from_individuals(individuals))
    }
}

#[cfg(not(feature = "parallel"))]
impl<R: Representation> Evaluator<R> for ConcurrentEvaluator {
    fn evaluate(
        &self,
        population: Population<R>,
        fitness: &dyn Fitness<R>,
    ) -> EvoResult<Population<R>> {
        SequentialEvaluator.evaluate(population, fitness)
    }
}

pub mod prelude {
    pub use super::{ConcurrentEvaluator, Evaluator, SequentialEvaluator};
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::fitness::benchmarks::OneMax;
    use crate::genome::boolean::BooleanChromosome;
    use crate::genome::genotype::Genotype;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type G = Genotype<BooleanChromosome>;

    fn population(size: usize, evaluated: bool) -> Population<G> {
        let mut rng = StdRng::seed_from_u64(17);
        (0..size)
            .map(|_| {
                let g = Genotype::single(BooleanChromosome::random(16, 0.5, &mut rng));
                if evaluated {
                    Individual::with_fitness(g, -1.0)
                } else {
                    Individual::new(g)
                }
            })
            .collect()
    }

    fn evaluators() -> Vec<Box<dyn Evaluator<G>>> {
        vec![
            Box::new(SequentialEvaluator),
            Box::new(ConcurrentEvaluator::default()),
            Box::new(ConcurrentEvaluator::new(7).unwrap()),
        ]
    }

    #[test]
    fn test_evaluates_in_order() {
        let input = population(50, false);
        let expected: Vec<f64> = input
            .iter()
            .map(|i| i.representation()[0].count_ones() as f64)
            .collect();
        for evaluator in evaluators() {
            let output = evaluator.evaluate(input.clone(), &OneMax).unwrap();
            assert!(output.all_evaluated());
            assert_eq!(output.fitness_values(), expected, "{evaluator:?}");
            assert_eq!(output, input);
        }
    }

    #[test]
    fn test_skips_evaluated() {
        let calls = AtomicUsize::new(0);
        let counting = |g: &G| {
            calls.fetch_add(1, Ordering::SeqCst);
            g.gene_count() as f64
        };
        let mut input = population(5, true);
        input.push(Individual::new(Genotype::single(BooleanChromosome::zeros(3))));

        for evaluator in evaluators() {
            calls.store(0, Ordering::SeqCst);
            let output = evaluator.evaluate(input.clone(), &counting).unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(output.fitness_values(), vec![-1.0, -1.0, -1.0, -1.0, -1.0, 3.0]);
        }
    }

    #[test]
    fn test_nan_fitness_is_error() {
        let nan = |_: &G| f64::NAN;
        for evaluator in evaluators() {
            let result = evaluator.evaluate(population(4, false), &nan);
            assert!(matches!(result, Err(EvolutionError::FitnessEvaluation(_))));
        }
    }

    #[test]
    fn test_zero_chunk_rejected() {
        assert!(ConcurrentEvaluator::new(0).is_err());
    }
}
