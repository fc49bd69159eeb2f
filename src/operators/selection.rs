//! Selection operators
//!
//! This module provides the tournament, roulette wheel and uniform random
//! selectors. All of them sample with replacement.

use std::cmp::Ordering;

use rand::{Rng, RngCore};

use crate::error::{ConfigurationError, EvoResult, EvolutionError, OperatorError};
use crate::genome::traits::Representation;
use crate::operators::traits::Selector;
use crate::population::population::Population;
use crate::ranking::{ranked_fitness, Ranker};

/// Shared preconditions: `Ok(false)` means "nothing to select"
fn needs_selection<R: Representation>(population: &Population<R>, count: usize) -> EvoResult<bool> {
    if count == 0 {
        return Ok(false);
    }
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    Ok(true)
}

/// Tournament selection operator
///
/// Each pick samples `sample_size` individuals uniformly and keeps the best
/// one according to the ranker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentSelector {
    sample_size: usize,
}

impl TournamentSelector {
    pub const DEFAULT_SAMPLE_SIZE: usize = 3;

    /// Create a new tournament selector with the given sample size
    pub fn new(sample_size: usize) -> Result<Self, ConfigurationError> {
        if sample_size == 0 {
            return Err(ConfigurationError::new(format!(
                "tournament sample size ({sample_size}) must be at least 1"
            )));
        }
        Ok(Self { sample_size })
    }

    /// Binary tournament (sample size 2)
    pub fn binary() -> Self {
        Self { sample_size: 2 }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl Default for TournamentSelector {
    fn default() -> Self {
        Self {
            sample_size: Self::DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl<R: Representation> Selector<R> for TournamentSelector {
    fn select(
        &self,
        population: &Population<R>,
        count: usize,
        ranker: &dyn Ranker<R>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Population<R>> {
        if !needs_selection(population, count)? {
            return Ok(Population::new());
        }

        let fitness = population
            .iter()
            .map(ranked_fitness)
            .collect::<EvoResult<Vec<_>>>()?;
        let size = population.len();

        let mut selected = Population::with_capacity(count);
        for _ in 0..count {
            let mut winner = rng.gen_range(0..size);
            for _ in 1..self.sample_size {
                let challenger = rng.gen_range(0..size);
                if ranker.compare_fitness(fitness[challenger], fitness[winner]) == Ordering::Greater {
                    winner = challenger;
                }
            }
            selected.push(population[winner].clone());
        }
        Ok(selected)
    }
}

/// Roulette wheel (fitness proportionate) selection
///
/// Weights come from [`Ranker::fitness_transform`]. Negative weights and a
/// zero total weight are reported as selection failures instead of being
/// silently shifted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouletteWheelSelector {
    sorted: bool,
}

impl RouletteWheelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort the population best first before building the wheel
    pub fn sorted() -> Self {
        Self { sorted: true }
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }
}

impl<R: Representation> Selector<R> for RouletteWheelSelector {
    fn select(
        &self,
        population: &Population<R>,
        count: usize,
        ranker: &dyn Ranker<R>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Population<R>> {
        if !needs_selection(population, count)? {
            return Ok(Population::new());
        }

        let sorted_population;
        let pool = if self.sorted {
            sorted_population = ranker.sort(population.clone())?;
            &sorted_population
        } else {
            population
        };

        let fitness = pool
            .iter()
            .map(ranked_fitness)
            .collect::<EvoResult<Vec<_>>>()?;
        let weights = ranker.fitness_transform(&fitness);

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for weight in weights {
            if weight < 0.0 || !weight.is_finite() {
                return Err(OperatorError::SelectionFailed(format!(
                    "roulette weight ({weight}) must be finite and non-negative"
                ))
                .into());
            }
            total += weight;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(OperatorError::SelectionFailed(
                "roulette wheel has zero total weight".to_string(),
            )
            .into());
        }
        if !total.is_finite() {
            return Err(OperatorError::SelectionFailed(format!(
                "roulette wheel total weight ({total}) overflows"
            ))
            .into());
        }

        let last = pool.len() - 1;
        let mut selected = Population::with_capacity(count);
        for _ in 0..count {
            let draw = rng.gen_range(0.0..total);
            let index = cumulative.partition_point(|c| *c <= draw).min(last);
            selected.push(pool[index].clone());
        }
        Ok(selected)
    }
}

/// Uniform random selection, ignores fitness
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomSelector;

impl<R: Representation> Selector<R> for RandomSelector {
    fn select(
        &self,
        population: &Population<R>,
        count: usize,
        _ranker: &dyn Ranker<R>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Population<R>> {
        if !needs_selection(population, count)? {
            return Ok(Population::new());
        }
        Ok((0..count)
            .map(|_| population[rng.gen_range(0..population.len())].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::genotype::Genotype;
    use crate::genome::numeric::{IntChromosome, IntGene};
    use crate::population::individual::Individual;
    use crate::ranking::{FitnessMaxRanker, FitnessMinRanker};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type G = Genotype<IntChromosome>;

    fn individual(id: i64, fitness: f64) -> Individual<G> {
        Individual::with_fitness(
            Genotype::single(IntChromosome::new(vec![IntGene::new(id, 0, 1000)])),
            fitness,
        )
    }

    fn id(individual: &Individual<G>) -> i64 {
        individual.representation()[0].sum()
    }

    fn population(fitness: &[f64]) -> Population<G> {
        fitness
            .iter()
            .enumerate()
            .map(|(i, f)| individual(i as i64, *f))
            .collect()
    }

    fn count_id(selected: &Population<G>, wanted: i64) -> usize {
        selected.iter().filter(|i| id(i) == wanted).count()
    }

    #[test]
    fn test_tournament_rejects_zero_sample() {
        assert!(TournamentSelector::new(0).is_err());
        assert_eq!(TournamentSelector::new(5).unwrap().sample_size(), 5);
        assert_eq!(TournamentSelector::default().sample_size(), 3);
    }

    #[test]
    fn test_selectors_honor_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop = population(&[1.0, 2.0, 3.0, 4.0]);
        let selectors: Vec<Box<dyn Selector<G>>> = vec![
            Box::new(TournamentSelector::default()),
            Box::new(RouletteWheelSelector::new()),
            Box::new(RouletteWheelSelector::sorted()),
            Box::new(RandomSelector),
        ];
        for selector in &selectors {
            for count in [0, 1, 4, 11] {
                let selected = selector.select(&pop, count, &FitnessMaxRanker, &mut rng).unwrap();
                assert_eq!(selected.len(), count, "{selector:?}");
            }
        }
    }

    #[test]
    fn test_zero_count_from_empty_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Population<G> = Population::new();
        let selected = TournamentSelector::default()
            .select(&empty, 0, &FitnessMaxRanker, &mut rng)
            .unwrap();
        assert!(selected.is_empty());

        let result = RandomSelector.select(&empty, 2, &FitnessMaxRanker, &mut rng);
        assert!(matches!(result, Err(EvolutionError::EmptyPopulation)));
    }

    #[test]
    fn test_tournament_rejects_unevaluated() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = population(&[1.0]);
        pop.push(Individual::new(Genotype::single(IntChromosome::new(vec![IntGene::new(
            9, 0, 10,
        )]))));
        let result = TournamentSelector::default().select(&pop, 3, &FitnessMaxRanker, &mut rng);
        assert!(matches!(result, Err(EvolutionError::InvariantViolation(_))));
    }

    #[test]
    fn test_tournament_favors_best() {
        let mut rng = StdRng::seed_from_u64(42);
        let pop = population(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let selected = TournamentSelector::default()
            .select(&pop, 1000, &FitnessMaxRanker, &mut rng)
            .unwrap();
        assert!(count_id(&selected, 4) > count_id(&selected, 0));

        let selected = TournamentSelector::default()
            .select(&pop, 1000, &FitnessMinRanker, &mut rng)
            .unwrap();
        assert!(count_id(&selected, 0) > count_id(&selected, 4));
    }

    #[test]
    fn test_tournament_pressure_grows_with_sample_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut fitness = vec![1.0; 9];
        fitness.push(2.0);
        let pop = population(&fitness);

        let frequencies: Vec<usize> = (1..=5)
            .map(|size| {
                let selected = TournamentSelector::new(size)
                    .unwrap()
                    .select(&pop, 20_000, &FitnessMaxRanker, &mut rng)
                    .unwrap();
                count_id(&selected, 9)
            })
            .collect();
        assert!(
            frequencies.windows(2).all(|w| w[0] < w[1]),
            "{frequencies:?}"
        );
    }

    #[test]
    fn test_roulette_total_overflow_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = population(&[1e308, 1e308]);
        let result = RouletteWheelSelector::new().select(&pop, 1, &FitnessMaxRanker, &mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::Operator(OperatorError::SelectionFailed(_)))
        ));

        let result = RouletteWheelSelector::new().select(&pop, 1, &FitnessMinRanker, &mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::Operator(OperatorError::SelectionFailed(_)))
        ));
    }

    #[test]
    fn test_roulette_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = population(&[0.0, 1.0, 0.0, 3.0]);
        let selected = RouletteWheelSelector::new()
            .select(&pop, 500, &FitnessMaxRanker, &mut rng)
            .unwrap();
        assert_eq!(count_id(&selected, 0), 0);
        assert_eq!(count_id(&selected, 2), 0);
        assert!(count_id(&selected, 3) > count_id(&selected, 1));
    }

    #[test]
    fn test_roulette_negative_weight_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = population(&[-1.0, 1.0]);
        let result = RouletteWheelSelector::new().select(&pop, 1, &FitnessMaxRanker, &mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::Operator(OperatorError::SelectionFailed(_)))
        ));
    }

    #[test]
    fn test_roulette_zero_total_fails() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = population(&[0.0, 0.0]);
        let result = RouletteWheelSelector::new().select(&pop, 1, &FitnessMaxRanker, &mut rng);
        assert!(result.is_err());

        // A single individual has weight sum - x = 0 under minimization
        let pop = population(&[4.0]);
        let result = RouletteWheelSelector::new().select(&pop, 1, &FitnessMinRanker, &mut rng);
        assert!(result.is_err());
    }
}
