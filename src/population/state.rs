//! Evolution state
//!
//! Snapshot of a run between two generational steps.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::genome::traits::Representation;
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::ranking::{FitnessMaxRanker, Ranker};

/// Generation counter, population and the ranker that orders it
///
/// States are never mutated in place; every step derives a new one.
#[derive(Clone, Debug)]
pub struct EvolutionState<R: Representation> {
    generation: usize,
    population: Population<R>,
    ranker: Arc<dyn Ranker<R>>,
}

impl<R: Representation> EvolutionState<R> {
    /// The initial state: generation 0, empty population
    pub fn empty(ranker: Arc<dyn Ranker<R>>) -> Self {
        Self::new(0, Population::new(), ranker)
    }

    /// Create a state from its parts
    pub fn new(generation: usize, population: Population<R>, ranker: Arc<dyn Ranker<R>>) -> Self {
        Self {
            generation,
            population,
            ranker,
        }
    }

    /// Current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population
    pub fn population(&self) -> &Population<R> {
        &self.population
    }

    /// Ranker ordering the population
    pub fn ranker(&self) -> &Arc<dyn Ranker<R>> {
        &self.ranker
    }

    /// Take the population out of the state
    pub fn into_population(self) -> Population<R> {
        self.population
    }

    pub fn with_generation(self, generation: usize) -> Self {
        Self { generation, ..self }
    }

    pub fn with_population(self, population: Population<R>) -> Self {
        Self { population, ..self }
    }

    pub fn with_ranker(self, ranker: Arc<dyn Ranker<R>>) -> Self {
        Self { ranker, ..self }
    }

    /// The same population one generation later
    pub fn next_generation(self) -> Self {
        let generation = self.generation + 1;
        self.with_generation(generation)
    }

    /// Best evaluated individual according to the ranker
    ///
    /// Unevaluated and NaN-fitness individuals are ignored. Among equally
    /// ranked individuals the first one wins.
    pub fn best(&self) -> Option<&Individual<R>> {
        let mut best: Option<(&Individual<R>, f64)> = None;
        for individual in self.population.iter() {
            let Some(fitness) = individual.fitness().filter(|f| !f.is_nan()) else {
                continue;
            };
            match best {
                Some((_, best_fitness))
                    if self.ranker.compare_fitness(fitness, best_fitness) != Ordering::Greater => {}
                _ => best = Some((individual, fitness)),
            }
        }
        best.map(|(individual, _)| individual)
    }

    /// Fitness of [`best`](Self::best)
    pub fn best_fitness(&self) -> Option<f64> {
        self.best().and_then(Individual::fitness)
    }
}

impl<R: Representation> Default for EvolutionState<R> {
    fn default() -> Self {
        Self::empty(Arc::new(FitnessMaxRanker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::genotype::Genotype;
    use crate::genome::numeric::{IntChromosome, IntGene};
    use crate::ranking::FitnessMinRanker;

    type G = Genotype<IntChromosome>;

    fn individual(v: i64, fitness: Option<f64>) -> Individual<G> {
        let g = Genotype::single(IntChromosome::new(vec![IntGene::new(v, 0, 10)]));
        match fitness {
            Some(f) => Individual::with_fitness(g, f),
            None => Individual::new(g),
        }
    }

    fn population() -> Population<G> {
        vec![
            individual(1, Some(4.0)),
            individual(2, None),
            individual(3, Some(9.0)),
            individual(4, Some(f64::NAN)),
            individual(5, Some(2.0)),
        ]
        .into()
    }

    #[test]
    fn test_empty_state() {
        let state: EvolutionState<G> = EvolutionState::default();
        assert_eq!(state.generation(), 0);
        assert!(state.population().is_empty());
        assert!(state.best().is_none());
    }

    #[test]
    fn test_next_generation() {
        let state: EvolutionState<G> = EvolutionState::default().with_generation(4);
        let next = state.next_generation();
        assert_eq!(next.generation(), 5);
    }

    #[test]
    fn test_best_uses_ranker() {
        let state = EvolutionState::new(0, population(), Arc::new(FitnessMaxRanker));
        assert_eq!(state.best_fitness(), Some(9.0));

        let state = state.with_ranker(Arc::new(FitnessMinRanker));
        assert_eq!(state.best_fitness(), Some(2.0));
    }

    #[test]
    fn test_best_first_of_ties() {
        let population: Population<G> =
            vec![individual(1, Some(1.0)), individual(2, Some(1.0))].into();
        let state = EvolutionState::new(0, population, Arc::new(FitnessMaxRanker));
        let best = state.best().unwrap();
        assert_eq!(best.representation()[0].sum(), 1);
    }
}
