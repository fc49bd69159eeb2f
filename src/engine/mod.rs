//! Evolution engine
//!
//! The engine drives a population through generations:
//!
//! 1. an empty population is filled from the genotype factory;
//! 2. unevaluated individuals are evaluated;
//! 3. a parent pool and a set of survivors are selected from the population;
//! 4. the alterers turn the parent pool into offspring;
//! 5. survivors and offspring are merged back to the configured size and
//!    evaluated, and the generation counter advances;
//! 6. the limits decide whether to go on.

pub mod config;
pub mod listener;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::error::{EvoResult, EvolutionError};
use crate::evaluation::Evaluator;
use crate::fitness::traits::{Fitness, GenotypeFactory};
use crate::genome::traits::Representation;
use crate::operators::traits::{Alterer, AltererChain, Selector};
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::population::state::EvolutionState;
use crate::ranking::{FitnessMinRanker, Ranker};
use crate::termination::Limit;

pub use config::EngineConfig;
pub use listener::{EvolutionEvent, EvolutionListener, Phase, SharedListener};

/// Generational genetic algorithm
pub struct Engine<R: Representation> {
    fitness: Box<dyn Fitness<R>>,
    factory: Box<dyn GenotypeFactory<R>>,
    population_size: usize,
    survivor_count: usize,
    offspring_count: usize,
    parent_selector: Box<dyn Selector<R>>,
    survivor_selector: Box<dyn Selector<R>>,
    alterer: AltererChain<R>,
    limits: Vec<Box<dyn Limit<R>>>,
    ranker: Arc<dyn Ranker<R>>,
    listeners: Vec<Box<dyn EvolutionListener<R>>>,
    evaluator: Box<dyn Evaluator<R>>,
    rng: Box<dyn RngCore + Send>,
}

impl<R: Representation> Engine<R> {
    /// Create an engine from a validated configuration
    pub fn new<F, G>(fitness: F, factory: G, config: EngineConfig<R>) -> EvoResult<Self>
    where
        F: Fitness<R> + 'static,
        G: GenotypeFactory<R> + 'static,
    {
        Self::assemble(Box::new(fitness), Box::new(factory), config)
    }

    fn assemble(
        fitness: Box<dyn Fitness<R>>,
        factory: Box<dyn GenotypeFactory<R>>,
        config: EngineConfig<R>,
    ) -> EvoResult<Self> {
        config.validate()?;
        if config.limits.is_empty() {
            warn!("engine configured without limits; evolve() will not return on its own");
        }

        let survivor_count = config.survivor_count();
        let offspring_count = config.offspring_count();
        let EngineConfig {
            population_size,
            parent_selector,
            survivor_selector,
            alterers,
            limits,
            ranker,
            listeners,
            evaluator,
            rng,
            ..
        } = config;

        Ok(Self {
            fitness,
            factory,
            population_size,
            survivor_count,
            offspring_count,
            parent_selector,
            survivor_selector,
            alterer: AltererChain::new(alterers),
            limits,
            ranker,
            listeners,
            evaluator,
            rng,
        })
    }

    /// Create a builder with default configuration
    pub fn builder<F, G>(fitness: F, factory: G) -> EngineBuilder<R>
    where
        F: Fitness<R> + 'static,
        G: GenotypeFactory<R> + 'static,
    {
        EngineBuilder {
            fitness: Box::new(fitness),
            factory: Box::new(factory),
            config: EngineConfig::default(),
        }
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn survivor_count(&self) -> usize {
        self.survivor_count
    }

    pub fn offspring_count(&self) -> usize {
        self.offspring_count
    }

    pub fn ranker(&self) -> &Arc<dyn Ranker<R>> {
        &self.ranker
    }

    /// Run from an empty population until a limit fires
    pub fn evolve(&mut self) -> EvoResult<EvolutionState<R>> {
        let state = EvolutionState::empty(Arc::clone(&self.ranker));
        self.evolve_from(state)
    }

    /// Run from `state` until a limit fires
    ///
    /// The state is re-ranked with the engine's ranker. The returned state
    /// is fully evaluated.
    pub fn evolve_from(&mut self, state: EvolutionState<R>) -> EvoResult<EvolutionState<R>> {
        let mut state = state.with_ranker(Arc::clone(&self.ranker));
        for limit in &mut self.limits {
            limit.reset();
        }

        info!(
            population_size = self.population_size,
            survivors = self.survivor_count,
            offspring = self.offspring_count,
            generation = state.generation(),
            "evolution started"
        );
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::EvolutionStarted { state: &state },
        );

        loop {
            state = self.step(state)?;
            if let Some(reason) = self.check_limits(&state)? {
                info!(
                    generation = state.generation(),
                    best_fitness = ?state.best_fitness(),
                    reason,
                    "evolution finished"
                );
                Self::notify(
                    &mut self.listeners,
                    &EvolutionEvent::EvolutionEnded {
                        state: &state,
                        reason,
                    },
                );
                return Ok(state);
            }
        }
    }

    /// One generational step
    fn step(&mut self, state: EvolutionState<R>) -> EvoResult<EvolutionState<R>> {
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::GenerationStarted { state: &state },
        );

        let mut state = state;
        if state.population().is_empty() {
            state = self.initialize(state);
        }
        if !state.population().all_evaluated() {
            state = self.evaluate(state)?;
        }

        trace!(count = self.offspring_count, "selecting parents");
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::ParentSelectionStarted { state: &state },
        );
        let parents = self.parent_selector.select(
            state.population(),
            self.offspring_count,
            self.ranker.as_ref(),
            self.rng.as_mut(),
        )?;
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::ParentSelectionEnded {
                state: &state,
                parents: &parents,
            },
        );

        trace!(count = self.survivor_count, "selecting survivors");
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::SurvivorSelectionStarted { state: &state },
        );
        let survivors = self.survivor_selector.select(
            state.population(),
            self.survivor_count,
            self.ranker.as_ref(),
            self.rng.as_mut(),
        )?;
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::SurvivorSelectionEnded {
                state: &state,
                survivors: &survivors,
            },
        );

        trace!(parents = parents.len(), "altering parents");
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::AlterationStarted {
                state: &state,
                parents: &parents,
            },
        );
        let alteration = self
            .alterer
            .alter(parents, state.generation(), self.rng.as_mut())?;
        if alteration.population.len() != self.offspring_count {
            return Err(EvolutionError::InvariantViolation(format!(
                "alterers produced {} offspring, expected {}",
                alteration.population.len(),
                self.offspring_count
            )));
        }
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::AlterationEnded {
                state: &state,
                offspring: &alteration.population,
                altered_genes: alteration.altered_genes,
            },
        );

        let merged = survivors.concat(alteration.population);
        if merged.len() != self.population_size {
            return Err(EvolutionError::InvariantViolation(format!(
                "population size drifted to {}, expected {}",
                merged.len(),
                self.population_size
            )));
        }

        let state = self.evaluate(state.with_population(merged))?.next_generation();
        debug!(
            generation = state.generation(),
            best_fitness = ?state.best_fitness(),
            altered_genes = alteration.altered_genes,
            "generation complete"
        );
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::GenerationEnded { state: &state },
        );
        Ok(state)
    }

    fn initialize(&mut self, state: EvolutionState<R>) -> EvolutionState<R> {
        trace!(count = self.population_size, "creating initial population");
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::InitializationStarted { state: &state },
        );
        let population: Population<R> = (0..self.population_size)
            .map(|_| {
                Individual::with_generation(
                    self.factory.create(self.rng.as_mut()),
                    state.generation(),
                )
            })
            .collect();
        let state = state.with_population(population);
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::InitializationEnded { state: &state },
        );
        state
    }

    fn evaluate(&mut self, state: EvolutionState<R>) -> EvoResult<EvolutionState<R>> {
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::EvaluationStarted { state: &state },
        );
        let generation = state.generation();
        let ranker = Arc::clone(state.ranker());
        let population = self
            .evaluator
            .evaluate(state.into_population(), self.fitness.as_ref())?;
        let state = EvolutionState::new(generation, population, ranker);
        Self::notify(
            &mut self.listeners,
            &EvolutionEvent::EvaluationEnded { state: &state },
        );
        Ok(state)
    }

    /// Every limit sees every completed generation; the first one that fires
    /// names the reason
    fn check_limits(&mut self, state: &EvolutionState<R>) -> EvoResult<Option<&'static str>> {
        let mut reason = None;
        for limit in &mut self.limits {
            if limit.should_stop(state)? && reason.is_none() {
                reason = Some(limit.reason());
            }
        }
        Ok(reason)
    }

    fn notify(listeners: &mut [Box<dyn EvolutionListener<R>>], event: &EvolutionEvent<'_, R>) {
        for listener in listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}

/// Fluent construction of an [`Engine`]
pub struct EngineBuilder<R: Representation> {
    fitness: Box<dyn Fitness<R>>,
    factory: Box<dyn GenotypeFactory<R>>,
    config: EngineConfig<R>,
}

impl<R: Representation> EngineBuilder<R> {
    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the fraction of the population kept as survivors
    pub fn survival_rate(mut self, rate: f64) -> Self {
        self.config.survival_rate = rate;
        self
    }

    pub fn parent_selector<S: Selector<R> + 'static>(mut self, selector: S) -> Self {
        self.config.parent_selector = Box::new(selector);
        self
    }

    pub fn survivor_selector<S: Selector<R> + 'static>(mut self, selector: S) -> Self {
        self.config.survivor_selector = Box::new(selector);
        self
    }

    /// Use the same selector for parents and survivors
    pub fn selector<S: Selector<R> + Clone + 'static>(self, selector: S) -> Self {
        self.parent_selector(selector.clone())
            .survivor_selector(selector)
    }

    /// Append an alterer
    pub fn alterer<A: Alterer<R> + 'static>(mut self, alterer: A) -> Self {
        self.config.alterers.push(Box::new(alterer));
        self
    }

    /// Add a limit
    pub fn limit<L: Limit<R> + 'static>(mut self, limit: L) -> Self {
        self.config.limits.push(Box::new(limit));
        self
    }

    pub fn ranker<K: Ranker<R> + 'static>(mut self, ranker: K) -> Self {
        self.config.ranker = Arc::new(ranker);
        self
    }

    /// Lower fitness is better
    pub fn minimizing(self) -> Self {
        self.ranker(FitnessMinRanker)
    }

    /// Register a listener
    pub fn listener<L: EvolutionListener<R> + 'static>(mut self, listener: L) -> Self {
        self.config.listeners.push(Box::new(listener));
        self
    }

    pub fn evaluator<E: Evaluator<R> + 'static>(mut self, evaluator: E) -> Self {
        self.config.evaluator = Box::new(evaluator);
        self
    }

    /// Use `rng` as the source of randomness
    pub fn rng<G: RngCore + Send + 'static>(mut self, rng: G) -> Self {
        self.config.rng = Box::new(rng);
        self
    }

    /// Seed the default random number generator
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> EvoResult<Engine<R>> {
        Engine::assemble(self.fitness, self.factory, self.config)
    }
}

pub mod prelude {
    pub use super::config::EngineConfig;
    pub use super::listener::*;
    pub use super::{Engine, EngineBuilder};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::benchmarks::OneMax;
    use crate::genome::boolean::BooleanChromosome;
    use crate::genome::genotype::Genotype;
    use crate::operators::crossover::SinglePointCrossover;
    use crate::operators::mutation::BitFlipMutator;
    use crate::termination::MaxGenerations;

    type G = Genotype<BooleanChromosome>;

    fn factory(rng: &mut dyn RngCore) -> G {
        Genotype::single(BooleanChromosome::random(12, 0.5, rng))
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Engine::builder(OneMax, factory)
            .population_size(0)
            .survival_rate(-1.0)
            .build();
        match result {
            Err(EvolutionError::Configuration(_)) => {}
            other => panic!("expected configuration error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_builder_split() {
        let engine = Engine::builder(OneMax, factory)
            .population_size(10)
            .survival_rate(0.3)
            .limit(MaxGenerations::new(1).unwrap())
            .build()
            .unwrap();
        assert_eq!(engine.survivor_count(), 3);
        assert_eq!(engine.offspring_count(), 7);
    }

    #[test]
    fn test_single_generation() {
        let mut engine = Engine::builder(OneMax, factory)
            .population_size(20)
            .alterer(SinglePointCrossover::default())
            .alterer(BitFlipMutator::default())
            .limit(MaxGenerations::new(1).unwrap())
            .seed(7)
            .build()
            .unwrap();
        let state = engine.evolve().unwrap();
        assert_eq!(state.generation(), 1);
        assert_eq!(state.population().len(), 20);
        assert!(state.population().all_evaluated());
    }

    #[test]
    fn test_listener_sees_phases_in_order() {
        let phases = SharedListener::new(Vec::<(Phase, bool)>::new());
        let recorder = {
            let phases = phases.clone();
            move |event: &EvolutionEvent<'_, G>| {
                phases.lock().push((event.phase(), event.is_start()));
            }
        };
        let mut engine = Engine::builder(OneMax, factory)
            .population_size(6)
            .listener(recorder)
            .limit(MaxGenerations::new(1).unwrap())
            .seed(3)
            .build()
            .unwrap();
        engine.evolve().unwrap();

        let phases = phases.lock().clone();
        assert_eq!(
            phases,
            vec![
                (Phase::Evolution, true),
                (Phase::Generation, true),
                (Phase::Initialization, true),
                (Phase::Initialization, false),
                (Phase::Evaluation, true),
                (Phase::Evaluation, false),
                (Phase::ParentSelection, true),
                (Phase::ParentSelection, false),
                (Phase::SurvivorSelection, true),
                (Phase::SurvivorSelection, false),
                (Phase::Alteration, true),
                (Phase::Alteration, false),
                (Phase::Evaluation, true),
                (Phase::Evaluation, false),
                (Phase::Generation, false),
                (Phase::Evolution, false),
            ]
        );
    }
}
