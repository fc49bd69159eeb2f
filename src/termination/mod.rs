//! Termination criteria
//!
//! Limits decide, once per completed generation, whether a run is over. The
//! engine stops as soon as any of its limits fires.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigurationError, EvoResult};
use crate::genome::traits::Representation;
use crate::population::state::EvolutionState;

/// Termination criterion
///
/// Limits may keep state between generations (see [`SteadyGenerations`]);
/// [`reset`](Limit::reset) clears it before a new run.
pub trait Limit<R: Representation>: Send + fmt::Debug {
    /// Check if evolution should stop after reaching `state`
    fn should_stop(&mut self, state: &EvolutionState<R>) -> EvoResult<bool>;

    /// Forget everything recorded during a previous run
    fn reset(&mut self) {}

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str;
}

/// Terminate after a maximum number of generations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxGenerations(usize);

impl MaxGenerations {
    pub fn new(max: usize) -> Result<Self, ConfigurationError> {
        if max == 0 {
            return Err(ConfigurationError::new(format!(
                "max generations ({max}) must be positive"
            )));
        }
        Ok(Self(max))
    }

    pub fn max(&self) -> usize {
        self.0
    }
}

impl<R: Representation> Limit<R> for MaxGenerations {
    fn should_stop(&mut self, state: &EvolutionState<R>) -> EvoResult<bool> {
        Ok(state.generation() >= self.0)
    }

    fn reason(&self) -> &'static str {
        "Maximum generations reached"
    }
}

#[derive(Clone)]
enum Target {
    Exact(f64),
    AtLeast(f64),
    AtMost(f64),
    Matching(Arc<dyn Fn(f64) -> bool + Send + Sync>),
}

impl Target {
    fn matches(&self, fitness: f64) -> bool {
        match self {
            Target::Exact(target) => fitness == *target,
            Target::AtLeast(target) => fitness >= *target,
            Target::AtMost(target) => fitness <= *target,
            Target::Matching(predicate) => predicate(fitness),
        }
    }
}

/// Terminate when any individual reaches a target fitness
#[derive(Clone)]
pub struct TargetFitness {
    target: Target,
}

impl TargetFitness {
    fn checked(target: f64, make: fn(f64) -> Target) -> Result<Self, ConfigurationError> {
        if !target.is_finite() {
            return Err(ConfigurationError::new(format!(
                "target fitness ({target}) must be finite"
            )));
        }
        Ok(Self {
            target: make(target),
        })
    }

    /// Fires on a fitness equal to `target`
    pub fn new(target: f64) -> Result<Self, ConfigurationError> {
        Self::checked(target, Target::Exact)
    }

    /// Fires on a fitness of at least `target`
    pub fn at_least(target: f64) -> Result<Self, ConfigurationError> {
        Self::checked(target, Target::AtLeast)
    }

    /// Fires on a fitness of at most `target`
    pub fn at_most(target: f64) -> Result<Self, ConfigurationError> {
        Self::checked(target, Target::AtMost)
    }

    /// Fires on a fitness accepted by `predicate`
    pub fn matching<P>(predicate: P) -> Self
    where
        P: Fn(f64) -> bool + Send + Sync + 'static,
    {
        Self {
            target: Target::Matching(Arc::new(predicate)),
        }
    }
}

impl fmt::Debug for TargetFitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Exact(t) => write!(f, "TargetFitness(== {t})"),
            Target::AtLeast(t) => write!(f, "TargetFitness(>= {t})"),
            Target::AtMost(t) => write!(f, "TargetFitness(<= {t})"),
            Target::Matching(_) => write!(f, "TargetFitness(<predicate>)"),
        }
    }
}

impl<R: Representation> Limit<R> for TargetFitness {
    fn should_stop(&mut self, state: &EvolutionState<R>) -> EvoResult<bool> {
        Ok(state
            .population()
            .iter()
            .filter_map(|individual| individual.fitness())
            .any(|fitness| self.target.matches(fitness)))
    }

    fn reason(&self) -> &'static str {
        "Target fitness reached"
    }
}

/// Terminate when the best fitness stops changing
///
/// At each generation boundary the best fitness is compared with the one of
/// the previous boundary: equal values increment a counter, anything else
/// resets it. The limit fires once the counter reaches `generations`. With
/// a constant fitness, a run therefore stops at generation `generations + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct SteadyGenerations {
    generations: usize,
    previous: Option<f64>,
    steady: usize,
}

impl SteadyGenerations {
    pub fn new(generations: usize) -> Result<Self, ConfigurationError> {
        if generations == 0 {
            return Err(ConfigurationError::new(format!(
                "steady generations ({generations}) must be positive"
            )));
        }
        Ok(Self {
            generations,
            previous: None,
            steady: 0,
        })
    }

    /// Consecutive generations without a change of the best fitness so far
    pub fn steady(&self) -> usize {
        self.steady
    }
}

impl<R: Representation> Limit<R> for SteadyGenerations {
    fn should_stop(&mut self, state: &EvolutionState<R>) -> EvoResult<bool> {
        let best = state.best_fitness();
        match (self.previous, best) {
            (Some(previous), Some(current)) if previous == current => self.steady += 1,
            _ => self.steady = 0,
        }
        self.previous = best;
        Ok(self.steady >= self.generations)
    }

    fn reset(&mut self) {
        self.previous = None;
        self.steady = 0;
    }

    fn reason(&self) -> &'static str {
        "Best fitness steady"
    }
}

pub mod prelude {
    pub use super::{Limit, MaxGenerations, SteadyGenerations, TargetFitness};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::genotype::Genotype;
    use crate::genome::numeric::{IntChromosome, IntGene};
    use crate::population::individual::Individual;
    use crate::population::population::Population;
    use crate::ranking::FitnessMaxRanker;

    type G = Genotype<IntChromosome>;

    fn create_test_state(generation: usize, fitness: &[f64]) -> EvolutionState<G> {
        let population: Population<G> = fitness
            .iter()
            .map(|f| {
                Individual::with_fitness(
                    Genotype::single(IntChromosome::new(vec![IntGene::new(0, 0, 1)])),
                    *f,
                )
            })
            .collect();
        EvolutionState::new(generation, population, Arc::new(FitnessMaxRanker))
    }

    #[test]
    fn test_max_generations() {
        let mut criterion = MaxGenerations::new(100).unwrap();
        assert!(!criterion.should_stop(&create_test_state(50, &[1.0])).unwrap());
        assert!(criterion.should_stop(&create_test_state(100, &[1.0])).unwrap());
        assert!(criterion.should_stop(&create_test_state(150, &[1.0])).unwrap());
        assert!(MaxGenerations::new(0).is_err());
    }

    #[test]
    fn test_target_fitness() {
        let state = create_test_state(0, &[1.0, 5.0, 3.0]);

        assert!(TargetFitness::new(5.0).unwrap().should_stop(&state).unwrap());
        assert!(!TargetFitness::new(4.0).unwrap().should_stop(&state).unwrap());
        assert!(TargetFitness::at_least(4.0).unwrap().should_stop(&state).unwrap());
        assert!(!TargetFitness::at_least(6.0).unwrap().should_stop(&state).unwrap());
        assert!(TargetFitness::at_most(1.0).unwrap().should_stop(&state).unwrap());
        assert!(TargetFitness::matching(|f| f > 2.0 && f < 4.0)
            .should_stop(&state)
            .unwrap());
    }

    #[test]
    fn test_target_fitness_rejects_non_finite() {
        assert!(TargetFitness::new(f64::NAN).is_err());
        assert!(TargetFitness::at_least(f64::INFINITY).is_err());
    }

    #[test]
    fn test_steady_generations() {
        let mut criterion = SteadyGenerations::new(2).unwrap();
        assert!(!criterion.should_stop(&create_test_state(1, &[1.0])).unwrap());
        assert_eq!(criterion.steady(), 0);
        assert!(!criterion.should_stop(&create_test_state(2, &[1.0])).unwrap());
        assert_eq!(criterion.steady(), 1);

        // Improvement resets the counter
        assert!(!criterion.should_stop(&create_test_state(3, &[2.0])).unwrap());
        assert_eq!(criterion.steady(), 0);

        assert!(!criterion.should_stop(&create_test_state(4, &[2.0])).unwrap());
        assert!(criterion.should_stop(&create_test_state(5, &[2.0, 0.5])).unwrap());

        Limit::<G>::reset(&mut criterion);
        assert_eq!(criterion.steady(), 0);
        assert!(!criterion.should_stop(&create_test_state(6, &[2.0])).unwrap());
    }

    #[test]
    fn test_steady_generations_rejects_zero() {
        assert!(SteadyGenerations::new(0).is_err());
    }
}
