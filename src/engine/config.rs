//! Engine configuration
//!
//! [`EngineConfig`] gathers every pluggable strategy of a run. It is checked
//! in a single pass that reports all violations at once.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::engine::listener::EvolutionListener;
use crate::error::ConfigurationError;
use crate::evaluation::{Evaluator, SequentialEvaluator};
use crate::genome::traits::Representation;
use crate::operators::selection::TournamentSelector;
use crate::operators::traits::{Alterer, Selector};
use crate::ranking::{FitnessMaxRanker, Ranker};
use crate::termination::Limit;

/// Configuration for the [`Engine`](crate::engine::Engine)
pub struct EngineConfig<R: Representation> {
    /// Population size, restored after every generation
    pub population_size: usize,
    /// Fraction of the population selected as survivors
    pub survival_rate: f64,
    /// Selects the parent pool handed to the alterers
    pub parent_selector: Box<dyn Selector<R>>,
    /// Selects the survivors carried over unchanged
    pub survivor_selector: Box<dyn Selector<R>>,
    /// Applied in order to the parent pool
    pub alterers: Vec<Box<dyn Alterer<R>>>,
    /// The run stops as soon as one of these fires
    pub limits: Vec<Box<dyn Limit<R>>>,
    pub ranker: Arc<dyn Ranker<R>>,
    pub listeners: Vec<Box<dyn EvolutionListener<R>>>,
    pub evaluator: Box<dyn Evaluator<R>>,
    /// The only source of randomness of the run
    pub rng: Box<dyn RngCore + Send>,
}

impl<R: Representation> Default for EngineConfig<R> {
    fn default() -> Self {
        Self {
            population_size: 50,
            survival_rate: 0.4,
            parent_selector: Box::new(TournamentSelector::default()),
            survivor_selector: Box::new(TournamentSelector::default()),
            alterers: Vec::new(),
            limits: Vec::new(),
            ranker: Arc::new(FitnessMaxRanker),
            listeners: Vec::new(),
            evaluator: Box::new(SequentialEvaluator),
            rng: Box::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Representation> EngineConfig<R> {
    /// Number of survivors per generation
    pub fn survivor_count(&self) -> usize {
        (self.population_size as f64 * self.survival_rate).round() as usize
    }

    /// Number of offspring per generation
    pub fn offspring_count(&self) -> usize {
        self.population_size.saturating_sub(self.survivor_count())
    }

    /// Check the configuration, collecting every violation
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut errors = ConfigurationError::empty();
        errors.ensure(self.population_size > 0, || {
            format!("population size ({}) must be positive", self.population_size)
        });
        errors.ensure(
            self.survival_rate.is_finite() && (0.0..=1.0).contains(&self.survival_rate),
            || format!("survival rate ({}) must be in [0, 1]", self.survival_rate),
        );
        errors.into_result()
    }
}

impl<R: Representation> fmt::Debug for EngineConfig<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("population_size", &self.population_size)
            .field("survival_rate", &self.survival_rate)
            .field("parent_selector", &self.parent_selector)
            .field("survivor_selector", &self.survivor_selector)
            .field("alterers", &self.alterers)
            .field("limits", &self.limits)
            .field("ranker", &self.ranker)
            .field("listeners", &self.listeners.len())
            .field("evaluator", &self.evaluator)
            .finish_non_exhaustive()
    }
}
