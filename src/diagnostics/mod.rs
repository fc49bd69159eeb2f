//! Diagnostics and statistics
//!
//! This module provides [`EvolutionRecorder`], a listener that turns the
//! event stream of a run into a serializable [`EvolutionRecord`].

use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};

use crate::engine::listener::{EvolutionEvent, EvolutionListener, Phase};
use crate::genome::traits::Representation;
use crate::population::population::Population;

/// Timing statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent on fitness evaluation (ms)
    pub evaluation_ms: f64,
    /// Time spent on parent selection (ms)
    pub parent_selection_ms: f64,
    /// Time spent on survivor selection (ms)
    pub survivor_selection_ms: f64,
    /// Time spent on alteration (ms)
    pub alteration_ms: f64,
    /// Total generation time (ms)
    pub total_ms: f64,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// What happened during one generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationRecord<R> {
    /// Generation number reached at the end of this step
    pub generation: usize,
    /// Wall-clock time the step started
    pub started_at: SystemTime,
    pub timing: TimingStats,
    pub parents: Population<R>,
    pub survivors: Population<R>,
    pub offspring: Population<R>,
    pub altered_genes: usize,
    /// Best fitness after the step
    pub best_fitness: Option<f64>,
    /// Consecutive generations (before this one) with the same best fitness
    pub steady: usize,
}

impl<R: Representation> GenerationRecord<R> {
    fn started(generation: usize) -> Self {
        Self {
            generation,
            started_at: SystemTime::now(),
            timing: TimingStats::default(),
            parents: Population::new(),
            survivors: Population::new(),
            offspring: Population::new(),
            altered_genes: 0,
            best_fitness: None,
            steady: 0,
        }
    }
}

/// Record of an entire run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvolutionRecord<R> {
    /// Records per generation
    pub generations: Vec<GenerationRecord<R>>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl<R> Default for EvolutionRecord<R> {
    fn default() -> Self {
        Self {
            generations: Vec::new(),
            total_runtime_ms: 0.0,
            termination_reason: None,
        }
    }
}

impl<R: Representation> EvolutionRecord<R> {
    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Get the final best fitness
    pub fn final_best_fitness(&self) -> Option<f64> {
        self.generations.last().and_then(|g| g.best_fitness)
    }

    /// Get the history of best fitness values
    pub fn best_fitness_history(&self) -> Vec<Option<f64>> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Total number of altered genes over the run
    pub fn total_altered_genes(&self) -> usize {
        self.generations.iter().map(|g| g.altered_genes).sum()
    }
}

/// Listener building an [`EvolutionRecord`]
///
/// Wrap it in a [`SharedListener`](crate::engine::listener::SharedListener)
/// to read the record after the engine is done with it.
#[derive(Debug)]
pub struct EvolutionRecorder<R> {
    record: EvolutionRecord<R>,
    current: Option<GenerationRecord<R>>,
    run_started: Option<Instant>,
    generation_started: Option<Instant>,
    phase_started: Option<Instant>,
}

impl<R: Representation> EvolutionRecorder<R> {
    pub fn new() -> Self {
        Self {
            record: EvolutionRecord::default(),
            current: None,
            run_started: None,
            generation_started: None,
            phase_started: None,
        }
    }

    pub fn record(&self) -> &EvolutionRecord<R> {
        &self.record
    }

    pub fn into_record(self) -> EvolutionRecord<R> {
        self.record
    }

    fn phase_ms(&mut self) -> f64 {
        self.phase_started.take().map_or(0.0, |start| millis(start.elapsed()))
    }

    fn finish_generation(&mut self, best_fitness: Option<f64>, generation: usize) {
        let Some(mut current) = self.current.take() else {
            return;
        };
        current.generation = generation;
        current.best_fitness = best_fitness;
        current.steady = match self.record.generations.last() {
            Some(previous) if previous.best_fitness.is_some() && previous.best_fitness == best_fitness => {
                previous.steady + 1
            }
            _ => 0,
        };
        current.timing.total_ms = self
            .generation_started
            .take()
            .map_or(0.0, |start| millis(start.elapsed()));
        self.record.generations.push(current);
    }
}

impl<R: Representation> Default for EvolutionRecorder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Representation> EvolutionListener<R> for EvolutionRecorder<R> {
    fn on_event(&mut self, event: &EvolutionEvent<'_, R>) {
        if event.is_start() && !matches!(event.phase(), Phase::Evolution | Phase::Generation) {
            self.phase_started = Some(Instant::now());
        }

        match event {
            EvolutionEvent::EvolutionStarted { .. } => {
                self.record = EvolutionRecord::default();
                self.current = None;
                self.run_started = Some(Instant::now());
            }
            EvolutionEvent::EvolutionEnded { reason, .. } => {
                self.record.total_runtime_ms = self
                    .run_started
                    .take()
                    .map_or(0.0, |start| millis(start.elapsed()));
                self.record.termination_reason = Some((*reason).to_string());
            }
            EvolutionEvent::GenerationStarted { state } => {
                self.generation_started = Some(Instant::now());
                self.current = Some(GenerationRecord::started(state.generation() + 1));
            }
            EvolutionEvent::GenerationEnded { state } => {
                self.finish_generation(state.best_fitness(), state.generation());
            }
            EvolutionEvent::EvaluationEnded { .. } => {
                let elapsed = self.phase_ms();
                if let Some(current) = self.current.as_mut() {
                    current.timing.evaluation_ms += elapsed;
                }
            }
            EvolutionEvent::ParentSelectionEnded { parents, .. } => {
                let elapsed = self.phase_ms();
                if let Some(current) = self.current.as_mut() {
                    current.timing.parent_selection_ms = elapsed;
                    current.parents = (*parents).clone();
                }
            }
            EvolutionEvent::SurvivorSelectionEnded { survivors, .. } => {
                let elapsed = self.phase_ms();
                if let Some(current) = self.current.as_mut() {
                    current.timing.survivor_selection_ms = elapsed;
                    current.survivors = (*survivors).clone();
                }
            }
            EvolutionEvent::AlterationEnded {
                offspring,
                altered_genes,
                ..
            } => {
                let elapsed = self.phase_ms();
                if let Some(current) = self.current.as_mut() {
                    current.timing.alteration_ms = elapsed;
                    current.offspring = (*offspring).clone();
                    current.altered_genes = *altered_genes;
                }
            }
            EvolutionEvent::InitializationEnded { .. } => {
                self.phase_started = None;
            }
            EvolutionEvent::InitializationStarted { .. }
            | EvolutionEvent::EvaluationStarted { .. }
            | EvolutionEvent::ParentSelectionStarted { .. }
            | EvolutionEvent::SurvivorSelectionStarted { .. }
            | EvolutionEvent::AlterationStarted { .. } => {}
        }
    }
}

pub mod prelude {
    pub use super::{EvolutionRecord, EvolutionRecorder, GenerationRecord, TimingStats};
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::genome::boolean::BooleanChromosome;
    use crate::genome::genotype::Genotype;
    use crate::population::individual::Individual;
    use crate::population::state::EvolutionState;
    use crate::ranking::FitnessMaxRanker;

    type G = Genotype<BooleanChromosome>;

    fn state(generation: usize, best: f64) -> EvolutionState<G> {
        let population: Population<G> = vec![Individual::with_fitness(
            Genotype::single(BooleanChromosome::ones(2)),
            best,
        )]
        .into();
        EvolutionState::new(generation, population, Arc::new(FitnessMaxRanker))
    }

    fn run_generation(recorder: &mut EvolutionRecorder<G>, from: &EvolutionState<G>, to: &EvolutionState<G>) {
        let offspring = to.population().clone();
        recorder.on_event(&EvolutionEvent::GenerationStarted { state: from });
        recorder.on_event(&EvolutionEvent::AlterationStarted {
            state: from,
            parents: from.population(),
        });
        recorder.on_event(&EvolutionEvent::AlterationEnded {
            state: from,
            offspring: &offspring,
            altered_genes: 2,
        });
        recorder.on_event(&EvolutionEvent::GenerationEnded { state: to });
    }

    #[test]
    fn test_recorder_tracks_generations() {
        let mut recorder = EvolutionRecorder::new();
        let s0 = state(0, 1.0);
        let s1 = state(1, 1.0);
        let s2 = state(2, 1.0);
        let s3 = state(3, 2.0);

        recorder.on_event(&EvolutionEvent::EvolutionStarted { state: &s0 });
        run_generation(&mut recorder, &s0, &s1);
        run_generation(&mut recorder, &s1, &s2);
        run_generation(&mut recorder, &s2, &s3);
        recorder.on_event(&EvolutionEvent::EvolutionEnded {
            state: &s3,
            reason: "Maximum generations reached",
        });

        let record = recorder.record();
        assert_eq!(record.num_generations(), 3);
        assert_eq!(record.generations[0].generation, 1);
        assert_eq!(
            record.generations.iter().map(|g| g.steady).collect::<Vec<_>>(),
            vec![0, 1, 0]
        );
        assert_eq!(record.final_best_fitness(), Some(2.0));
        assert_eq!(record.total_altered_genes(), 6);
        assert_eq!(record.generations[0].offspring.len(), 1);
        assert_eq!(
            record.termination_reason.as_deref(),
            Some("Maximum generations reached")
        );
    }

    #[test]
    fn test_record_serializes() {
        let mut recorder = EvolutionRecorder::new();
        let s0 = state(0, 1.0);
        let s1 = state(1, 3.0);
        recorder.on_event(&EvolutionEvent::EvolutionStarted { state: &s0 });
        run_generation(&mut recorder, &s0, &s1);

        let json = serde_json::to_string(recorder.record()).unwrap();
        let back: EvolutionRecord<G> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_generations(), 1);
        assert_eq!(back.final_best_fitness(), Some(3.0));
    }
}
