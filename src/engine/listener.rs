//! Evolution events and listeners
//!
//! The engine reports every phase of a run through a single event enum.
//! Listeners are called synchronously, in registration order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::genome::traits::Representation;
use crate::population::population::Population;
use crate::population::state::EvolutionState;

/// Phase of a run an event belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Evolution,
    Generation,
    Initialization,
    Evaluation,
    ParentSelection,
    SurvivorSelection,
    Alteration,
}

/// Something that happened during a run
///
/// Every event carries the state it was emitted from. `*Ended` events carry
/// the phase's output where there is one.
#[derive(Debug)]
pub enum EvolutionEvent<'a, R: Representation> {
    EvolutionStarted {
        state: &'a EvolutionState<R>,
    },
    EvolutionEnded {
        state: &'a EvolutionState<R>,
        reason: &'static str,
    },
    GenerationStarted {
        state: &'a EvolutionState<R>,
    },
    GenerationEnded {
        state: &'a EvolutionState<R>,
    },
    InitializationStarted {
        state: &'a EvolutionState<R>,
    },
    InitializationEnded {
        state: &'a EvolutionState<R>,
    },
    EvaluationStarted {
        state: &'a EvolutionState<R>,
    },
    EvaluationEnded {
        state: &'a EvolutionState<R>,
    },
    ParentSelectionStarted {
        state: &'a EvolutionState<R>,
    },
    ParentSelectionEnded {
        state: &'a EvolutionState<R>,
        parents: &'a Population<R>,
    },
    SurvivorSelectionStarted {
        state: &'a EvolutionState<R>,
    },
    SurvivorSelectionEnded {
        state: &'a EvolutionState<R>,
        survivors: &'a Population<R>,
    },
    AlterationStarted {
        state: &'a EvolutionState<R>,
        parents: &'a Population<R>,
    },
    AlterationEnded {
        state: &'a EvolutionState<R>,
        offspring: &'a Population<R>,
        altered_genes: usize,
    },
}

impl<'a, R: Representation> EvolutionEvent<'a, R> {
    /// The state the event was emitted from
    pub fn state(&self) -> &'a EvolutionState<R> {
        use EvolutionEvent::*;
        match self {
            EvolutionStarted { state }
            | EvolutionEnded { state, .. }
            | GenerationStarted { state }
            | GenerationEnded { state }
            | InitializationStarted { state }
            | InitializationEnded { state }
            | EvaluationStarted { state }
            | EvaluationEnded { state }
            | ParentSelectionStarted { state }
            | ParentSelectionEnded { state, .. }
            | SurvivorSelectionStarted { state }
            | SurvivorSelectionEnded { state, .. }
            | AlterationStarted { state, .. }
            | AlterationEnded { state, .. } => *state,
        }
    }

    pub fn phase(&self) -> Phase {
        use EvolutionEvent::*;
        match self {
            EvolutionStarted { .. } | EvolutionEnded { .. } => Phase::Evolution,
            GenerationStarted { .. } | GenerationEnded { .. } => Phase::Generation,
            InitializationStarted { .. } | InitializationEnded { .. } => Phase::Initialization,
            EvaluationStarted { .. } | EvaluationEnded { .. } => Phase::Evaluation,
            ParentSelectionStarted { .. } | ParentSelectionEnded { .. } => Phase::ParentSelection,
            SurvivorSelectionStarted { .. } | SurvivorSelectionEnded { .. } => {
                Phase::SurvivorSelection
            }
            AlterationStarted { .. } | AlterationEnded { .. } => Phase::Alteration,
        }
    }

    /// Whether this event opens its phase
    pub fn is_start(&self) -> bool {
        use EvolutionEvent::*;
        matches!(
            self,
            EvolutionStarted { .. }
                | GenerationStarted { .. }
                | InitializationStarted { .. }
                | EvaluationStarted { .. }
                | ParentSelectionStarted { .. }
                | SurvivorSelectionStarted { .. }
                | AlterationStarted { .. }
        )
    }
}

/// Observer of a run
///
/// Implemented for every `FnMut(&EvolutionEvent<R>)` closure.
pub trait EvolutionListener<R: Representation>: Send {
    fn on_event(&mut self, event: &EvolutionEvent<'_, R>);
}

impl<R, F> EvolutionListener<R> for F
where
    R: Representation,
    F: FnMut(&EvolutionEvent<'_, R>) + Send,
{
    fn on_event(&mut self, event: &EvolutionEvent<'_, R>) {
        self(event)
    }
}

/// A listener the caller keeps a handle to
///
/// The engine owns its listeners; register a clone of a `SharedListener` to
/// read the wrapped listener once the run is over.
#[derive(Debug, Default)]
pub struct SharedListener<L> {
    inner: Arc<Mutex<L>>,
}

impl<L> SharedListener<L> {
    pub fn new(listener: L) -> Self {
        Self {
            inner: Arc::new(Mutex::new(listener)),
        }
    }

    /// Access the wrapped listener
    pub fn lock(&self) -> MutexGuard<'_, L> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L> Clone for SharedListener<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, L> EvolutionListener<R> for SharedListener<L>
where
    R: Representation,
    L: EvolutionListener<R>,
{
    fn on_event(&mut self, event: &EvolutionEvent<'_, R>) {
        self.lock().on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::boolean::BooleanChromosome;
    use crate::genome::genotype::Genotype;

    type G = Genotype<BooleanChromosome>;

    #[test]
    fn test_event_accessors() {
        let state: EvolutionState<G> = EvolutionState::default();
        let parents = Population::new();

        let event = EvolutionEvent::AlterationStarted {
            state: &state,
            parents: &parents,
        };
        assert_eq!(event.phase(), Phase::Alteration);
        assert!(event.is_start());
        assert_eq!(event.state().generation(), 0);

        let event = EvolutionEvent::EvolutionEnded {
            state: &state,
            reason: "done",
        };
        assert_eq!(event.phase(), Phase::Evolution);
        assert!(!event.is_start());
    }

    #[test]
    fn test_closure_listener() {
        let state: EvolutionState<G> = EvolutionState::default();
        let mut phases = Vec::new();
        {
            let mut listener = |event: &EvolutionEvent<'_, G>| phases.push(event.phase());
            listener.on_event(&EvolutionEvent::GenerationStarted { state: &state });
            listener.on_event(&EvolutionEvent::GenerationEnded { state: &state });
        }
        assert_eq!(phases, vec![Phase::Generation, Phase::Generation]);
    }

    #[derive(Default)]
    struct Counter(usize);

    impl EvolutionListener<G> for Counter {
        fn on_event(&mut self, _event: &EvolutionEvent<'_, G>) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_shared_listener() {
        let state: EvolutionState<G> = EvolutionState::default();
        let shared = SharedListener::new(Counter::default());
        let mut registered = shared.clone();
        registered.on_event(&EvolutionEvent::EvolutionStarted { state: &state });
        registered.on_event(&EvolutionEvent::GenerationStarted { state: &state });
        assert_eq!(shared.lock().0, 2);
    }
}
