//! # helix-evo
//!
//! A generic genetic algorithm engine for Rust.
//!
//! The engine evolves a fixed-size population of candidate solutions. Every
//! generation it keeps a share of the population as survivors, breeds the
//! rest from a selected parent pool, evaluates the result and asks its limits
//! whether to stop.
//!
//! ## Core Concepts
//!
//! - **Representations**: anything that can be validated and flattened; the
//!   bundled [`Genotype`](genome::genotype::Genotype) holds one or more
//!   chromosomes of boolean, integer, floating point or permutation genes
//! - **Pluggable strategies**: selectors, alterers, rankers, evaluators and
//!   limits are all trait objects chosen at construction time
//! - **Observability**: every phase of a run is reported to listeners, and
//!   [`EvolutionRecorder`](diagnostics::EvolutionRecorder) turns them into a
//!   serializable record
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use helix_evo::prelude::*;
//! use rand::RngCore;
//!
//! let mut engine = Engine::builder(OneMax, |rng: &mut dyn RngCore| {
//!     Genotype::single(BooleanChromosome::random(64, 0.5, rng))
//! })
//! .population_size(100)
//! .alterer(SinglePointCrossover::new(0.8)?)
//! .alterer(BitFlipMutator::new(MutationRates::with_gene_rate(0.02)?)?)
//! .limit(TargetFitness::new(64.0)?)
//! .limit(MaxGenerations::new(500)?)
//! .seed(42)
//! .build()?;
//!
//! let state = engine.evolve()?;
//! println!("best: {:?}", state.best_fitness());
//! ```

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fitness;
pub mod genome;
pub mod operators;
pub mod population;
pub mod ranking;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::diagnostics::prelude::*;
    pub use crate::engine::prelude::*;
    pub use crate::error::*;
    pub use crate::evaluation::prelude::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::ranking::prelude::*;
    pub use crate::termination::prelude::*;
}
