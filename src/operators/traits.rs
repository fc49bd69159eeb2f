//! Operator traits
//!
//! This module defines the two operator seams of the generational step:
//! selectors pick individuals out of a population, alterers turn a parent
//! pool into offspring.

use std::fmt::Debug;

use rand::RngCore;

use crate::error::EvoResult;
use crate::genome::traits::{Chromosome, Representation};
use crate::population::population::Population;
use crate::ranking::Ranker;

/// Selection operator
///
/// Picks exactly `count` individuals, with replacement. Selecting zero
/// individuals always succeeds, even from an empty population.
pub trait Selector<R: Representation>: Send + Sync + Debug {
    fn select(
        &self,
        population: &Population<R>,
        count: usize,
        ranker: &dyn Ranker<R>,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Population<R>>;
}

/// Output of an alterer
#[derive(Clone, Debug, PartialEq)]
pub struct Alteration<R> {
    /// The altered population, same size as the input
    pub population: Population<R>,
    /// Number of genes that changed
    pub altered_genes: usize,
}

impl<R: Representation> Alteration<R> {
    /// An alteration that changed nothing
    pub fn unchanged(population: Population<R>) -> Self {
        Self {
            population,
            altered_genes: 0,
        }
    }
}

/// Alteration operator (mutation, crossover, or a chain of them)
///
/// Individuals whose representation changes come out unevaluated and born in
/// `generation`; the others pass through untouched, fitness included.
pub trait Alterer<R: Representation>: Send + Sync + Debug {
    fn alter(
        &self,
        population: Population<R>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Alteration<R>>;
}

/// Alterers applied one after the other
///
/// The output of each alterer is the input of the next; altered gene counts
/// are summed.
#[derive(Debug)]
pub struct AltererChain<R: Representation> {
    alterers: Vec<Box<dyn Alterer<R>>>,
}

impl<R: Representation> AltererChain<R> {
    pub fn new(alterers: Vec<Box<dyn Alterer<R>>>) -> Self {
        Self { alterers }
    }

    /// Append an alterer to the chain
    pub fn then<A: Alterer<R> + 'static>(mut self, alterer: A) -> Self {
        self.alterers.push(Box::new(alterer));
        self
    }

    pub fn len(&self) -> usize {
        self.alterers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alterers.is_empty()
    }
}

impl<R: Representation> Default for AltererChain<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Representation> Alterer<R> for AltererChain<R> {
    fn alter(
        &self,
        population: Population<R>,
        generation: usize,
        rng: &mut dyn RngCore,
    ) -> EvoResult<Alteration<R>> {
        let mut current = Alteration::unchanged(population);
        for alterer in &self.alterers {
            let next = alterer.alter(current.population, generation, rng)?;
            current = Alteration {
                population: next.population,
                altered_genes: current.altered_genes + next.altered_genes,
            };
        }
        Ok(current)
    }
}

/// Number of gene positions in which two chromosomes differ
///
/// Positions present in only one of them count as differences.
pub(crate) fn gene_differences<C: Chromosome>(a: &C, b: &C) -> usize {
    let common = a
        .genes()
        .iter()
        .zip(b.genes())
        .filter(|(x, y)| x != y)
        .count();
    common + a.len().abs_diff(b.len())
}
