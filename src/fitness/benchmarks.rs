//! Benchmark fitness functions
//!
//! Standard test problems for evolutionary algorithms. They work on any
//! representation that flattens to the right value type, so a multi-chromosome
//! [`Genotype`](crate::genome::genotype::Genotype) is scored over all of its
//! genes.

use crate::fitness::traits::Fitness;
use crate::genome::traits::Flatten;

/// OneMax: number of `true` values. Maximize; optimum is the length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneMax;

impl<R> Fitness<R> for OneMax
where
    R: Flatten<Value = bool> + Send + Sync,
{
    fn evaluate(&self, representation: &R) -> f64 {
        representation.flatten().into_iter().filter(|b| *b).count() as f64
    }
}

/// LeadingOnes: number of `true` values before the first `false`. Maximize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeadingOnes;

impl<R> Fitness<R> for LeadingOnes
where
    R: Flatten<Value = bool> + Send + Sync,
{
    fn evaluate(&self, representation: &R) -> f64 {
        representation
            .flatten()
            .into_iter()
            .take_while(|b| *b)
            .count() as f64
    }
}

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Minimize; optimum 0 at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sphere;

impl Sphere {
    /// Usual search interval per coordinate
    pub const BOUNDS: (f64, f64) = (-5.12, 5.12);

    pub fn evaluate_raw(x: &[f64]) -> f64 {
        x.iter().map(|xi| xi * xi).sum()
    }
}

impl<R> Fitness<R> for Sphere
where
    R: Flatten<Value = f64> + Send + Sync,
{
    fn evaluate(&self, representation: &R) -> f64 {
        Self::evaluate_raw(&representation.flatten())
    }
}
