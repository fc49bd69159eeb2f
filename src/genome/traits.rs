//! Core genome traits
//!
//! The engine only needs three capabilities from the material it evolves:
//! it must be able to tell whether it is valid ([`Validate`]), to expose its
//! underlying values ([`Flatten`]) and, at the gene level, to produce a fresh
//! valid instance of itself ([`Generate`]). Everything else is composed from
//! these through generics.

use std::fmt::Debug;

use rand::RngCore;

/// Capability: self-validation
pub trait Validate {
    /// Whether this value satisfies its own constraints
    fn is_valid(&self) -> bool;
}

/// Capability: flattening to a sequence of underlying values
pub trait Flatten {
    /// The underlying value type
    type Value;

    /// All values in order
    fn flatten(&self) -> Vec<Self::Value>;
}

/// Capability: generating a new, valid instance from an existing one
///
/// The receiver acts as a template: a bounded integer gene produces another
/// integer inside the same bounds, a permutation gene another element of the
/// same alphabet, and so on.
pub trait Generate: Sized {
    /// Produce a new instance honoring the same constraints as `self`
    fn generate(&self, rng: &mut dyn RngCore) -> Self;
}

/// Anything the engine can evolve
///
/// Blanket-implemented for every type with the required capabilities.
pub trait Representation:
    Validate + Flatten + Clone + Debug + PartialEq + Send + Sync + 'static
{
}

impl<T> Representation for T where
    T: Validate + Flatten + Clone + Debug + PartialEq + Send + Sync + 'static
{
}

/// A single unit of genetic material
pub trait Gene: Validate + Generate + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The value carried by the gene
    type Value: Clone + Debug + PartialEq + Send + Sync;

    /// The carried value
    fn value(&self) -> &Self::Value;

    /// A copy of this gene (same constraints) carrying another value
    fn with_value(&self, value: Self::Value) -> Self;
}

/// Gene whose value can be handled as a real number
pub trait NumericGene: Gene {
    /// The value as `f64`
    fn to_f64(&self) -> f64;

    /// A copy of this gene carrying `value`, converted and clamped to the
    /// gene's own range
    fn from_f64(&self, value: f64) -> Self;

    /// Inclusive range of valid values, as `f64`
    fn range(&self) -> (f64, f64);
}

/// An ordered sequence of genes
pub trait Chromosome: Validate + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The gene type
    type Gene: Gene;

    /// The genes in order
    fn genes(&self) -> &[Self::Gene];

    /// A chromosome of the same kind holding `genes`
    fn with_genes(&self, genes: Vec<Self::Gene>) -> Self;

    /// Number of genes
    fn len(&self) -> usize {
        self.genes().len()
    }

    /// Whether the chromosome holds no genes
    fn is_empty(&self) -> bool {
        self.genes().is_empty()
    }

    /// The gene values in order
    fn values(&self) -> Vec<<Self::Gene as Gene>::Value> {
        self.genes().iter().map(|g| g.value().clone()).collect()
    }
}
