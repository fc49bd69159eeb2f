//! Numeric genes
//!
//! Bounded integer and floating point genes. Both know their own range, so a
//! mutator can ask them for a fresh valid value without knowing the bounds.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::genome::bounds::Bounds;
use crate::genome::chromosome::LinearChromosome;
use crate::genome::traits::{Chromosome, Gene, Generate, NumericGene, Validate};

/// Integer gene bounded to `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntGene {
    value: i64,
    min: i64,
    max: i64,
}

impl IntGene {
    /// Create an integer gene
    ///
    /// The value is not clamped; a value outside `[min, max]` yields an
    /// invalid gene.
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        assert!(min <= max, "min ({min}) must be <= max ({max})");
        Self { value, min, max }
    }

    /// Random gene within `[min, max]`
    pub fn random<R: Rng + ?Sized>(min: i64, max: i64, rng: &mut R) -> Self {
        Self::new(rng.gen_range(min..=max), min, max)
    }

    /// The carried integer
    pub fn get(&self) -> i64 {
        self.value
    }

    /// Lower bound (inclusive)
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound (inclusive)
    pub fn max(&self) -> i64 {
        self.max
    }
}

impl Validate for IntGene {
    fn is_valid(&self) -> bool {
        (self.min..=self.max).contains(&self.value)
    }
}

impl Generate for IntGene {
    fn generate(&self, rng: &mut dyn RngCore) -> Self {
        Self {
            value: rng.gen_range(self.min..=self.max),
            ..*self
        }
    }
}

impl Gene for IntGene {
    type Value = i64;

    fn value(&self) -> &i64 {
        &self.value
    }

    fn with_value(&self, value: i64) -> Self {
        Self { value, ..*self }
    }
}

impl NumericGene for IntGene {
    fn to_f64(&self) -> f64 {
        self.value as f64
    }

    fn from_f64(&self, value: f64) -> Self {
        let value = value.round().clamp(self.min as f64, self.max as f64) as i64;
        Self { value, ..*self }
    }

    fn range(&self) -> (f64, f64) {
        (self.min as f64, self.max as f64)
    }
}

/// Floating point gene bounded to a [`Bounds`] interval
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoubleGene {
    value: f64,
    bounds: Bounds,
}

impl DoubleGene {
    /// Create a floating point gene (value not clamped)
    pub fn new(value: f64, bounds: Bounds) -> Self {
        Self { value, bounds }
    }

    /// Random gene within `bounds`
    pub fn random<R: Rng + ?Sized>(bounds: Bounds, rng: &mut R) -> Self {
        Self::new(bounds.sample(rng), bounds)
    }

    /// The carried value
    pub fn get(&self) -> f64 {
        self.value
    }

    /// The gene's bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

impl Validate for DoubleGene {
    fn is_valid(&self) -> bool {
        self.value.is_finite() && self.bounds.contains(self.value)
    }
}

impl Generate for DoubleGene {
    fn generate(&self, rng: &mut dyn RngCore) -> Self {
        Self {
            value: self.bounds.sample(rng),
            ..*self
        }
    }
}

impl Gene for DoubleGene {
    type Value = f64;

    fn value(&self) -> &f64 {
        &self.value
    }

    fn with_value(&self, value: f64) -> Self {
        Self { value, ..*self }
    }
}

impl NumericGene for DoubleGene {
    fn to_f64(&self) -> f64 {
        self.value
    }

    fn from_f64(&self, value: f64) -> Self {
        Self {
            value: self.bounds.clamp(value),
            ..*self
        }
    }

    fn range(&self) -> (f64, f64) {
        (self.bounds.min, self.bounds.max)
    }
}

/// Chromosome of bounded integers
pub type IntChromosome = LinearChromosome<IntGene>;

/// Chromosome of bounded floating point values
pub type DoubleChromosome = LinearChromosome<DoubleGene>;

impl LinearChromosome<IntGene> {
    /// Random chromosome of `size` genes within `[min, max]`
    pub fn random<R: Rng + ?Sized>(size: usize, min: i64, max: i64, rng: &mut R) -> Self {
        (0..size).map(|_| IntGene::random(min, max, rng)).collect()
    }

    /// Sum of all gene values
    pub fn sum(&self) -> i64 {
        self.genes().iter().map(IntGene::get).sum()
    }
}

impl LinearChromosome<DoubleGene> {
    /// Random chromosome of `size` genes within `bounds`
    pub fn random<R: Rng + ?Sized>(size: usize, bounds: Bounds, rng: &mut R) -> Self {
        (0..size).map(|_| DoubleGene::random(bounds, rng)).collect()
    }

    /// Raw values
    pub fn to_f64s(&self) -> Vec<f64> {
        self.genes().iter().map(DoubleGene::get).collect()
    }
}
