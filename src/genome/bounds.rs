//! Bounds for numeric gene values

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// Inclusive bounds for a real-valued gene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max or either end is not finite
    pub fn new(min: f64, max: f64) -> Self {
        match Self::try_new(min, max) {
            Ok(bounds) => bounds,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create new bounds, returning an error if they are empty or not finite
    pub fn try_new(min: f64, max: f64) -> Result<Self, GenomeError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GenomeError::ConstraintViolation(format!(
                "bounds [{min}, {max}] must be finite"
            )));
        }
        if min > max {
            return Err(GenomeError::ConstraintViolation(format!(
                "min ({min}) must be <= max ({max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Create unit bounds [0, 1]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Draw a uniform value within bounds
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.range() == 0.0 {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}
