//! Error types for helix-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for genome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Invalid genome structure
    #[error("Invalid genome structure: {0}")]
    InvalidStructure(String),

    /// Constraint violation in genome
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Crossover operation failed
    #[error("Crossover failed: {0}")]
    CrossoverFailed(String),

    /// Mutation operation failed
    #[error("Mutation failed: {0}")]
    MutationFailed(String),

    /// Selection operation failed
    #[error("Selection failed: {0}")]
    SelectionFailed(String),
}

/// Construction-time configuration error
///
/// Carries every violation found, not just the first one, so that a caller
/// fixing a configuration sees the whole list at once.
#[derive(Debug, Error, Clone, PartialEq, Default)]
#[error("{}", render(.violations))]
pub struct ConfigurationError {
    violations: Vec<String>,
}

impl ConfigurationError {
    /// Create an error holding a single violation
    pub fn new(violation: impl Into<String>) -> Self {
        Self {
            violations: vec![violation.into()],
        }
    }

    /// Create an empty collector
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, violation: impl Into<String>) {
        self.violations.push(violation.into());
    }

    /// Record a violation when `condition` does not hold
    pub fn ensure(&mut self, condition: bool, violation: impl FnOnce() -> String) {
        if !condition {
            self.violations.push(violation());
        }
    }

    /// Merge the violations of another error into this one
    pub fn absorb(&mut self, other: ConfigurationError) {
        self.violations.extend(other.violations);
    }

    /// The recorded violations
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Whether no violation was recorded
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ConfigurationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn render(violations: &[String]) -> String {
    match violations {
        [] => "Invalid configuration".to_string(),
        [single] => format!("Invalid configuration: {single}"),
        many => format!(
            "Invalid configuration ({} violations): {}",
            many.len(),
            many.join("; ")
        ),
    }
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Fitness evaluation failed
    #[error("Fitness evaluation failed: {0}")]
    FitnessEvaluation(String),

    /// A structural invariant of the engine was broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
