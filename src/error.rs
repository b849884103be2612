//! Error taxonomy for evolution runs.
//!
//! Chromosome operators and constraints report failures as
//! [`anyhow::Error`]; the driver wraps them into [`EvolutionError`] tagged
//! with the phase that failed. Any error aborts the whole run.

use std::fmt;

/// The chromosome operator that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Randomize,
    Mutate,
    Crossover,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Randomize => f.write_str("randomize"),
            Operator::Mutate => f.write_str("mutate"),
            Operator::Crossover => f.write_str("crossover"),
        }
    }
}

/// Whether a failing constraint was a feasibility or a scoring constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Hard,
    Soft,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Hard => f.write_str("hard"),
            ConstraintKind::Soft => f.write_str("soft"),
        }
    }
}

/// Errors surfaced by an optimization run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// Chromosome initialization rejected its configuration.
    #[error("chromosome initialization failed: {source}")]
    Initialization {
        #[source]
        source: anyhow::Error,
    },

    /// A chromosome operator failed.
    #[error("{operator} operator failed: {source}")]
    Operator {
        operator: Operator,
        #[source]
        source: anyhow::Error,
    },

    /// A constraint evaluator failed.
    #[error("{kind} constraint #{index} failed: {source}")]
    ConstraintEvaluation {
        kind: ConstraintKind,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The run configuration was rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EvolutionError {
    pub(crate) fn operator(operator: Operator, source: anyhow::Error) -> Self {
        EvolutionError::Operator { operator, source }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EvolutionError>;
