use std::error::Error as StdError;

use optiprof_core::{SimulatedFailure, ValidationError};
use optiprof_profiles::ProfileError;
use thiserror::Error;

/// Errors returned to a solver when it evaluates a featured problem.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationError {
    #[error(transparent)]
    Simulated(#[from] SimulatedFailure),

    #[error("evaluation budget of {0} exhausted")]
    BudgetExhausted(usize),

    #[error("run stopped after a failed evaluation")]
    Stopped,
}

/// Errors raised when a named problem cannot be loaded.
///
/// A load error never aborts a benchmark: the problem is logged and skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown problem: {0}")]
    Unknown(String),

    #[error("problem {name} cannot be solved: {source}")]
    Unsolvable {
        name: String,
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl LoadError {
    /// Creates an [`LoadError::Unsolvable`] from any error type or message.
    pub fn unsolvable(
        name: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::Unsolvable {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Errors that abort a benchmark.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BenchError {
    #[error("at least two solvers must be given, got {0}")]
    TooFewSolvers(usize),

    #[error("at least one problem must be given")]
    NoProblems,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}
