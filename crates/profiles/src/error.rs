use thiserror::Error;

/// Errors that can occur when building profiles.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("log-ratio profiles compare exactly two solvers, got {0}")]
    SolverCount(usize),

    #[error("expected {expected} per-problem values, got {actual}")]
    ProblemCount { expected: usize, actual: usize },

    #[error("tolerance must lie strictly between 0 and 1, got {0}")]
    Tolerance(f64),
}
