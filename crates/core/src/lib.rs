//! Core traits and types for benchmarking optimization solvers.
//!
//! This crate defines the pieces every benchmark run builds on:
//!
//! - [`Problem`]: a test problem exposing an objective, a constraint
//!   violation, and a starting point
//! - [`Feature`]: a perturbation applied to every objective evaluation
//!   (noise, truncation, regularization, random failures, ...)
//! - [`merit_of`] and [`merit_values`]: reduce an objective value and a
//!   constraint violation to one comparable scalar
//! - [`EvaluationHistory`]: the ordered record of one solver run

mod error;
mod history;
mod merit;
mod problem;

pub mod feature;

pub use error::{ConfigError, SimulatedFailure, ValidationError};
pub use feature::{Feature, FeatureName, RunSeed};
pub use history::EvaluationHistory;
pub use merit::{FEASIBLE_CV, INFEASIBLE_CV, PENALTY, merit_of, merit_values, sanitize};
pub use problem::Problem;
