//! Benchmarking optimization solvers on perturbed test problems.
//!
//! A benchmark runs every [`Solver`] on every problem, several times when the
//! active feature is randomized, and records each objective evaluation the
//! solver requests through a [`FeaturedProblem`]. The recorded histories are
//! then reduced to performance, data, and log-ratio profiles for each
//! tolerance.
//!
//! ```no_run
//! use optiprof_bench::{Config, FeaturedProblem, EvaluationError, NoLoader, ProblemSpec, Solver};
//! use optiprof_bench::run_benchmark;
//! use optiprof_core::{Feature, Problem};
//!
//! struct Quadratic;
//!
//! impl Problem for Quadratic {
//!     fn objective(&self, x: &[f64]) -> f64 {
//!         x.iter().map(|v| v * v).sum()
//!     }
//!
//!     fn x0(&self) -> &[f64] {
//!         &[1.0, -2.0]
//!     }
//! }
//!
//! struct StartOnly;
//!
//! impl Solver for StartOnly {
//!     fn label(&self) -> &str {
//!         "start-only"
//!     }
//!
//!     fn solve(&self, problem: &mut FeaturedProblem<'_>) -> Result<(), EvaluationError> {
//!         let x0 = problem.x0().to_vec();
//!         problem.fun(&x0).map(|_| ())
//!     }
//! }
//!
//! let solvers: [&dyn Solver; 2] = [&StartOnly, &StartOnly];
//! let report = run_benchmark(
//!     &[ProblemSpec::extra(Quadratic)],
//!     &NoLoader,
//!     &solvers,
//!     &Feature::plain(),
//!     &Config::default(),
//! )?;
//! assert_eq!(report.problem_names(), ["EXTRA1"]);
//! # Ok::<(), optiprof_bench::BenchError>(())
//! ```

mod benchmark;
mod config;
mod error;
mod featured;
mod solve;
mod solver;

pub use benchmark::{BenchmarkReport, ToleranceProfiles, run_benchmark, write_problem_names};
pub use config::{Config, ConfigError};
pub use error::{BenchError, EvaluationError, LoadError};
pub use featured::FeaturedProblem;
pub use solve::{
    NoLoader, ProblemLoader, ProblemResults, ProblemSpec, SolveResults, merit_min, solve_all,
    solve_problem,
};
pub use solver::Solver;
