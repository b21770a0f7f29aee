//! Running every solver on every problem.
//!
//! Problems are solved one after another. Each problem yields one
//! [`ProblemResults`], and [`solve_all`] stacks them into fixed-shape arrays
//! padded to the largest evaluation budget. A problem that fails to load is
//! logged and left out of the results.

use ndarray::{Array1, Array2, Array3, Array4, Axis, s};
use optiprof_core::{Feature, Problem, ValidationError, merit_values};
use tracing::{debug, error, info, warn};

use crate::{Config, FeaturedProblem, LoadError, Solver};

/// Resolves problem names to problems.
///
/// Closures of the form `Fn(&str) -> Result<Box<dyn Problem>, LoadError>` are
/// loaders.
pub trait ProblemLoader {
    /// Loads the problem called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem is unknown or cannot be solved.
    fn load(&self, name: &str) -> Result<Box<dyn Problem>, LoadError>;
}

impl<F> ProblemLoader for F
where
    F: Fn(&str) -> Result<Box<dyn Problem>, LoadError>,
{
    fn load(&self, name: &str) -> Result<Box<dyn Problem>, LoadError> {
        self(name)
    }
}

/// A loader that knows no problems, for benchmarks built only from extras.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl ProblemLoader for NoLoader {
    fn load(&self, name: &str) -> Result<Box<dyn Problem>, LoadError> {
        Err(LoadError::Unknown(name.to_owned()))
    }
}

/// A problem to include in a benchmark.
pub enum ProblemSpec {
    /// A problem resolved by name through a [`ProblemLoader`].
    Named(String),
    /// An in-memory problem, reported as `EXTRA1`, `EXTRA2`, ... in the order
    /// extras appear.
    Extra(Box<dyn Problem>),
}

impl ProblemSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn extra(problem: impl Problem + 'static) -> Self {
        Self::Extra(Box::new(problem))
    }
}

impl std::fmt::Debug for ProblemSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Extra(problem) => f
                .debug_struct("Extra")
                .field("dimension", &problem.dimension())
                .finish_non_exhaustive(),
        }
    }
}

/// Histories of every solver run on one problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemResults {
    pub name: String,
    pub dimension: usize,
    /// Objective values indexed by (solver, run, evaluation).
    pub fun_values: Array3<f64>,
    /// Constraint violations indexed by (solver, run, evaluation).
    pub maxcv_values: Array3<f64>,
    /// Unperturbed objective at the problem's starting point.
    pub fun_init: f64,
    /// Constraint violation at the problem's starting point.
    pub maxcv_init: f64,
    /// Evaluations recorded per (solver, run).
    pub n_eval: Array2<usize>,
}

/// Histories of every solver run on every loaded problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResults {
    /// Objective values indexed by (problem, solver, run, evaluation).
    pub fun_values: Array4<f64>,
    /// Constraint violations indexed by (problem, solver, run, evaluation).
    pub maxcv_values: Array4<f64>,
    pub fun_init: Array1<f64>,
    pub maxcv_init: Array1<f64>,
    /// Evaluations recorded per (problem, solver, run).
    pub n_eval: Array3<usize>,
    pub problem_names: Vec<String>,
    pub problem_dimensions: Vec<usize>,
}

impl SolveResults {
    #[must_use]
    pub fn n_problems(&self) -> usize {
        self.problem_names.len()
    }

    /// Returns the merit value of every recorded evaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective and violation arrays differ in shape.
    pub fn merit_values(&self) -> Result<Array4<f64>, ValidationError> {
        merit_values(&self.fun_values, &self.maxcv_values)
    }

    /// Returns the merit value at each problem's starting point.
    ///
    /// # Errors
    ///
    /// Returns an error if the objective and violation arrays differ in shape.
    pub fn merit_init(&self) -> Result<Array1<f64>, ValidationError> {
        merit_values(&self.fun_init, &self.maxcv_init)
    }
}

/// Returns the least merit value reached on each problem, over all solvers,
/// runs, and evaluations.
#[must_use]
pub fn merit_min(merit_values: &Array4<f64>) -> Array1<f64> {
    merit_values
        .axis_iter(Axis(0))
        .map(|problem| problem.fold(f64::INFINITY, |a, &b| a.min(b)))
        .collect()
}

/// Runs every solver `feature.n_runs()` times on one problem.
///
/// Each run gets a fresh [`FeaturedProblem`] seeded by its run index. A
/// solver error only ends that run. A run whose starting point cannot be
/// built is logged and left unsolved.
#[must_use]
pub fn solve_problem(
    name: &str,
    problem: &dyn Problem,
    solvers: &[&dyn Solver],
    feature: &Feature,
    config: &Config,
) -> ProblemResults {
    let n_runs = feature.n_runs();
    let max_eval = config.max_eval(problem.dimension());

    let mut fun_values = Array3::from_elem((solvers.len(), n_runs, max_eval), f64::NAN);
    let mut maxcv_values = Array3::from_elem((solvers.len(), n_runs, max_eval), f64::NAN);
    let mut n_eval = Array2::zeros((solvers.len(), n_runs));

    for (i_solver, solver) in solvers.iter().enumerate() {
        for run in 0..n_runs {
            info!(
                "Solving {name} with {} (run {}/{n_runs}).",
                solver.label(),
                run + 1
            );
            let mut featured = match FeaturedProblem::new(problem, feature, max_eval, run) {
                Ok(featured) => featured,
                Err(err) => {
                    warn!("Skipping run {} of {name}: {err}", run + 1);
                    continue;
                }
            };
            if let Err(err) = solver.solve(&mut featured) {
                debug!(problem = name, solver = solver.label(), run, "run ended: {err}");
            }

            let history = featured.into_history();
            let (fun, maxcv) = history.padded(max_eval);
            n_eval[[i_solver, run]] = history.len();
            fun_values.slice_mut(s![i_solver, run, ..]).assign(&fun);
            maxcv_values.slice_mut(s![i_solver, run, ..]).assign(&maxcv);
        }
    }

    let x0 = problem.x0();
    ProblemResults {
        name: name.to_owned(),
        dimension: problem.dimension(),
        fun_values,
        maxcv_values,
        fun_init: problem.objective(x0),
        maxcv_init: problem.maxcv(x0),
        n_eval,
    }
}

/// Loads and solves every problem, in order.
///
/// The evaluation axis of the returned arrays is `max_eval_factor` times the
/// largest loaded dimension (1 if nothing loaded). Runs with fewer
/// evaluations repeat their last value to fill it, and runs with none are
/// filled with NaN.
pub fn solve_all(
    problems: &[ProblemSpec],
    loader: &dyn ProblemLoader,
    solvers: &[&dyn Solver],
    feature: &Feature,
    config: &Config,
) -> SolveResults {
    let mut results = Vec::with_capacity(problems.len());
    let mut n_extra = 0;
    for spec in problems {
        let solved = match spec {
            ProblemSpec::Named(name) => match loader.load(name) {
                Ok(problem) => solve_problem(name, problem.as_ref(), solvers, feature, config),
                Err(err) => {
                    warn!("Skipping problem {name}: {err}");
                    continue;
                }
            },
            ProblemSpec::Extra(problem) => {
                n_extra += 1;
                let name = format!("EXTRA{n_extra}");
                solve_problem(&name, problem.as_ref(), solvers, feature, config)
            }
        };
        results.push(solved);
    }

    if results.is_empty() {
        error!("All problems failed to load.");
    }

    stack(&results, solvers.len(), feature.n_runs(), config)
}

/// Stacks per-problem results into arrays with a shared evaluation axis.
fn stack(
    results: &[ProblemResults],
    n_solvers: usize,
    n_runs: usize,
    config: &Config,
) -> SolveResults {
    let max_eval = results
        .iter()
        .map(|result| config.max_eval(result.dimension))
        .max()
        .unwrap_or(1);
    let shape = (results.len(), n_solvers, n_runs, max_eval);

    let mut fun_values = Array4::from_elem(shape, f64::NAN);
    let mut maxcv_values = Array4::from_elem(shape, f64::NAN);
    let mut n_eval = Array3::zeros((results.len(), n_solvers, n_runs));

    for (i_problem, result) in results.iter().enumerate() {
        let budget = result.fun_values.len_of(Axis(2));
        for (dst, src) in [
            (&mut fun_values, &result.fun_values),
            (&mut maxcv_values, &result.maxcv_values),
        ] {
            let mut dst = dst.index_axis_mut(Axis(0), i_problem);
            dst.slice_mut(s![.., .., ..budget]).assign(src);
            if budget > 0 && budget < max_eval {
                let last = src.slice(s![.., .., budget - 1..budget]);
                dst.slice_mut(s![.., .., budget..]).assign(&last);
            }
        }
        n_eval.index_axis_mut(Axis(0), i_problem).assign(&result.n_eval);
    }

    SolveResults {
        fun_values,
        maxcv_values,
        fun_init: results.iter().map(|result| result.fun_init).collect(),
        maxcv_init: results.iter().map(|result| result.maxcv_init).collect(),
        n_eval,
        problem_names: results.iter().map(|result| result.name.clone()).collect(),
        problem_dimensions: results.iter().map(|result| result.dimension).collect(),
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::EvaluationError;

    struct Shifted {
        x0: Vec<f64>,
    }

    impl Problem for Shifted {
        fn objective(&self, x: &[f64]) -> f64 {
            x.iter().map(|v| (v - 1.0).powi(2)).sum()
        }

        fn x0(&self) -> &[f64] {
            &self.x0
        }
    }

    /// Evaluates a fixed number of points moving towards the minimum.
    struct Walker {
        label: &'static str,
        steps: usize,
    }

    impl Solver for Walker {
        fn label(&self) -> &str {
            self.label
        }

        fn solve(&self, problem: &mut FeaturedProblem<'_>) -> Result<(), EvaluationError> {
            let mut x = problem.x0().to_vec();
            for _ in 0..self.steps {
                problem.fun(&x)?;
                for v in &mut x {
                    *v += 0.5 * (1.0 - *v);
                }
            }
            Ok(())
        }
    }

    fn loader(name: &str) -> Result<Box<dyn Problem>, LoadError> {
        match name {
            "ONE" => Ok(Box::new(Shifted { x0: vec![0.0] })),
            "TWO" => Ok(Box::new(Shifted { x0: vec![0.0, 0.0] })),
            "BROKEN" => Err(LoadError::unsolvable(name, "missing data")),
            _ => Err(LoadError::Unknown(name.to_owned())),
        }
    }

    #[test]
    fn pads_to_largest_budget() {
        let config = Config::new(2).unwrap();
        let fast = Walker {
            label: "fast",
            steps: 1,
        };
        let slow = Walker {
            label: "slow",
            steps: 10,
        };
        let solvers: [&dyn Solver; 2] = [&fast, &slow];

        let results = solve_all(
            &[ProblemSpec::named("ONE"), ProblemSpec::named("TWO")],
            &loader,
            &solvers,
            &Feature::plain(),
            &config,
        );

        assert_eq!(results.problem_names, vec!["ONE", "TWO"]);
        assert_eq!(results.problem_dimensions, vec![1, 2]);
        assert_eq!(results.fun_values.dim(), (2, 2, 1, 4));

        // Problem ONE has a budget of 2, padded to 4 by repetition.
        assert_eq!(results.n_eval[[0, 0, 0]], 1);
        assert_eq!(results.n_eval[[0, 1, 0]], 2);
        assert_eq!(
            results.fun_values.slice(s![0, 1, 0, ..]),
            array![1.0, 0.25, 0.25, 0.25]
        );
        assert_eq!(
            results.fun_values.slice(s![0, 0, 0, ..]),
            array![1.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(results.n_eval[[1, 1, 0]], 4);
        assert_eq!(results.fun_init, array![1.0, 2.0]);
        assert_eq!(results.maxcv_init, array![0.0, 0.0]);
    }

    #[test]
    fn skips_problems_that_fail_to_load() {
        let walker = Walker {
            label: "walker",
            steps: 3,
        };
        let solvers: [&dyn Solver; 2] = [&walker, &walker];

        let results = solve_all(
            &[
                ProblemSpec::named("BROKEN"),
                ProblemSpec::extra(Shifted { x0: vec![3.0] }),
                ProblemSpec::named("NOPE"),
                ProblemSpec::named("ONE"),
                ProblemSpec::extra(Shifted { x0: vec![1.0] }),
            ],
            &loader,
            &solvers,
            &Feature::plain(),
            &Config::default(),
        );

        assert_eq!(results.problem_names, vec!["EXTRA1", "ONE", "EXTRA2"]);
        assert_eq!(results.n_problems(), 3);
    }

    #[test]
    fn nothing_loaded_gives_empty_arrays() {
        let walker = Walker {
            label: "walker",
            steps: 3,
        };
        let solvers: [&dyn Solver; 2] = [&walker, &walker];

        let results = solve_all(
            &[ProblemSpec::named("NOPE")],
            &NoLoader,
            &solvers,
            &Feature::plain(),
            &Config::default(),
        );

        assert_eq!(results.n_problems(), 0);
        assert_eq!(results.fun_values.dim(), (0, 2, 1, 1));
        assert_eq!(merit_min(&results.merit_values().unwrap()).len(), 0);
    }

    #[test]
    fn unsolved_runs_have_infinite_merit() {
        let idle = Walker {
            label: "idle",
            steps: 0,
        };
        let solvers: [&dyn Solver; 2] = [&idle, &idle];

        let results = solve_all(
            &[ProblemSpec::extra(Shifted { x0: vec![0.0] })],
            &NoLoader,
            &solvers,
            &Feature::plain(),
            &Config::default(),
        );

        let merit = results.merit_values().unwrap();
        assert!(merit.iter().all(|&m| m == f64::INFINITY));
        assert_eq!(merit_min(&merit), array![f64::INFINITY]);
        assert_eq!(results.merit_init().unwrap(), array![1.0]);
    }

    #[test]
    fn bad_start_shift_leaves_runs_unsolved() {
        use std::sync::Arc;

        use optiprof_core::feature::{FeatureRng, RandomizeX0Options};

        let feature = Feature::randomize_x0(RandomizeX0Options {
            n_runs: 2,
            distribution: Arc::new(|_rng: &mut FeatureRng, _n: usize| Vec::new()),
        })
        .unwrap();
        let walker = Walker {
            label: "walker",
            steps: 3,
        };
        let solvers: [&dyn Solver; 2] = [&walker, &walker];

        let results = solve_all(
            &[ProblemSpec::extra(Shifted { x0: vec![0.0] })],
            &NoLoader,
            &solvers,
            &feature,
            &Config::default(),
        );

        assert!(results.n_eval.iter().all(|&n| n == 0));
        assert!(results.fun_values.iter().all(|v| v.is_nan()));
        assert_eq!(results.fun_init, array![1.0]);
    }
}
