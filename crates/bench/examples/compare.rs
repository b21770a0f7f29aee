//! Compares two derivative-free solvers on a few classic problems.
//!
//! Run with `cargo run -p optiprof-bench --example compare [feature]`, where
//! the optional feature name defaults to `noisy`.

use std::{env, error::Error, io};

use ndarray::Axis;

use optiprof_bench::{
    Config, EvaluationError, FeaturedProblem, LoadError, ProblemSpec, Solver, run_benchmark,
};
use optiprof_core::{Feature, Problem, feature::OptionValue};

struct Rosenbrock {
    x0: Vec<f64>,
}

impl Problem for Rosenbrock {
    fn objective(&self, x: &[f64]) -> f64 {
        x.windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum()
    }

    fn x0(&self) -> &[f64] {
        &self.x0
    }
}

/// Minimizes `sum(x)` subject to `‖x‖ ≤ 1`.
struct Disk;

impl Problem for Disk {
    fn objective(&self, x: &[f64]) -> f64 {
        x.iter().sum()
    }

    fn maxcv(&self, x: &[f64]) -> f64 {
        (x.iter().map(|v| v * v).sum::<f64>().sqrt() - 1.0).max(0.0)
    }

    fn x0(&self) -> &[f64] {
        &[0.0, 0.0]
    }
}

/// Coordinate search that halves its step after an unsuccessful sweep.
struct Compass;

impl Solver for Compass {
    fn label(&self) -> &str {
        "compass"
    }

    fn solve(&self, problem: &mut FeaturedProblem<'_>) -> Result<(), EvaluationError> {
        let mut x = problem.x0().to_vec();
        let mut fx = penalized(problem, &x)?;
        let mut step = 0.5;
        while step > 1e-8 {
            let mut improved = false;
            for i in 0..x.len() {
                for direction in [1.0, -1.0] {
                    let mut trial = x.clone();
                    trial[i] += direction * step;
                    let f_trial = penalized(problem, &trial)?;
                    if f_trial < fx {
                        (x, fx, improved) = (trial, f_trial, true);
                        break;
                    }
                }
            }
            if !improved {
                step *= 0.5;
            }
        }
        Ok(())
    }
}

/// Steps each coordinate downward for as long as that improves, over a
/// fixed step schedule.
struct Greedy;

impl Solver for Greedy {
    fn label(&self) -> &str {
        "greedy"
    }

    fn solve(&self, problem: &mut FeaturedProblem<'_>) -> Result<(), EvaluationError> {
        let mut x = problem.x0().to_vec();
        let mut fx = penalized(problem, &x)?;
        for step in [0.5, 0.25, 0.1, 0.05, 0.01] {
            for i in 0..x.len() {
                loop {
                    let mut trial = x.clone();
                    trial[i] -= step;
                    let f_trial = penalized(problem, &trial)?;
                    if f_trial >= fx {
                        break;
                    }
                    (x, fx) = (trial, f_trial);
                }
            }
        }
        Ok(())
    }
}

fn penalized(problem: &mut FeaturedProblem<'_>, x: &[f64]) -> Result<f64, EvaluationError> {
    Ok(problem.fun(x)? + 1e3 * problem.maxcv(x))
}

fn loader(name: &str) -> Result<Box<dyn Problem>, LoadError> {
    match name {
        "ROSENBR" => Ok(Box::new(Rosenbrock { x0: vec![-1.2, 1.0] })),
        "ROSENBR4" => Ok(Box::new(Rosenbrock {
            x0: vec![-1.2, 1.0, -1.2, 1.0],
        })),
        "HS21" => Err(LoadError::unsolvable(name, "bounds are not supported")),
        _ => Err(LoadError::Unknown(name.to_owned())),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let feature_name = env::args().nth(1).unwrap_or_else(|| "noisy".to_owned());
    let feature = Feature::configure(&feature_name, [("n_runs", OptionValue::from(3))])?;

    let problems = [
        ProblemSpec::named("ROSENBR"),
        ProblemSpec::named("ROSENBR4"),
        ProblemSpec::named("HS21"),
        ProblemSpec::extra(Disk),
    ];
    let solvers: [&dyn Solver; 2] = [&Compass, &Greedy];
    let config = Config::new(200)?;

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    let report = tracing::subscriber::with_default(subscriber, || {
        run_benchmark(&problems, &loader, &solvers, &feature, &config)
    })?;

    println!(
        "{} profiles for {}",
        report.feature(),
        report.solver_labels().join(" vs ")
    );
    for profiles in report.profiles() {
        let work = profiles.work().as_array();
        let solved: Vec<String> = work
            .axis_iter(Axis(1))
            .map(|counts| {
                let n_solved = counts.iter().filter(|count| count.is_some()).count();
                format!("{n_solved}/{}", counts.len())
            })
            .collect();
        let wins = profiles
            .log_ratio()
            .map_or(0, |lr| lr.values().iter().filter(|&&v| v < 0.0).count());
        println!(
            "tol {:>6}: solved {}, compass faster on {wins}",
            profiles.label(),
            solved.join(" / ")
        );
    }

    println!("problems:");
    report.write_problem_names(io::stdout().lock())?;
    println!();
    Ok(())
}
