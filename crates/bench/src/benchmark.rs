//! The benchmark driver.
//!
//! [`run_benchmark`] solves every problem, reduces the histories to merit
//! values, and builds one set of profiles per tolerance in [`TOLERANCES`].
//!
//! # Least merit values
//!
//! A problem counts as solved to tolerance `τ` once a run gets within `τ` of
//! the least merit value seen on that problem. For the stochastic features
//! (`noisy`, `tough`, `truncated`) the perturbed runs may never see the true
//! minimum, so the problems are also solved without perturbation and the
//! smaller of the two minima is used.
//!
//! # Logging
//!
//! Progress is reported through `tracing` events inside a `benchmark` span.
//! Install a subscriber (for example with `tracing::subscriber::with_default`)
//! to see them.

use std::io::{self, Write};

use ndarray::{Array1, Zip};
use optiprof_core::{Feature, FeatureName};
use optiprof_profiles::{
    LogRatioProfile, ProfileCurves, TOLERANCES, WorkCounts, data_profile, log_ratio_profile,
    performance_profile, tolerance_label, work_counts,
};
use tracing::{info, info_span, warn};

use crate::{
    BenchError, Config, ProblemLoader, ProblemSpec, SolveResults, Solver,
    solve::{merit_min, solve_all},
};

/// The profiles built for one tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceProfiles {
    tolerance: f64,
    work: WorkCounts,
    performance: ProfileCurves,
    data: ProfileCurves,
    log_ratio: Option<LogRatioProfile>,
}

impl ToleranceProfiles {
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the compact label of the tolerance, e.g. `"1e-3"`.
    #[must_use]
    pub fn label(&self) -> String {
        tolerance_label(self.tolerance)
    }

    #[must_use]
    pub fn work(&self) -> &WorkCounts {
        &self.work
    }

    #[must_use]
    pub fn performance(&self) -> &ProfileCurves {
        &self.performance
    }

    #[must_use]
    pub fn data(&self) -> &ProfileCurves {
        &self.data
    }

    /// Returns the log-ratio profile, built only when two solvers are compared.
    #[must_use]
    pub fn log_ratio(&self) -> Option<&LogRatioProfile> {
        self.log_ratio.as_ref()
    }
}

/// Everything a benchmark produces, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    feature: FeatureName,
    solver_labels: Vec<String>,
    results: SolveResults,
    merit_min: Array1<f64>,
    profiles: Vec<ToleranceProfiles>,
}

impl BenchmarkReport {
    #[must_use]
    pub fn feature(&self) -> FeatureName {
        self.feature
    }

    #[must_use]
    pub fn solver_labels(&self) -> &[String] {
        &self.solver_labels
    }

    /// Returns the names of the loaded problems, in benchmark order.
    #[must_use]
    pub fn problem_names(&self) -> &[String] {
        &self.results.problem_names
    }

    /// Returns the raw histories behind the profiles.
    #[must_use]
    pub fn results(&self) -> &SolveResults {
        &self.results
    }

    /// Returns the least merit value used for each problem's thresholds.
    #[must_use]
    pub fn merit_min(&self) -> &Array1<f64> {
        &self.merit_min
    }

    /// Returns one entry per tolerance, from loosest to strictest.
    #[must_use]
    pub fn profiles(&self) -> &[ToleranceProfiles] {
        &self.profiles
    }

    /// Writes the problem listing, see [`write_problem_names`].
    ///
    /// # Errors
    ///
    /// Returns any error raised by `writer`.
    pub fn write_problem_names<W: Write>(&self, writer: W) -> io::Result<()> {
        write_problem_names(writer, self.problem_names())
    }
}

/// Benchmarks `solvers` on `problems` under `feature`.
///
/// Named problems are resolved with `loader`. Problems that fail to load are
/// skipped with a warning, so the report may list fewer problems than given.
///
/// # Errors
///
/// Returns an error if fewer than two solvers or no problems are given.
pub fn run_benchmark(
    problems: &[ProblemSpec],
    loader: &dyn ProblemLoader,
    solvers: &[&dyn Solver],
    feature: &Feature,
    config: &Config,
) -> Result<BenchmarkReport, BenchError> {
    if solvers.len() < 2 {
        return Err(BenchError::TooFewSolvers(solvers.len()));
    }
    if problems.is_empty() {
        return Err(BenchError::NoProblems);
    }

    let span = info_span!("benchmark", feature = %feature.name());
    let _enter = span.enter();

    info!("Starting the computation of the {} profiles.", feature.name());
    let results = solve_all(problems, loader, solvers, feature, config);
    let merit = results.merit_values()?;
    let merit_init = results.merit_init()?;
    let mut least = merit_min(&merit);

    if feature.name().is_stochastic() {
        info!("Starting the computation of the plain profiles.");
        let plain = solve_all(problems, loader, solvers, &Feature::plain(), config);
        if plain.problem_names == results.problem_names {
            let plain_least = merit_min(&plain.merit_values()?);
            Zip::from(&mut least)
                .and(&plain_least)
                .for_each(|least, &plain| *least = least.min(plain));
        } else {
            warn!("Plain runs loaded different problems; ignoring them.");
        }
    }

    let mut profiles = Vec::with_capacity(TOLERANCES.len());
    for tolerance in TOLERANCES {
        info!("Creating profiles for tolerance {}.", tolerance_label(tolerance));
        let work = work_counts(&merit, &merit_init, &least, tolerance)?;
        let performance = performance_profile(&work);
        let data = data_profile(&work, &results.problem_dimensions)?;
        let log_ratio = if solvers.len() == 2 {
            Some(log_ratio_profile(&work)?)
        } else {
            None
        };

        profiles.push(ToleranceProfiles {
            tolerance,
            work,
            performance,
            data,
            log_ratio,
        });
    }
    info!("Benchmark finished with {} problems.", results.n_problems());

    Ok(BenchmarkReport {
        feature: feature.name(),
        solver_labels: solvers.iter().map(|s| s.label().to_owned()).collect(),
        results,
        merit_min: least,
        profiles,
    })
}

/// Writes the ordered problem names, one per line.
///
/// # Errors
///
/// Returns any error raised by `writer`.
pub fn write_problem_names<W: Write>(mut writer: W, names: &[String]) -> io::Result<()> {
    writer.write_all(names.join("\n").as_bytes())?;
    writer.flush()
}
