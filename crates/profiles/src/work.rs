use ndarray::{Array1, Array3, Array4, Axis};

use crate::{ProfileError, threshold};

/// Evaluation counts needed to solve each problem, for one tolerance.
///
/// Indexed by (problem, solver, run). `None` marks a run that never reached
/// the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCounts(Array3<Option<usize>>);

impl WorkCounts {
    /// Wraps counts indexed by (problem, solver, run).
    #[must_use]
    pub fn new(counts: Array3<Option<usize>>) -> Self {
        Self(counts)
    }

    #[must_use]
    pub fn n_problems(&self) -> usize {
        self.0.len_of(Axis(0))
    }

    #[must_use]
    pub fn n_solvers(&self) -> usize {
        self.0.len_of(Axis(1))
    }

    #[must_use]
    pub fn n_runs(&self) -> usize {
        self.0.len_of(Axis(2))
    }

    /// Returns the count for one run, or `None` if it did not solve the problem.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn get(&self, problem: usize, solver: usize, run: usize) -> Option<usize> {
        self.0[[problem, solver, run]]
    }

    /// Returns the underlying array.
    #[must_use]
    pub fn as_array(&self) -> &Array3<Option<usize>> {
        &self.0
    }

    /// Returns the smallest count over all solvers for a (problem, run).
    pub(crate) fn best(&self, problem: usize, run: usize) -> Option<usize> {
        (0..self.n_solvers())
            .filter_map(|solver| self.get(problem, solver, run))
            .min()
    }
}

/// Counts the evaluations each run needs to reach the tolerance threshold.
///
/// `merit_values` is indexed by (problem, solver, run, evaluation). The
/// threshold of each problem comes from [`threshold`] using its initial and
/// best merit. A run's count is the 1-based index of its first evaluation at
/// or below the threshold.
///
/// # Errors
///
/// Returns an error if `tolerance` is not strictly between 0 and 1, or if
/// `merit_init` or `merit_min` does not hold one value per problem.
pub fn work_counts(
    merit_values: &Array4<f64>,
    merit_init: &Array1<f64>,
    merit_min: &Array1<f64>,
    tolerance: f64,
) -> Result<WorkCounts, ProfileError> {
    if !(tolerance > 0.0 && tolerance < 1.0) {
        return Err(ProfileError::Tolerance(tolerance));
    }

    let (n_problems, n_solvers, n_runs, _) = merit_values.dim();
    for values in [merit_init, merit_min] {
        if values.len() != n_problems {
            return Err(ProfileError::ProblemCount {
                expected: n_problems,
                actual: values.len(),
            });
        }
    }

    let counts = Array3::from_shape_fn((n_problems, n_solvers, n_runs), |(p, s, r)| {
        let target = threshold(merit_init[p], merit_min[p], tolerance);
        merit_values
            .slice(ndarray::s![p, s, r, ..])
            .iter()
            .position(|&merit| merit <= target)
            .map(|index| index + 1)
    });

    Ok(WorkCounts(counts))
}
