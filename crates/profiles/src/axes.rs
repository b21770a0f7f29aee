//! Performance and data profile curves.
//!
//! Both profiles share one construction. Each (run, problem, solver) gets a
//! ratio: work divided by a per-problem denominator. The two profiles differ
//! only in that denominator and in where unsolved runs are drawn:
//!
//! | profile     | denominator                        | unsolved drawn at |
//! |-------------|------------------------------------|-------------------|
//! | performance | fewest evaluations over solvers    | `ratio_max²`      |
//! | data        | problem dimension + 1              | `2 · ratio_max`   |
//!
//! The ratios of every run are sorted and stacked, and each (solver, run)
//! gets a step function climbing by `1 / n_problems` at its own entries.

use ndarray::{Array1, Array2, Array3, Axis, s};

use crate::{ProfileError, WorkCounts};

/// Which profile a set of curves describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ProfileKind {
    Performance,
    Data,
}

/// Step curves of the fraction of problems solved, for every solver.
///
/// `x` has one row per point and one column per solver. `y` adds a trailing
/// run axis. The first row is the origin of the profile (x = 1 for
/// performance, x = 0 for data) with y = 0, and when any problem exists the
/// last row sits at the sentinel with the final y.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ProfileCurves {
    kind: ProfileKind,
    x: Array2<f64>,
    y: Array3<f64>,
    ratio_max: f64,
}

/// The curve of a single solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ProfileCurve {
    /// Abscissae, non-decreasing.
    pub x: Array1<f64>,
    /// Ordinates per (point, run), non-decreasing along points.
    pub y: Array2<f64>,
}

/// Spread of a solver's curve over runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RunBand {
    pub min: Array1<f64>,
    pub mean: Array1<f64>,
    pub max: Array1<f64>,
}

impl ProfileCurves {
    #[must_use]
    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    #[must_use]
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &Array3<f64> {
        &self.y
    }

    /// Returns the largest finite ratio observed.
    #[must_use]
    pub fn ratio_max(&self) -> f64 {
        self.ratio_max
    }

    /// Returns the abscissa used for runs that never solved a problem.
    #[must_use]
    pub fn sentinel(&self) -> f64 {
        sentinel(self.kind, self.ratio_max)
    }

    #[must_use]
    pub fn n_solvers(&self) -> usize {
        self.x.len_of(Axis(1))
    }

    #[must_use]
    pub fn n_runs(&self) -> usize {
        self.y.len_of(Axis(2))
    }

    /// Returns `true` when the curves hold only the origin row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.len_of(Axis(0)) <= 1
    }

    /// Returns the curve of one solver, or `None` if out of range.
    #[must_use]
    pub fn curve(&self, solver: usize) -> Option<ProfileCurve> {
        (solver < self.n_solvers()).then(|| ProfileCurve {
            x: self.x.column(solver).to_owned(),
            y: self.y.slice(s![.., solver, ..]).to_owned(),
        })
    }

    /// Returns the min, mean, and max over runs at each point of a solver's
    /// curve, or `None` if out of range.
    #[must_use]
    pub fn run_band(&self, solver: usize) -> Option<RunBand> {
        if solver >= self.n_solvers() {
            return None;
        }
        let y = self.y.slice(s![.., solver, ..]);
        #[allow(clippy::cast_precision_loss)]
        let n_runs = self.n_runs() as f64;

        Some(RunBand {
            min: y.map_axis(Axis(1), |row| row.fold(f64::INFINITY, |a, &b| a.min(b))),
            mean: y.sum_axis(Axis(1)) / n_runs,
            max: y.map_axis(Axis(1), |row| row.fold(f64::NEG_INFINITY, |a, &b| a.max(b))),
        })
    }
}

/// Builds performance profiles from work counts.
///
/// A run's ratio is its work divided by the fewest evaluations any solver
/// needed on the same (problem, run).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn performance_profile(work: &WorkCounts) -> ProfileCurves {
    build(work, ProfileKind::Performance, |problem, run| {
        work.best(problem, run).map(|best| best as f64)
    })
}

/// Builds data profiles from work counts.
///
/// A run's ratio is its work divided by `dimension + 1`, the cost of one
/// simplex gradient.
///
/// # Errors
///
/// Returns an error if `dimensions` does not hold one entry per problem.
#[allow(clippy::cast_precision_loss)]
pub fn data_profile(
    work: &WorkCounts,
    dimensions: &[usize],
) -> Result<ProfileCurves, ProfileError> {
    if dimensions.len() != work.n_problems() {
        return Err(ProfileError::ProblemCount {
            expected: work.n_problems(),
            actual: dimensions.len(),
        });
    }

    Ok(build(work, ProfileKind::Data, |problem, _| {
        Some((dimensions[problem] + 1) as f64)
    }))
}

fn sentinel(kind: ProfileKind, ratio_max: f64) -> f64 {
    match kind {
        ProfileKind::Performance => ratio_max * ratio_max,
        ProfileKind::Data => 2.0 * ratio_max,
    }
}

/// Adds the boundary rows around the sorted axes and places unsolved runs.
fn build(
    work: &WorkCounts,
    kind: ProfileKind,
    denominator: impl Fn(usize, usize) -> Option<f64>,
) -> ProfileCurves {
    let (sorted_x, sorted_y, ratio_max) = sorted_axes(work, denominator);
    let ratio_max = match kind {
        ProfileKind::Performance => ratio_max.max(1.0),
        ProfileKind::Data => ratio_max,
    };
    let sentinel = sentinel(kind, ratio_max);
    let origin = match kind {
        ProfileKind::Performance => 1.0,
        ProfileKind::Data => 0.0,
    };

    let n_sorted = sorted_x.len_of(Axis(0));
    let n_points = if work.n_problems() > 0 {
        n_sorted + 2
    } else {
        1
    };

    let mut x = Array2::from_elem((n_points, work.n_solvers()), origin);
    let mut y = Array3::zeros((n_points, work.n_solvers(), work.n_runs()));

    x.slice_mut(s![1..=n_sorted, ..]).assign(
        &sorted_x.mapv(|ratio| if ratio.is_finite() { ratio } else { sentinel }),
    );
    y.slice_mut(s![1..=n_sorted, .., ..]).assign(&sorted_y);

    if work.n_problems() > 0 {
        x.row_mut(n_points - 1).fill(sentinel);
        let last = y.slice(s![n_sorted, .., ..]).to_owned();
        y.slice_mut(s![n_points - 1, .., ..]).assign(&last);
    }

    ProfileCurves {
        kind,
        x,
        y,
        ratio_max,
    }
}

/// Sorts every run's ratios and computes the stepped fractions.
///
/// Rows of the returned `x` are the (run, problem) entries stably sorted per
/// solver, with unsolved entries at `+∞`. For each (solver, run) the matching
/// `y` climbs to `k / n_problems` at the row holding that run's k-th smallest
/// ratio and holds its value elsewhere.
#[allow(clippy::cast_precision_loss)]
fn sorted_axes(
    work: &WorkCounts,
    denominator: impl Fn(usize, usize) -> Option<f64>,
) -> (Array2<f64>, Array3<f64>, f64) {
    let n_problems = work.n_problems();
    let n_solvers = work.n_solvers();
    let n_runs = work.n_runs();
    let n_rows = n_problems * n_runs;

    let mut ratio_max = f64::EPSILON;
    let mut stacked = Array2::from_elem((n_rows, n_solvers), f64::INFINITY);
    for run in 0..n_runs {
        for problem in 0..n_problems {
            let denom = denominator(problem, run);
            for solver in 0..n_solvers {
                if let (Some(count), Some(denom)) = (work.get(problem, solver, run), denom) {
                    let ratio = count as f64 / denom;
                    if ratio.is_finite() {
                        ratio_max = ratio_max.max(ratio);
                    }
                    stacked[[run * n_problems + problem, solver]] = ratio;
                }
            }
        }
    }

    // Sort each run's block per solver.
    for run in 0..n_runs {
        let rows = run * n_problems..(run + 1) * n_problems;
        for mut column in stacked.slice_mut(s![rows, ..]).columns_mut() {
            let mut values = column.to_vec();
            values.sort_by(f64::total_cmp);
            column.assign(&Array1::from(values));
        }
    }

    let mut x = Array2::zeros((n_rows, n_solvers));
    let mut y = Array3::zeros((n_rows, n_solvers, n_runs));
    for solver in 0..n_solvers {
        let column = stacked.column(solver);
        let mut order: Vec<usize> = (0..n_rows).collect();
        order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));

        for (row, &source) in order.iter().enumerate() {
            x[[row, solver]] = column[source];
        }
        for run in 0..n_runs {
            let mut fraction = 0.0;
            for (row, &source) in order.iter().enumerate() {
                if source / n_problems == run {
                    fraction = (source % n_problems + 1) as f64 / n_problems as f64;
                }
                y[[row, solver, run]] = fraction;
            }
        }
    }

    (x, y, ratio_max)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{Array, array};
    use proptest::prelude::*;

    use super::*;

    fn counts(shape: (usize, usize, usize), values: Vec<Option<usize>>) -> WorkCounts {
        WorkCounts::new(Array::from_shape_vec(shape, values).unwrap())
    }

    #[test]
    fn performance_profile_of_two_solvers() {
        // Problem 0: solver 0 needs 1 evaluation, solver 1 needs 2.
        // Problem 1: solver 0 needs 4, solver 1 never solves it.
        let work = counts((2, 2, 1), vec![Some(1), Some(2), Some(4), None]);

        let curves = performance_profile(&work);

        assert_eq!(curves.kind(), ProfileKind::Performance);
        assert_relative_eq!(curves.ratio_max(), 2.0);
        assert_relative_eq!(curves.sentinel(), 4.0);
        assert_eq!(curves.x(), &array![[1.0, 1.0], [1.0, 2.0], [1.0, 4.0], [4.0, 4.0]]);

        let first = curves.curve(0).unwrap();
        assert_eq!(first.y.column(0), array![0.0, 0.5, 1.0, 1.0]);
        let second = curves.curve(1).unwrap();
        assert_eq!(second.y.column(0), array![0.0, 0.5, 1.0, 1.0]);
        assert!(curves.curve(2).is_none());
    }

    #[test]
    fn data_profile_divides_by_simplex_cost() {
        let work = counts((2, 1, 1), vec![Some(3), Some(12)]);

        let curves = data_profile(&work, &[2, 5]).unwrap();

        assert_eq!(curves.kind(), ProfileKind::Data);
        assert_relative_eq!(curves.ratio_max(), 2.0);
        assert_eq!(curves.x().column(0), array![0.0, 1.0, 2.0, 4.0]);
        assert_eq!(curves.y().slice(s![.., 0, 0]), array![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn runs_step_at_their_own_entries() {
        // One problem solved with equal work in both runs.
        let work = counts((1, 1, 2), vec![Some(2), Some(2)]);

        let curves = data_profile(&work, &[1]).unwrap();

        assert_eq!(curves.x().column(0), array![0.0, 1.0, 1.0, 2.0]);
        // The tie keeps run 0 ahead of run 1.
        assert_eq!(curves.y().slice(s![.., 0, 0]), array![0.0, 1.0, 1.0, 1.0]);
        assert_eq!(curves.y().slice(s![.., 0, 1]), array![0.0, 0.0, 1.0, 1.0]);

        let band = curves.run_band(0).unwrap();
        assert_eq!(band.min, array![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(band.mean, array![0.0, 0.5, 1.0, 1.0]);
        assert_eq!(band.max, array![0.0, 1.0, 1.0, 1.0]);
        assert!(curves.run_band(1).is_none());
    }

    #[test]
    fn zero_problems_give_empty_curves() {
        let work = counts((0, 2, 3), vec![]);

        let performance = performance_profile(&work);
        let data = data_profile(&work, &[]).unwrap();

        assert!(performance.is_empty());
        assert!(data.is_empty());
        assert_eq!(performance.x(), &array![[1.0, 1.0]]);
        assert_eq!(data.x(), &array![[0.0, 0.0]]);
        assert_eq!(data.y().dim(), (1, 2, 3));
    }

    #[test]
    fn nothing_solved_sits_at_sentinel() {
        let work = counts((2, 2, 1), vec![None; 4]);

        let performance = performance_profile(&work);
        let data = data_profile(&work, &[1, 1]).unwrap();

        assert_relative_eq!(performance.sentinel(), 1.0);
        assert!(performance.x().iter().all(|&x| x == 1.0));
        assert_relative_eq!(data.ratio_max(), f64::EPSILON);
        assert!(data.x().iter().skip(2).all(|&x| x == data.sentinel()));
    }

    #[test]
    fn data_profile_rejects_wrong_dimension_count() {
        let work = counts((2, 1, 1), vec![Some(1), Some(1)]);

        assert_eq!(
            data_profile(&work, &[1]),
            Err(ProfileError::ProblemCount {
                expected: 2,
                actual: 1,
            })
        );
    }

    #[cfg(feature = "serde-derive")]
    #[test]
    fn curves_serialize() {
        let work = counts((1, 1, 1), vec![Some(1)]);
        let curves = performance_profile(&work);

        let json = serde_json::to_value(&curves).unwrap();
        assert_eq!(json["kind"], "Performance");
        assert_eq!(json["ratio_max"], 1.0);

        let back: ProfileCurves = serde_json::from_value(json).unwrap();
        assert_eq!(back, curves);

        let curve = curves.curve(0).unwrap();
        let json = serde_json::to_value(&curve).unwrap();
        assert!(json.get("x").is_some() && json.get("y").is_some());
        let back: ProfileCurve = serde_json::from_value(json).unwrap();
        assert_eq!(back, curve);

        let band = curves.run_band(0).unwrap();
        let json = serde_json::to_value(&band).unwrap();
        assert!(json.get("mean").is_some());
    }

    fn work_strategy() -> impl Strategy<Value = WorkCounts> {
        (0..5_usize, 1..4_usize, 1..4_usize).prop_flat_map(|(p, s, r)| {
            prop::collection::vec(prop::option::of(1..50_usize), p * s * r)
                .prop_map(move |values| counts((p, s, r), values))
        })
    }

    proptest! {
        #[test]
        fn curves_are_monotone_and_bounded(work in work_strategy()) {
            let dimensions = vec![3; work.n_problems()];
            for curves in [performance_profile(&work), data_profile(&work, &dimensions).unwrap()] {
                for solver in 0..curves.n_solvers() {
                    let curve = curves.curve(solver).unwrap();
                    for pair in curve.x.windows(2) {
                        prop_assert!(pair[0] <= pair[1]);
                    }
                    for run in curve.y.columns() {
                        prop_assert_eq!(run[0], 0.0);
                        for pair in run.windows(2) {
                            prop_assert!(pair[0] <= pair[1]);
                        }
                        prop_assert!(run.iter().all(|&v| (0.0..=1.0).contains(&v)));
                        if work.n_problems() > 0 {
                            prop_assert_eq!(run[run.len() - 1], 1.0);
                        }
                    }
                    prop_assert!(curve.x.iter().all(|&x| x <= curves.sentinel()));
                }
            }
        }
    }
}
