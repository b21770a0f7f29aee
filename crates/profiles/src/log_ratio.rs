use ndarray::Array1;

use crate::{ProfileError, WorkCounts};

/// Sorted head-to-head comparison of two solvers.
///
/// Negative values favor the first solver, positive values the second.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LogRatioProfile {
    values: Array1<f64>,
    ratio_max: f64,
}

impl LogRatioProfile {
    /// Returns one value per (problem, run), sorted ascending.
    #[must_use]
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Returns the largest finite absolute log-ratio.
    #[must_use]
    pub fn ratio_max(&self) -> f64 {
        self.ratio_max
    }
}

/// Builds the log-ratio profile of exactly two solvers.
///
/// For each (problem, run) the value is `log2(w0 / w1)` when both solvers
/// solved it, `±2 · ratio_max` when only one did (positive when solver 0
/// failed), and 0 when neither did.
///
/// # Errors
///
/// Returns [`ProfileError::SolverCount`] unless `work` holds two solvers.
#[allow(clippy::cast_precision_loss)]
pub fn log_ratio_profile(work: &WorkCounts) -> Result<LogRatioProfile, ProfileError> {
    if work.n_solvers() != 2 {
        return Err(ProfileError::SolverCount(work.n_solvers()));
    }

    let pairs: Vec<_> = (0..work.n_problems())
        .flat_map(|problem| (0..work.n_runs()).map(move |run| (problem, run)))
        .map(|(problem, run)| (work.get(problem, 0, run), work.get(problem, 1, run)))
        .collect();

    let ratio_max = pairs
        .iter()
        .filter_map(|pair| match *pair {
            (Some(first), Some(second)) => Some((first as f64 / second as f64).log2().abs()),
            _ => None,
        })
        .fold(f64::EPSILON, f64::max);

    let mut values: Vec<f64> = pairs
        .into_iter()
        .map(|pair| match pair {
            (Some(first), Some(second)) => (first as f64 / second as f64).log2(),
            (None, Some(_)) => 2.0 * ratio_max,
            (Some(_), None) => -2.0 * ratio_max,
            (None, None) => 0.0,
        })
        .collect();
    values.sort_by(f64::total_cmp);

    Ok(LogRatioProfile {
        values: Array1::from(values),
        ratio_max,
    })
}
