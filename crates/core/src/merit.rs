use ndarray::{Array, Dimension, Zip};

use crate::ValidationError;

/// Constraint violations at or above this value make a point infeasible.
pub const INFEASIBLE_CV: f64 = 1e-6;

/// Constraint violations at or below this value count as feasible.
pub const FEASIBLE_CV: f64 = 1e-12;

/// Penalty weight applied to violations between the two thresholds.
pub const PENALTY: f64 = 1e8;

/// Maps NaN and `+∞` to `+∞`, leaving every other value unchanged.
#[must_use]
pub fn sanitize(f: f64) -> f64 {
    if f.is_nan() { f64::INFINITY } else { f }
}

/// Combines an objective value and a constraint violation into a merit value.
///
/// - `cv ≥ 1e-6`: the point is infeasible and the merit is `+∞`.
/// - `1e-12 < cv < 1e-6`: the objective is penalized by `1e8 · cv`.
/// - otherwise the merit is the objective itself.
///
/// A NaN violation counts as feasible.
#[must_use]
pub fn merit_of(f: f64, cv: f64) -> f64 {
    if cv >= INFEASIBLE_CV {
        f64::INFINITY
    } else if cv > FEASIBLE_CV {
        sanitize(f) + PENALTY * cv
    } else {
        sanitize(f)
    }
}

/// Applies [`merit_of`] element-wise to objective and violation arrays.
///
/// # Errors
///
/// Returns [`ValidationError::ShapeMismatch`] if the arrays differ in shape.
pub fn merit_values<D: Dimension>(
    fun_values: &Array<f64, D>,
    maxcv_values: &Array<f64, D>,
) -> Result<Array<f64, D>, ValidationError> {
    if fun_values.shape() != maxcv_values.shape() {
        return Err(ValidationError::ShapeMismatch {
            left: fun_values.shape().to_vec(),
            right: maxcv_values.shape().to_vec(),
        });
    }

    Ok(Zip::from(fun_values)
        .and(maxcv_values)
        .map_collect(|&f, &cv| merit_of(f, cv)))
}
