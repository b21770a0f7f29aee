/// The tolerance levels swept by a benchmark, from loosest to strictest.
pub const TOLERANCES: [f64; 10] = [
    1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 1e-8, 1e-9, 1e-10,
];

/// Returns the merit value a run must reach to solve a problem.
///
/// The threshold sits a fraction `tolerance` of the way from the best merit
/// `merit_min` back to the initial merit `merit_init`, and never below
/// `merit_min`. A non-finite `merit_min` gives `-∞`.
#[must_use]
pub fn threshold(merit_init: f64, merit_min: f64, tolerance: f64) -> f64 {
    if merit_min.is_finite() {
        (tolerance * merit_init + (1.0 - tolerance) * merit_min).max(merit_min)
    } else {
        f64::NEG_INFINITY
    }
}

/// Formats a tolerance compactly in scientific notation, e.g. `"1e-3"`.
#[must_use]
pub fn tolerance_label(tolerance: f64) -> String {
    format!("{tolerance:e}")
}
