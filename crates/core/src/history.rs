use ndarray::Array1;

/// The ordered record of one solver run on one problem.
///
/// Index 0 holds the first evaluation the solver requested. Entries are only
/// ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationHistory {
    fun_values: Vec<f64>,
    maxcv_values: Vec<f64>,
}

impl EvaluationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty history with room for `capacity` evaluations.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fun_values: Vec::with_capacity(capacity),
            maxcv_values: Vec::with_capacity(capacity),
        }
    }

    /// Appends an evaluation.
    pub fn push(&mut self, fun_value: f64, maxcv_value: f64) {
        self.fun_values.push(fun_value);
        self.maxcv_values.push(maxcv_value);
    }

    /// Returns the number of recorded evaluations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fun_values.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fun_values.is_empty()
    }

    /// Returns the recorded objective values.
    #[must_use]
    pub fn fun_values(&self) -> &[f64] {
        &self.fun_values
    }

    /// Returns the recorded constraint violations.
    #[must_use]
    pub fn maxcv_values(&self) -> &[f64] {
        &self.maxcv_values
    }

    /// Returns the last recorded evaluation, if any.
    #[must_use]
    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.fun_values.last()?, *self.maxcv_values.last()?))
    }

    /// Returns objective and violation arrays of exactly `len` entries.
    ///
    /// Longer histories are cut at `len`. Shorter ones repeat their last
    /// evaluation, and an empty history is filled with NaN.
    #[must_use]
    pub fn padded(&self, len: usize) -> (Array1<f64>, Array1<f64>) {
        let (fill_fun, fill_maxcv) = self.last().unwrap_or((f64::NAN, f64::NAN));
        let pad = |values: &[f64], fill: f64| {
            values
                .iter()
                .copied()
                .chain(std::iter::repeat(fill))
                .take(len)
                .collect::<Array1<f64>>()
        };

        (
            pad(&self.fun_values, fill_fun),
            pad(&self.maxcv_values, fill_maxcv),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut history = EvaluationHistory::new();
        history.push(3.0, 0.0);
        history.push(2.0, 0.5);

        assert_eq!(history.len(), 2);
        assert_eq!(history.fun_values(), &[3.0, 2.0]);
        assert_eq!(history.maxcv_values(), &[0.0, 0.5]);
        assert_eq!(history.last(), Some((2.0, 0.5)));
    }

    #[test]
    fn pads_by_repeating_last_evaluation() {
        let mut history = EvaluationHistory::with_capacity(4);
        history.push(3.0, 0.1);
        history.push(1.0, 0.0);

        let (fun, maxcv) = history.padded(4);

        assert_eq!(fun.to_vec(), vec![3.0, 1.0, 1.0, 1.0]);
        assert_eq!(maxcv.to_vec(), vec![0.1, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn cuts_long_histories() {
        let mut history = EvaluationHistory::new();
        for i in 0..5 {
            history.push(f64::from(i), 0.0);
        }

        let (fun, _) = history.padded(3);

        assert_eq!(fun.to_vec(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_history_pads_with_nan() {
        let history = EvaluationHistory::new();

        let (fun, maxcv) = history.padded(2);

        assert!(history.is_empty());
        assert!(fun.iter().all(|v| v.is_nan()));
        assert!(maxcv.iter().all(|v| v.is_nan()));
    }
}
