use optiprof_core::{EvaluationHistory, Feature, Problem, RunSeed, ValidationError};

use crate::EvaluationError;

/// A problem as one solver run sees it.
///
/// Every objective evaluation passes through the active [`Feature`] and is
/// recorded, together with the constraint violation at the same point, until
/// the evaluation budget runs out. A simulated failure ends the run: the
/// failing call and every later call return an error and nothing more is
/// recorded.
pub struct FeaturedProblem<'a> {
    problem: &'a dyn Problem,
    feature: &'a Feature,
    seed: RunSeed,
    max_eval: usize,
    x0: Vec<f64>,
    history: EvaluationHistory,
    stopped: bool,
}

impl<'a> FeaturedProblem<'a> {
    /// Wraps `problem` for run number `run` with a budget of `max_eval`
    /// evaluations.
    ///
    /// The run number seeds every random perturbation of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature shifts the starting point by a vector
    /// of the wrong length.
    pub fn new(
        problem: &'a dyn Problem,
        feature: &'a Feature,
        max_eval: usize,
        run: usize,
    ) -> Result<Self, ValidationError> {
        let seed = RunSeed::from(run);
        let x0 = feature.perturb_x0(problem.x0(), Some(seed))?;

        Ok(Self {
            problem,
            feature,
            seed,
            max_eval,
            x0,
            history: EvaluationHistory::with_capacity(max_eval.min(1 << 16)),
            stopped: false,
        })
    }

    /// Returns the starting point, shifted when the feature randomizes it.
    #[must_use]
    pub fn x0(&self) -> &[f64] {
        &self.x0
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.problem.dimension()
    }

    #[must_use]
    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Returns the number of recorded evaluations.
    #[must_use]
    pub fn n_eval(&self) -> usize {
        self.history.len()
    }

    /// Evaluates the perturbed objective at `x` and records it.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::BudgetExhausted`] once the budget is spent,
    /// [`EvaluationError::Simulated`] when the feature makes this evaluation
    /// fail, and [`EvaluationError::Stopped`] for any call after such a
    /// failure.
    pub fn fun(&mut self, x: &[f64]) -> Result<f64, EvaluationError> {
        if self.stopped {
            return Err(EvaluationError::Stopped);
        }
        if self.history.len() >= self.max_eval {
            return Err(EvaluationError::BudgetExhausted(self.max_eval));
        }

        let raw = self.problem.objective(x);
        match self.feature.apply(x, raw, Some(self.seed)) {
            Ok(value) => {
                self.history.push(value, self.problem.maxcv(x));
                Ok(value)
            }
            Err(failure) => {
                self.stopped = true;
                Err(failure.into())
            }
        }
    }

    /// Returns the constraint violation at `x`. Not counted or recorded.
    #[must_use]
    pub fn maxcv(&self, x: &[f64]) -> f64 {
        self.problem.maxcv(x)
    }

    #[must_use]
    pub fn history(&self) -> &EvaluationHistory {
        &self.history
    }

    #[must_use]
    pub fn into_history(self) -> EvaluationHistory {
        self.history
    }
}

impl std::fmt::Debug for FeaturedProblem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeaturedProblem")
            .field("feature", &self.feature.name())
            .field("seed", &self.seed)
            .field("max_eval", &self.max_eval)
            .field("n_eval", &self.history.len())
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use optiprof_core::feature::{FeatureRng, RandomizeX0Options, ToughOptions};

    use super::*;

    struct Line;

    impl Problem for Line {
        fn objective(&self, x: &[f64]) -> f64 {
            2.0 * x[0]
        }

        fn maxcv(&self, x: &[f64]) -> f64 {
            (-x[0]).max(0.0)
        }

        fn x0(&self) -> &[f64] {
            &[1.0]
        }
    }

    #[test]
    fn records_objective_and_violation() {
        let feature = Feature::plain();
        let mut problem = FeaturedProblem::new(&Line, &feature, 10, 0).unwrap();

        assert_eq!(problem.fun(&[3.0]), Ok(6.0));
        assert_eq!(problem.fun(&[-1.0]), Ok(-2.0));
        assert_eq!(problem.maxcv(&[-1.0]), 1.0);

        assert_eq!(problem.n_eval(), 2);
        assert_eq!(problem.history().fun_values(), &[6.0, -2.0]);
        assert_eq!(problem.history().maxcv_values(), &[0.0, 1.0]);
    }

    #[test]
    fn stops_at_budget() {
        let feature = Feature::plain();
        let mut problem = FeaturedProblem::new(&Line, &feature, 2, 0).unwrap();

        assert!(problem.fun(&[1.0]).is_ok());
        assert!(problem.fun(&[2.0]).is_ok());
        assert_eq!(
            problem.fun(&[3.0]),
            Err(EvaluationError::BudgetExhausted(2))
        );
        assert_eq!(problem.into_history().len(), 2);
    }

    #[test]
    fn simulated_failure_ends_the_run() {
        let feature = Feature::tough(ToughOptions {
            rate_error: 1.0,
            ..ToughOptions::default()
        })
        .unwrap();
        let mut problem = FeaturedProblem::new(&Line, &feature, 10, 3).unwrap();

        assert_eq!(
            problem.fun(&[1.0]),
            Err(EvaluationError::Simulated(optiprof_core::SimulatedFailure))
        );
        assert_eq!(problem.fun(&[1.0]), Err(EvaluationError::Stopped));
        assert!(problem.history().is_empty());
    }

    #[test]
    fn randomized_start_depends_on_run() {
        let feature = Feature::randomize_x0(RandomizeX0Options::default()).unwrap();

        let first = FeaturedProblem::new(&Line, &feature, 10, 0).unwrap();
        let again = FeaturedProblem::new(&Line, &feature, 10, 0).unwrap();
        let second = FeaturedProblem::new(&Line, &feature, 10, 1).unwrap();

        assert_eq!(first.x0(), again.x0());
        assert_ne!(first.x0(), second.x0());
        assert_eq!(first.dimension(), 1);
        assert!((first.x0()[0] - 1.0).abs() < 0.1);
    }

    #[test]
    fn mismatched_start_shift_is_rejected() {
        let feature = Feature::randomize_x0(RandomizeX0Options {
            n_runs: 1,
            distribution: Arc::new(|_rng: &mut FeatureRng, n: usize| vec![0.5; n + 2]),
        })
        .unwrap();

        assert_eq!(
            FeaturedProblem::new(&Line, &feature, 10, 0).unwrap_err(),
            ValidationError::ShapeMismatch {
                left: vec![1],
                right: vec![3],
            }
        );
    }
}
