use crate::{EvaluationError, FeaturedProblem};

/// An optimization solver under benchmark.
///
/// A solver minimizes the problem's objective from [`FeaturedProblem::x0`]
/// by calling [`FeaturedProblem::fun`]. Only the recorded evaluations
/// matter to the benchmark, so the solver returns no solution. Evaluation
/// errors may be propagated with `?`: they end the run, which is expected
/// once the budget is spent.
pub trait Solver {
    /// Returns the name shown for this solver in reports.
    fn label(&self) -> &str;

    /// Runs the solver on `problem`.
    ///
    /// # Errors
    ///
    /// Returns the evaluation error that ended the run, if any.
    fn solve(&self, problem: &mut FeaturedProblem<'_>) -> Result<(), EvaluationError>;
}
