/// Defines a test problem to be solved by the benchmarked solvers.
///
/// A problem maps a point `x` to an objective value and a constraint
/// violation. Solvers search for the point that minimizes the objective while
/// keeping the violation at zero.
///
/// Problems report failures through the returned values: a NaN or infinite
/// objective is a valid answer and is handled by the merit reduction.
pub trait Problem {
    /// Computes the objective value at `x`.
    fn objective(&self, x: &[f64]) -> f64;

    /// Computes the maximum constraint violation at `x`.
    ///
    /// Unconstrained problems keep the default of zero.
    fn maxcv(&self, x: &[f64]) -> f64 {
        let _ = x;
        0.0
    }

    /// Returns the starting point handed to every solver.
    fn x0(&self) -> &[f64];

    /// Returns the number of variables.
    fn dimension(&self) -> usize {
        self.x0().len()
    }
}
