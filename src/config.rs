//! Solver configuration for iterative estimators.

/// Iteration and tolerance bounds for the Weibull solvers.
///
/// Both the least-squares fit and the European Wind Atlas root solve are
/// iterative. A solver that exhausts `max_iterations` reports a
/// [`WindError::FittingFailure`](crate::WindError::FittingFailure).
///
/// # Examples
///
/// ```
/// use u_wind::SolverConfig;
///
/// let config = SolverConfig::default().with_max_iterations(500);
/// assert_eq!(config.max_iterations, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of solver iterations, default 200.
    pub max_iterations: usize,
    /// Relative step tolerance for convergence, default 1e-10.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

impl SolverConfig {
    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the relative convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks that the budget is non-zero and the tolerance positive.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_iterations == 0 {
            return Err(crate::WindError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(crate::WindError::invalid_input(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
