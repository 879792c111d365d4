//! Least-squares fit of the Weibull density to a binned frequency curve.
//!
//! Minimizes the sum of squared residuals between an empirical frequency
//! curve and the Weibull PDF over (A, k) with a Levenberg-Marquardt
//! iteration.

use tracing::debug;

use super::WeibullParams;
use crate::config::SolverConfig;
use crate::error::{Result, WindError};

const METHOD: &str = "least_squares";

/// Starting point (A, k) of the iteration.
const INITIAL_SCALE: f64 = 10.0;
const INITIAL_SHAPE: f64 = 2.0;

/// Damping bounds for Levenberg-Marquardt.
const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;

/// Result of a least-squares Weibull fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// Fitted parameters.
    pub params: WeibullParams,
    /// Sum of squared residuals at the fitted parameters.
    pub sse: f64,
    /// Number of accepted iterations.
    pub iterations: usize,
}

/// Fits Weibull (A, k) to an empirical frequency curve by least squares.
///
/// Uses [`SolverConfig::default`]. See [`least_squares_with`].
///
/// # Examples
///
/// ```
/// use u_wind::weibull::{least_squares, WeibullParams};
///
/// let truth = WeibullParams::new(9.0, 2.0).unwrap();
/// let x: Vec<f64> = (0..=40).map(f64::from).collect();
/// let y = truth.pdf_curve(&x);
/// let fit = least_squares(&y, &x).unwrap();
/// assert!((fit.params.scale() - 9.0).abs() < 1e-6);
/// assert!((fit.params.shape() - 2.0).abs() < 1e-6);
/// ```
pub fn least_squares(frequencies: &[f64], centers: &[f64]) -> Result<LeastSquaresFit> {
    least_squares_with(frequencies, centers, &SolverConfig::default())
}

/// Fits Weibull (A, k) to an empirical frequency curve by least squares.
///
/// `frequencies[i]` is the normalized frequency (density) observed at bin
/// center `centers[i]`. The objective is
///
/// ```text
/// S(A, k) = Σ (y_i - f(x_i; A, k))²
/// ```
///
/// minimized from (A = 10, k = 2) with Levenberg-Marquardt steps
/// `(JᵀJ + λ diag(JᵀJ)) δ = Jᵀ r` using the analytic Jacobian
///
/// ```text
/// ∂f/∂A = f · (k/A) · ((x/A)^k - 1)
/// ∂f/∂k = f · (1/k + ln(x/A) · (1 - (x/A)^k))
/// ```
///
/// A step is accepted only if it keeps both parameters positive and does
/// not increase S. The fit has converged when the relative step falls
/// below `config.tolerance`, the gradient vanishes, or no damped step can
/// reduce S any further.
///
/// # Errors
/// - `InvalidInput`: lengths differ, fewer than 2 points, non-increasing or
///   negative centers, negative or non-finite frequencies, bad config
/// - `DegenerateDistribution`: all frequencies are zero
/// - `FittingFailure`: the objective is not finite at the starting point,
///   or `config.max_iterations` is exhausted
pub fn least_squares_with(
    frequencies: &[f64],
    centers: &[f64],
    config: &SolverConfig,
) -> Result<LeastSquaresFit> {
    config.validate()?;
    validate_curve(frequencies, centers)?;

    let mut a = INITIAL_SCALE;
    let mut k = INITIAL_SHAPE;
    let mut sse = sum_squared_residuals(frequencies, centers, a, k);
    if !sse.is_finite() {
        return Err(WindError::fitting_failure(
            METHOD,
            "objective is not finite at the starting point",
        ));
    }

    let mut lambda = LAMBDA_INIT;

    for iter in 0..config.max_iterations {
        // Normal equations JᵀJ (symmetric 2x2) and gradient Jᵀr.
        let (mut jaa, mut jak, mut jkk) = (0.0_f64, 0.0_f64, 0.0_f64);
        let (mut ga, mut gk) = (0.0_f64, 0.0_f64);
        for (&y, &x) in frequencies.iter().zip(centers) {
            let (f, da, dk) = pdf_with_gradient(x, a, k);
            let r = y - f;
            jaa += da * da;
            jak += da * dk;
            jkk += dk * dk;
            ga += da * r;
            gk += dk * r;
        }

        if ga.abs().max(gk.abs()) < f64::EPSILON * f64::EPSILON {
            return finish(a, k, sse, iter);
        }

        // Raise the damping until a step reduces the objective.
        let (step_a, step_k, new_sse) = loop {
            let daa = jaa * (1.0 + lambda);
            let dkk = jkk * (1.0 + lambda);
            let det = daa * dkk - jak * jak;
            if det.abs() > 0.0 && det.is_finite() {
                let step_a = (dkk * ga - jak * gk) / det;
                let step_k = (daa * gk - jak * ga) / det;
                let (na, nk) = (a + step_a, k + step_k);
                if na > 0.0 && nk > 0.0 && na.is_finite() && nk.is_finite() {
                    let candidate = sum_squared_residuals(frequencies, centers, na, nk);
                    if candidate.is_finite() && candidate <= sse {
                        break (step_a, step_k, candidate);
                    }
                }
            }
            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                // No damped step improves the fit: (a, k) is a local minimum.
                return finish(a, k, sse, iter);
            }
        };

        a += step_a;
        k += step_k;
        sse = new_sse;
        lambda = (lambda / 10.0).max(LAMBDA_MIN);

        let tol = config.tolerance;
        if step_a.abs() <= tol * (a.abs() + tol) && step_k.abs() <= tol * (k.abs() + tol) {
            return finish(a, k, sse, iter + 1);
        }
    }

    Err(WindError::fitting_failure(
        METHOD,
        format!(
            "did not converge within {} iterations (A = {a}, k = {k})",
            config.max_iterations
        ),
    ))
}

fn finish(a: f64, k: f64, sse: f64, iterations: usize) -> Result<LeastSquaresFit> {
    let params = WeibullParams::new(a, k)
        .map_err(|e| WindError::fitting_failure(METHOD, e.to_string()))?;
    debug!(
        scale = a,
        shape = k,
        sse,
        iterations,
        "Least-squares Weibull fit converged"
    );
    Ok(LeastSquaresFit {
        params,
        sse,
        iterations,
    })
}

fn validate_curve(frequencies: &[f64], centers: &[f64]) -> Result<()> {
    if frequencies.len() != centers.len() {
        return Err(WindError::invalid_input(format!(
            "frequency and center sequences differ in length ({} vs {})",
            frequencies.len(),
            centers.len()
        )));
    }
    if centers.len() < 2 {
        return Err(WindError::invalid_input(format!(
            "at least 2 points required, got {}",
            centers.len()
        )));
    }
    if !centers.iter().all(|&x| x.is_finite() && x >= 0.0) {
        return Err(WindError::invalid_input(
            "bin centers must be finite and non-negative",
        ));
    }
    if centers.windows(2).any(|w| w[1] <= w[0]) {
        return Err(WindError::invalid_input(
            "bin centers must be strictly increasing",
        ));
    }
    if !frequencies.iter().all(|&y| y.is_finite() && y >= 0.0) {
        return Err(WindError::invalid_input(
            "frequencies must be finite and non-negative",
        ));
    }
    if frequencies.iter().all(|&y| y == 0.0) {
        return Err(WindError::degenerate("all frequencies are zero"));
    }
    Ok(())
}

/// Weibull PDF and its partial derivatives with respect to A and k.
fn pdf_with_gradient(x: f64, a: f64, k: f64) -> (f64, f64, f64) {
    if x <= 0.0 {
        // Limits at the origin; the gradient is only needed where f is finite.
        return if k > 1.0 {
            (0.0, 0.0, 0.0)
        } else if k == 1.0 {
            (1.0 / a, -1.0 / (a * a), 0.0)
        } else {
            (f64::INFINITY, 0.0, 0.0)
        };
    }
    let z = x / a;
    let u = z.powf(k);
    let f = (k / a) * z.powf(k - 1.0) * (-u).exp();
    let df_da = f * (k / a) * (u - 1.0);
    let df_dk = f * (1.0 / k + z.ln() * (1.0 - u));
    (f, df_da, df_dk)
}

fn sum_squared_residuals(frequencies: &[f64], centers: &[f64], a: f64, k: f64) -> f64 {
    frequencies
        .iter()
        .zip(centers)
        .map(|(&y, &x)| {
            let r = y - pdf_with_gradient(x, a, k).0;
            r * r
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_centers() -> Vec<f64> {
        (0..=40).map(f64::from).collect()
    }

    #[test]
    fn test_recovers_noiseless_curve() {
        let truth = WeibullParams::new(9.0, 2.0).unwrap();
        let x = unit_centers();
        let y = truth.pdf_curve(&x);

        let fit = least_squares(&y, &x).expect("should converge");
        assert!(
            (fit.params.scale() - 9.0).abs() < 0.01 * 9.0,
            "A = {}",
            fit.params.scale()
        );
        assert!(
            (fit.params.shape() - 2.0).abs() < 0.01 * 2.0,
            "k = {}",
            fit.params.shape()
        );
        assert!(fit.sse < 1e-12, "sse = {}", fit.sse);
    }

    #[test]
    fn test_recovers_other_shapes() {
        for (a, k) in [(6.0, 1.6), (11.0, 2.8), (7.0, 1.2)] {
            let truth = WeibullParams::new(a, k).unwrap();
            let x: Vec<f64> = (0..=40).map(|i| i as f64 + 0.5).collect();
            let y = truth.pdf_curve(&x);
            let fit = least_squares(&y, &x).expect("should converge");
            assert!(
                (fit.params.scale() - a).abs() < 1e-4 * a,
                "A = {}, expected {a}",
                fit.params.scale()
            );
            assert!(
                (fit.params.shape() - k).abs() < 1e-4 * k,
                "k = {}, expected {k}",
                fit.params.shape()
            );
        }
    }

    #[test]
    fn test_noisy_curve_close() {
        let truth = WeibullParams::new(8.0, 2.2).unwrap();
        let x = unit_centers();
        // Deterministic +/- 3% perturbation
        let y: Vec<f64> = truth
            .pdf_curve(&x)
            .iter()
            .enumerate()
            .map(|(i, f)| f * if i % 2 == 0 { 1.03 } else { 0.97 })
            .collect();
        let fit = least_squares(&y, &x).expect("should converge");
        assert!((fit.params.scale() - 8.0).abs() < 0.3);
        assert!((fit.params.shape() - 2.2).abs() < 0.2);
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let x = unit_centers();
        let y = vec![0.0; x.len()];
        assert!(matches!(
            least_squares(&y, &x),
            Err(WindError::DegenerateDistribution { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            least_squares(&[0.1, 0.2], &[1.0]),
            Err(WindError::InvalidInput { .. })
        ));
        assert!(least_squares(&[0.1], &[1.0]).is_err());
        assert!(least_squares(&[0.1, 0.2], &[2.0, 1.0]).is_err());
        assert!(least_squares(&[0.1, -0.2], &[1.0, 2.0]).is_err());
        assert!(least_squares(&[0.1, f64::NAN], &[1.0, 2.0]).is_err());
        assert!(least_squares(&[0.1, 0.2], &[-1.0, 2.0]).is_err());
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let truth = WeibullParams::new(9.0, 2.0).unwrap();
        let x = unit_centers();
        let y = truth.pdf_curve(&x);
        let config = SolverConfig::default()
            .with_max_iterations(1)
            .with_tolerance(1e-15);
        assert!(matches!(
            least_squares_with(&y, &x, &config),
            Err(WindError::FittingFailure { .. })
        ));
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let (x, a, k) = (6.5, 9.0, 2.1);
        let (_, da, dk) = pdf_with_gradient(x, a, k);
        let h = 1e-6;
        let fd_a = (pdf_with_gradient(x, a + h, k).0 - pdf_with_gradient(x, a - h, k).0) / (2.0 * h);
        let fd_k = (pdf_with_gradient(x, a, k + h).0 - pdf_with_gradient(x, a, k - h).0) / (2.0 * h);
        assert!((da - fd_a).abs() < 1e-8, "{da} vs {fd_a}");
        assert!((dk - fd_k).abs() < 1e-8, "{dk} vs {fd_k}");
    }
}
