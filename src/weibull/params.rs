//! Weibull wind-speed distribution parameters.
//!
//! Wind speeds at most sites are well described by the two-parameter
//! Weibull distribution with scale A (m/s) and shape k.

use u_numflow::special::ln_gamma;

use crate::error::{Result, WindError};

/// Gamma function for positive arguments, via `exp(ln Γ(x))`.
pub(crate) fn gamma(x: f64) -> f64 {
    ln_gamma(x).exp()
}

/// Fitted or supplied Weibull parameters (A, k).
///
/// Immutable once created; both parameters are positive and finite.
///
/// # Mathematical Background
///
/// ```text
/// f(v) = (k/A) (v/A)^(k-1) exp(-(v/A)^k)
/// F(v) = 1 - exp(-(v/A)^k)
/// E[v] = A Γ(1 + 1/k)
/// E[v³] = A³ Γ(1 + 3/k)
/// ```
///
/// # Examples
///
/// ```
/// use u_wind::weibull::WeibullParams;
///
/// let p = WeibullParams::new(9.0, 2.0).unwrap();
/// // F(A) = 1 - exp(-1) for any shape
/// assert!((p.cdf(9.0) - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
/// assert!(p.mean() > 7.9 && p.mean() < 8.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeibullParams {
    /// Scale parameter A (m/s).
    scale: f64,
    /// Shape parameter k.
    shape: f64,
}

impl WeibullParams {
    /// Creates parameters from scale A and shape k.
    ///
    /// # Errors
    /// `InvalidInput` if either parameter is non-positive or non-finite.
    pub fn new(scale: f64, shape: f64) -> Result<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "Weibull scale A must be positive and finite, got {scale}"
            )));
        }
        if !shape.is_finite() || shape <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "Weibull shape k must be positive and finite, got {shape}"
            )));
        }
        Ok(Self { scale, shape })
    }

    /// Creates parameters from a mean wind speed and shape k.
    ///
    /// ```text
    /// A = Vmean / Γ(1 + 1/k)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use u_wind::weibull::WeibullParams;
    ///
    /// let p = WeibullParams::from_mean_speed(8.0, 2.0).unwrap();
    /// assert!((p.mean() - 8.0).abs() < 1e-9);
    /// ```
    pub fn from_mean_speed(mean_speed: f64, shape: f64) -> Result<Self> {
        if !mean_speed.is_finite() || mean_speed <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "mean wind speed must be positive and finite, got {mean_speed}"
            )));
        }
        if !shape.is_finite() || shape <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "Weibull shape k must be positive and finite, got {shape}"
            )));
        }
        Self::new(mean_speed / gamma(1.0 + 1.0 / shape), shape)
    }

    /// Returns the scale parameter A.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the shape parameter k.
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Probability density at wind speed `v`.
    ///
    /// Returns 0 for `v < 0`. At `v == 0` the density is its limit:
    /// 0 for k > 1, 1/A for k == 1, and +inf for k < 1.
    pub fn pdf(&self, v: f64) -> f64 {
        let (a, k) = (self.scale, self.shape);
        if v < 0.0 {
            return 0.0;
        }
        if v == 0.0 {
            return if k > 1.0 {
                0.0
            } else if k == 1.0 {
                1.0 / a
            } else {
                f64::INFINITY
            };
        }
        let z = v / a;
        (k / a) * z.powf(k - 1.0) * (-z.powf(k)).exp()
    }

    /// Cumulative probability of a wind speed at or below `v`.
    pub fn cdf(&self, v: f64) -> f64 {
        1.0 - self.exceedance(v)
    }

    /// Probability of a wind speed above `v`.
    pub fn exceedance(&self, v: f64) -> f64 {
        if v <= 0.0 {
            return 1.0;
        }
        (-(v / self.scale).powf(self.shape)).exp()
    }

    /// Mean wind speed `A Γ(1 + 1/k)`.
    pub fn mean(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// Third raw moment `A³ Γ(1 + 3/k)`, proportional to mean wind power density.
    pub fn third_moment(&self) -> f64 {
        self.scale.powi(3) * gamma(1.0 + 3.0 / self.shape)
    }

    /// Wind speed exceeded with probability `p`.
    ///
    /// # Returns
    /// `None` if `p` is outside (0, 1).
    pub fn speed_exceeded_with(&self, p: f64) -> Option<f64> {
        if p <= 0.0 || p >= 1.0 {
            return None;
        }
        Some(self.scale * (-p.ln()).powf(1.0 / self.shape))
    }

    /// Density evaluated at each of `speeds`, for smooth presentation curves.
    pub fn pdf_curve(&self, speeds: &[f64]) -> Vec<f64> {
        speeds.iter().map(|&v| self.pdf(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates() {
        assert!(WeibullParams::new(9.0, 2.0).is_ok());
        assert!(WeibullParams::new(0.0, 2.0).is_err());
        assert!(WeibullParams::new(9.0, -1.0).is_err());
        assert!(WeibullParams::new(f64::NAN, 2.0).is_err());
        assert!(WeibullParams::new(9.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_gamma_known_values() {
        assert!((gamma(1.0) - 1.0).abs() < 1e-10);
        assert!((gamma(5.0) - 24.0).abs() < 1e-8);
        assert!((gamma(1.5) - std::f64::consts::PI.sqrt() / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_pdf_rayleigh() {
        // k = 2 is the Rayleigh distribution: f(v) = (2v/A²) exp(-(v/A)²)
        let p = WeibullParams::new(9.0, 2.0).unwrap();
        let v = 5.0_f64;
        let expected = 2.0 * v / 81.0 * (-(v / 9.0).powi(2)).exp();
        assert!((p.pdf(v) - expected).abs() < 1e-14);
    }

    #[test]
    fn test_pdf_at_zero() {
        assert_eq!(WeibullParams::new(9.0, 2.0).unwrap().pdf(0.0), 0.0);
        assert_eq!(WeibullParams::new(4.0, 1.0).unwrap().pdf(0.0), 0.25);
        assert!(WeibullParams::new(9.0, 0.8).unwrap().pdf(0.0).is_infinite());
        assert_eq!(WeibullParams::new(9.0, 2.0).unwrap().pdf(-1.0), 0.0);
    }

    #[test]
    fn test_pdf_integrates_to_one() {
        let p = WeibullParams::new(7.5, 2.3).unwrap();
        let h = 0.001;
        let integral: f64 = (0..60_000).map(|i| p.pdf((i as f64 + 0.5) * h) * h).sum();
        assert!((integral - 1.0).abs() < 1e-6, "integral = {integral}");
    }

    #[test]
    fn test_exceedance_and_cdf() {
        let p = WeibullParams::new(10.0, 2.0).unwrap();
        assert_eq!(p.exceedance(0.0), 1.0);
        assert!((p.cdf(10.0) + p.exceedance(10.0) - 1.0).abs() < 1e-15);
        let v = p.speed_exceeded_with(0.5).unwrap();
        assert!((p.exceedance(v) - 0.5).abs() < 1e-12);
        assert!(p.speed_exceeded_with(0.0).is_none());
        assert!(p.speed_exceeded_with(1.0).is_none());
    }

    #[test]
    fn test_from_mean_speed() {
        let p = WeibullParams::from_mean_speed(8.0, 2.0).unwrap();
        // A = 8 / Γ(1.5) = 8 / (√π / 2)
        let expected = 16.0 / std::f64::consts::PI.sqrt();
        assert!((p.scale() - expected).abs() < 1e-9);
        assert!(WeibullParams::from_mean_speed(0.0, 2.0).is_err());
        assert!(WeibullParams::from_mean_speed(8.0, 0.0).is_err());
    }

    #[test]
    fn test_third_moment_exponential() {
        // k = 1: E[v³] = 6 A³
        let p = WeibullParams::new(2.0, 1.0).unwrap();
        assert!((p.third_moment() - 48.0).abs() < 1e-8);
    }

    #[test]
    fn test_pdf_curve() {
        let p = WeibullParams::new(9.0, 2.0).unwrap();
        let curve = p.pdf_curve(&[0.0, 1.0, 2.0]);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[0], 0.0);
        assert!(curve[2] > curve[1]);
    }
}
