//! Expected annual hours of occurrence per wind-speed bin.
//!
//! Projects a Weibull distribution onto a one-year time budget using the
//! closed-form density, without resampling.
//!
//! ```text
//! hours(v) = f(v; A, k) · 8760 · Δv
//! ```
//!
//! where `v` is the left edge of a bin and `Δv` the (uniform) bin width.
//! The total approaches 8760 only for infinitely fine bins extending to
//! infinity; expect a few hours less for typical 1 m/s bins up to 40 m/s.

use super::WeibullParams;
use crate::error::{Result, WindError};

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Relative tolerance when checking that speed bins are evenly spaced.
const STEP_TOLERANCE: f64 = 1e-9;

/// One row of an [`AnnualHours`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualHoursRow {
    /// Wind speed (bin left edge) in m/s.
    pub speed: f64,
    /// Expected hours per year in the bin.
    pub annual_hours: f64,
    /// `annual_hours / Σ annual_hours`.
    pub normalized: f64,
}

/// Annual hours table, one row per input wind speed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualHours {
    /// Parameters the table was projected from.
    pub params: WeibullParams,
    /// Uniform bin width in m/s.
    pub bin_width: f64,
    /// Rows in increasing speed order.
    pub rows: Vec<AnnualHoursRow>,
}

impl AnnualHours {
    /// Sum of annual hours over all bins.
    pub fn total_hours(&self) -> f64 {
        self.rows.iter().map(|r| r.annual_hours).sum()
    }

    /// Annual hours column.
    pub fn annual_hours(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.annual_hours).collect()
    }

    /// Normalized column.
    pub fn normalized(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.normalized).collect()
    }
}

/// Default speed bins `0, 1, ..., 40` m/s.
pub fn default_speed_bins() -> Vec<f64> {
    (0..=40).map(f64::from).collect()
}

/// Converts Weibull parameters into an annual-hours-per-bin table.
///
/// # Examples
///
/// ```
/// use u_wind::weibull::{default_speed_bins, AnnualHoursProjector};
///
/// let projector = AnnualHoursProjector::from_mean_speed(8.0, 2.0).unwrap();
/// let table = projector.project(&default_speed_bins()).unwrap();
/// assert_eq!(table.rows.len(), 41);
/// let total = table.total_hours();
/// assert!(total > 8700.0 && total <= 8760.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualHoursProjector {
    params: WeibullParams,
}

impl AnnualHoursProjector {
    /// Projects from fitted or supplied parameters.
    pub fn new(params: WeibullParams) -> Self {
        Self { params }
    }

    /// Projects from scale A and shape k.
    ///
    /// # Errors
    /// `InvalidInput` if either parameter is non-positive or non-finite.
    pub fn from_scale_shape(scale: f64, shape: f64) -> Result<Self> {
        Ok(Self::new(WeibullParams::new(scale, shape)?))
    }

    /// Projects from a mean wind speed and shape k (`A = Vmean / Γ(1 + 1/k)`).
    ///
    /// # Errors
    /// `InvalidInput` if either value is non-positive or non-finite.
    pub fn from_mean_speed(mean_speed: f64, shape: f64) -> Result<Self> {
        Ok(Self::new(WeibullParams::from_mean_speed(mean_speed, shape)?))
    }

    /// Parameters used for the projection.
    pub fn params(&self) -> WeibullParams {
        self.params
    }

    /// Computes expected annual hours at each speed in `speeds`.
    ///
    /// `speeds` are bin left edges: at least 2, finite, non-negative,
    /// strictly increasing, and evenly spaced.
    ///
    /// # Errors
    /// - `InvalidInput`: the speed bins violate the constraints above
    /// - `DegenerateDistribution`: the density is zero at every speed, or
    ///   infinite at 0 (k < 1), so nothing can be normalized
    pub fn project(&self, speeds: &[f64]) -> Result<AnnualHours> {
        let bin_width = uniform_step(speeds)?;

        let hours: Vec<f64> = speeds
            .iter()
            .map(|&v| self.params.pdf(v) * HOURS_PER_YEAR * bin_width)
            .collect();
        let total: f64 = hours.iter().sum();
        if !total.is_finite() {
            return Err(WindError::degenerate(format!(
                "density is unbounded at 0 m/s for shape k = {}",
                self.params.shape()
            )));
        }
        if total <= 0.0 {
            return Err(WindError::degenerate(
                "density is zero at every requested speed",
            ));
        }

        let rows = speeds
            .iter()
            .zip(hours)
            .map(|(&speed, annual_hours)| AnnualHoursRow {
                speed,
                annual_hours,
                normalized: annual_hours / total,
            })
            .collect();

        Ok(AnnualHours {
            params: self.params,
            bin_width,
            rows,
        })
    }
}

/// Returns the common step of `speeds`, validating the bin layout.
fn uniform_step(speeds: &[f64]) -> Result<f64> {
    if speeds.len() < 2 {
        return Err(WindError::invalid_input(format!(
            "at least 2 speed bins required, got {}",
            speeds.len()
        )));
    }
    if !speeds.iter().all(|&v| v.is_finite() && v >= 0.0) {
        return Err(WindError::invalid_input(
            "speed bins must be finite and non-negative",
        ));
    }
    let step = speeds[1] - speeds[0];
    if step <= 0.0 {
        return Err(WindError::invalid_input(
            "speed bins must be strictly increasing",
        ));
    }
    if let Some(w) = speeds
        .windows(2)
        .find(|w| ((w[1] - w[0]) - step).abs() > STEP_TOLERANCE * step.max(1.0))
    {
        return Err(WindError::invalid_input(format!(
            "speed bins must be evenly spaced: step {} between {} and {} differs from {step}",
            w[1] - w[0],
            w[0],
            w[1]
        )));
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_hours_near_one_year() {
        for (a, k) in [(9.0, 2.0), (7.0, 2.5), (10.0, 1.8), (6.0, 2.0)] {
            let projector = AnnualHoursProjector::from_scale_shape(a, k).unwrap();
            let table = projector.project(&default_speed_bins()).unwrap();
            let total = table.total_hours();
            assert!(
                (8700.0..=HOURS_PER_YEAR).contains(&total),
                "A = {a}, k = {k}: total = {total}"
            );
        }
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let projector = AnnualHoursProjector::from_scale_shape(9.0, 2.0).unwrap();
        let table = projector.project(&default_speed_bins()).unwrap();
        let sum: f64 = table.normalized().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hours_match_closed_form() {
        let params = WeibullParams::new(9.0, 2.0).unwrap();
        let table = AnnualHoursProjector::new(params)
            .project(&default_speed_bins())
            .unwrap();
        for row in &table.rows {
            let expected = params.pdf(row.speed) * 8760.0;
            assert!((row.annual_hours - expected).abs() < 1e-9);
        }
        assert_eq!(table.rows[0].annual_hours, 0.0);
    }

    #[test]
    fn test_scaled_by_bin_width() {
        let projector = AnnualHoursProjector::from_scale_shape(9.0, 2.0).unwrap();
        let half: Vec<f64> = (0..=80).map(|i| i as f64 * 0.5).collect();
        let table = projector.project(&half).unwrap();
        assert!((table.bin_width - 0.5).abs() < 1e-15);
        let expected = projector.params().pdf(5.0) * 8760.0 * 0.5;
        assert!((table.rows[10].annual_hours - expected).abs() < 1e-9);
        // Finer bins shrink the discretization error.
        let coarse = projector.project(&default_speed_bins()).unwrap();
        assert!(
            (8760.0 - table.total_hours()).abs() < (8760.0 - coarse.total_hours()).abs()
        );
    }

    #[test]
    fn test_mean_speed_projection() {
        let from_mean = AnnualHoursProjector::from_mean_speed(8.0, 2.0).unwrap();
        let a = 8.0 / super::super::params::gamma(1.5);
        let from_a = AnnualHoursProjector::from_scale_shape(a, 2.0).unwrap();
        let t1 = from_mean.project(&default_speed_bins()).unwrap();
        let t2 = from_a.project(&default_speed_bins()).unwrap();
        for (r1, r2) in t1.rows.iter().zip(&t2.rows) {
            assert!((r1.annual_hours - r2.annual_hours).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_bins() {
        let projector = AnnualHoursProjector::from_scale_shape(9.0, 2.0).unwrap();
        assert!(projector.project(&[0.0]).is_err());
        assert!(projector.project(&[2.0, 1.0]).is_err());
        assert!(projector.project(&[0.0, 1.0, 3.0]).is_err());
        assert!(projector.project(&[-1.0, 0.0, 1.0]).is_err());
        assert!(matches!(
            projector.project(&[0.0, f64::NAN]),
            Err(WindError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_unbounded_density_at_zero() {
        let projector = AnnualHoursProjector::from_scale_shape(9.0, 0.8).unwrap();
        assert!(matches!(
            projector.project(&default_speed_bins()),
            Err(WindError::DegenerateDistribution { .. })
        ));
        // Starting above zero is fine.
        let bins: Vec<f64> = (1..=40).map(f64::from).collect();
        assert!(projector.project(&bins).is_ok());
    }

    #[test]
    fn test_invalid_params() {
        assert!(AnnualHoursProjector::from_scale_shape(-9.0, 2.0).is_err());
        assert!(AnnualHoursProjector::from_mean_speed(8.0, 0.0).is_err());
    }
}
