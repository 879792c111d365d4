//! Wind-speed distribution analysis for a mast column.
//!
//! Bins raw wind-speed records, builds the empirical distribution, and fits
//! Weibull parameters with the selected [`FitMethod`]. Returns everything a
//! presentation layer needs to draw the binned histogram together with the
//! fitted density curve.

use super::{euro_atlas_with, least_squares_with, WeibullParams};
use crate::binning::{histogram, BinEdges};
use crate::config::SolverConfig;
use crate::error::{Result, WindError};
use crate::samples::drop_missing;

/// Weibull estimation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMethod {
    /// Least-squares fit of the PDF to the binned density ("best average fit").
    LeastSquares,
    /// European Wind Atlas moment matching on the raw samples.
    #[default]
    EuroAtlas,
}

impl FitMethod {
    /// Short name, e.g. `"euro_atlas"`.
    pub fn name(self) -> &'static str {
        match self {
            FitMethod::LeastSquares => "least_squares",
            FitMethod::EuroAtlas => "euro_atlas",
        }
    }
}

/// Configuration for [`analyze_speeds`].
///
/// # Examples
///
/// ```
/// use u_wind::weibull::{FitMethod, SpeedAnalysisConfig};
///
/// let config = SpeedAnalysisConfig::default()
///     .with_interval(0.5)
///     .with_method(FitMethod::LeastSquares);
/// assert_eq!(config.records_per_hour, 6.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedAnalysisConfig {
    /// Bin width in m/s, default 1.0.
    pub interval: f64,
    /// Estimation strategy, default [`FitMethod::EuroAtlas`].
    pub method: FitMethod,
    /// Records per hour, default 6 (10-minute averages).
    pub records_per_hour: f64,
    /// Solver bounds for the fit.
    pub solver: SolverConfig,
}

impl Default for SpeedAnalysisConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            method: FitMethod::default(),
            records_per_hour: 6.0,
            solver: SolverConfig::default(),
        }
    }
}

impl SpeedAnalysisConfig {
    /// Sets the bin width.
    pub fn with_interval(mut self, interval: f64) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the estimation strategy.
    pub fn with_method(mut self, method: FitMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the number of records per hour.
    pub fn with_records_per_hour(mut self, records_per_hour: f64) -> Self {
        self.records_per_hour = records_per_hour;
        self
    }

    /// Sets the solver bounds.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.interval.is_finite() || self.interval <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "bin interval must be positive and finite, got {}",
                self.interval
            )));
        }
        if !self.records_per_hour.is_finite() || self.records_per_hour <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "records per hour must be positive and finite, got {}",
                self.records_per_hour
            )));
        }
        self.solver.validate()
    }
}

/// One wind-speed bin of a [`SpeedAnalysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedBinRow {
    /// Display label `"[lo, hi)"`.
    pub label: String,
    /// Lower edge in m/s.
    pub lo: f64,
    /// Upper edge in m/s.
    pub hi: f64,
    /// Number of records in the bin.
    pub records: usize,
    /// Hours represented by those records.
    pub hours: f64,
    /// `records / total`.
    pub frequency: f64,
}

/// Binned wind-speed distribution with fitted Weibull parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedAnalysis {
    /// Fitted parameters.
    pub params: WeibullParams,
    /// Method used for the fit.
    pub method: FitMethod,
    /// Bins from 0 m/s to the first edge at or above the maximum speed.
    pub rows: Vec<SpeedBinRow>,
    /// Number of valid records.
    pub total: usize,
    /// Number of missing records dropped.
    pub dropped: usize,
}

impl SpeedAnalysis {
    /// Bin midpoints in m/s, for bar placement.
    pub fn bin_centers(&self) -> Vec<f64> {
        self.rows.iter().map(|r| 0.5 * (r.lo + r.hi)).collect()
    }

    /// Hours per bin.
    pub fn hours(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.hours).collect()
    }

    /// Fitted density at each of `speeds`.
    pub fn pdf_curve(&self, speeds: &[f64]) -> Vec<f64> {
        self.params.pdf_curve(speeds)
    }
}

/// Bins a wind-speed column and fits Weibull parameters to it.
///
/// # Algorithm
///
/// 1. Drop missing records (logged); reject negative speeds
/// 2. Edges `0, Δ, 2Δ, ...` up to the first edge at or above the maximum
/// 3. Count records per bin; hours = records / records_per_hour
/// 4. Fit with `config.method`:
///    - `LeastSquares`: density `frequency / Δ` at bin centers
///    - `EuroAtlas`: raw valid records
///
/// # Errors
/// - `InvalidInput`: empty column, negative speeds, bad configuration
/// - `DegenerateDistribution`: every record missing or zero
/// - `FittingFailure`: the selected estimator fails
///
/// # Examples
///
/// ```
/// use u_wind::weibull::{analyze_speeds, SpeedAnalysisConfig};
///
/// let speeds = [3.1, 5.4, 6.0, 7.2, 4.4, 9.8, 12.5, 2.2, 6.6, 8.1, f64::NAN];
/// let analysis = analyze_speeds(&speeds, &SpeedAnalysisConfig::default()).unwrap();
/// assert_eq!(analysis.total, 10);
/// assert_eq!(analysis.dropped, 1);
/// assert_eq!(analysis.rows.len(), 13); // [0, 1) .. [12, 13)
/// ```
pub fn analyze_speeds(speeds: &[f64], config: &SpeedAnalysisConfig) -> Result<SpeedAnalysis> {
    config.validate()?;
    if speeds.is_empty() {
        return Err(WindError::invalid_input("wind speed sequence is empty"));
    }
    let valid = drop_missing(speeds, "analyze_speeds");
    if valid.is_empty() {
        return Err(WindError::degenerate(format!(
            "all {} wind speeds are missing",
            speeds.len()
        )));
    }
    if let Some(&v) = valid.values.iter().find(|&&v| v < 0.0) {
        return Err(WindError::invalid_input(format!(
            "wind speeds must be non-negative, got {v}"
        )));
    }
    let max_speed = valid.values.iter().copied().fold(0.0_f64, f64::max);
    if max_speed == 0.0 {
        return Err(WindError::degenerate("all wind speeds are zero"));
    }

    let interval = config.interval;
    let mut n_bins = ((max_speed / interval).ceil() as usize).max(1);
    while (n_bins as f64) * interval < max_speed {
        n_bins += 1;
    }
    let edges = BinEdges::new((0..=n_bins).map(|i| i as f64 * interval).collect())?;
    let dist = histogram(&valid.values, &edges)?;

    let params = match config.method {
        FitMethod::LeastSquares => {
            let density: Vec<f64> = dist.frequencies().iter().map(|f| f / interval).collect();
            least_squares_with(&density, &edges.centers(), &config.solver)?.params
        }
        FitMethod::EuroAtlas => euro_atlas_with(&valid.values, &config.solver)?.params,
    };

    let rows = dist
        .rows
        .into_iter()
        .map(|r| SpeedBinRow {
            hours: r.count as f64 / config.records_per_hour,
            label: r.label,
            lo: r.lo,
            hi: r.hi,
            records: r.count,
            frequency: r.frequency,
        })
        .collect();

    Ok(SpeedAnalysis {
        params,
        method: config.method,
        rows,
        total: dist.total,
        dropped: valid.dropped,
    })
}
