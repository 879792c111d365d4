//! Weibull wind-speed distribution fitting and projection.
//!
//! Provides two interchangeable estimators for the Weibull scale A and
//! shape k, and converts parameters into expected annual hours per
//! wind-speed bin.
//!
//! # Modules
//!
//! - [`least_squares()`] — Levenberg-Marquardt fit of the PDF to a binned
//!   frequency curve ("best average fit")
//! - [`euro_atlas()`] — European Wind Atlas moment matching on raw samples
//!   (energy and exceedance-frequency match)
//! - [`AnnualHoursProjector`] — closed-form annual hours per speed bin
//! - [`analyze_speeds`] — bin a mast column and fit it in one step
//!
//! The two estimators can disagree: least squares minimizes the density
//! error, while the Wind Atlas method reproduces the sample's energy
//! content exactly.
//!
//! # References
//!
//! - Troen, I. & Petersen, E.L. (1989). *European Wind Atlas*, Risø.
//! - Manwell, McGowan & Rogers (2009). *Wind Energy Explained*, 2nd ed., Ch. 2.

mod analysis;
mod annual_hours;
mod euro_atlas;
mod least_squares;
mod params;

pub use analysis::{analyze_speeds, FitMethod, SpeedAnalysis, SpeedAnalysisConfig, SpeedBinRow};
pub use annual_hours::{
    default_speed_bins, AnnualHours, AnnualHoursProjector, AnnualHoursRow, HOURS_PER_YEAR,
};
pub use euro_atlas::{euro_atlas, euro_atlas_with, EuroAtlasFit};
pub use least_squares::{least_squares, least_squares_with, LeastSquaresFit};
pub use params::WeibullParams;
