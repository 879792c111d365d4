//! # u-wind
//!
//! Wind resource statistics for meteorological mast records: Weibull
//! wind-speed fitting, sectorwise wind roses, and value binning.
//!
//! The crate is a pure computation layer. Import collaborators hand over
//! numeric columns (`&[f64]`, with `NaN` as the missing marker) and receive
//! explicit result structures; file parsing and plotting live elsewhere.
//!
//! ## Modules
//!
//! - [`weibull`] — Weibull fitting (least squares, European Wind Atlas),
//!   annual hours projection, and speed-column analysis
//! - [`sector`] — Wind-rose sector binning with 0°/360° wraparound
//! - [`binning`] — Half-open value binning and grouped reduction
//! - [`samples`] — Missing-value filtering
//!
//! ## Example
//!
//! ```
//! use u_wind::sector::SectorAggregator;
//! use u_wind::weibull::{euro_atlas, AnnualHoursProjector, default_speed_bins};
//!
//! let speeds = [3.1, 5.4, 6.0, 7.2, 4.4, 9.8, 12.5, 2.2, 6.6, 8.1];
//! let fit = euro_atlas(&speeds).unwrap();
//! let hours = AnnualHoursProjector::new(fit.params)
//!     .project(&default_speed_bins())
//!     .unwrap();
//! assert!(hours.total_hours() > 8000.0);
//!
//! let rose = SectorAggregator::new(12).unwrap()
//!     .wind_rose(&[355.0, 10.0, 95.0, 180.0])
//!     .unwrap();
//! assert_eq!(rose.sectors[0].count, 2);
//! ```
//!
//! ## Error handling
//!
//! Fallible operations return [`Result`] with a [`WindError`]: invalid
//! input, fitting failure, or degenerate distribution. Dropped missing
//! samples are not errors; they are reported as `tracing` warnings and
//! counted in each result.

pub mod binning;
pub mod config;
pub mod error;
pub mod samples;
pub mod sector;
pub mod weibull;

pub use config::SolverConfig;
pub use error::{Result, WindError};
