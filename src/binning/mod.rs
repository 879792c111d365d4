//! Value binning and grouped reduction.
//!
//! Partitions a numeric sample column into caller-supplied bins and reduces
//! each bin by a [`Statistic`].
//!
//! # Boundary convention
//!
//! Bins are half-open, `[e_i, e_{i+1})`. The single exception is the last
//! bin, which also holds a value exactly equal to the last edge `e_n`.
//! Values outside `[e_0, e_n]` are rejected rather than silently dropped;
//! clip or filter them before binning.
//!
//! # Functions
//!
//! - [`bin`] — bin a column by its own values
//! - [`bin_by`] — bin one column by the values of another
//! - [`histogram`] — counts and normalized frequencies per bin

mod binner;
mod edges;
mod statistic;

pub(crate) use binner::group;
pub use binner::{
    bin, bin_by, histogram, BinnedRow, BinnedTable, DistributionRow, DistributionTable,
};
pub use edges::BinEdges;
pub use statistic::Statistic;
