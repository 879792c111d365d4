//! Sectorwise (wind rose) binning of directional data.
//!
//! Splits wind directions in degrees into `N` equal sectors, the first of
//! which is centered on north (0°). Because that sector straddles the
//! 0°/360° boundary, a plain cut from 0 to 360 would split it into two
//! disjoint half-wedges. The aggregator cuts naively and then merges them.
//!
//! # Algorithm
//!
//! ```text
//! width = 360 / N
//! naive edges: 0, width/2, width/2 + width, ..., 360 - width/2, 360
//!              (N + 1 right-open bins)
//! sector 0   = naive[0] ∪ naive[N]      i.e. [360 - width/2, 360) ∪ [0, width/2)
//! sector i   = naive[i]                 for 1 <= i < N
//! ```
//!
//! A direction of exactly 360° is the same heading as 0° and is mapped to
//! 0 before binning, so every bin is right-open.

use crate::binning::{group, BinEdges, Statistic};
use crate::error::{Result, WindError};
use crate::samples::{drop_missing, drop_missing_pairs};

const FULL_CIRCLE: f64 = 360.0;

/// One sector of a [`WindRose`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectorRow {
    /// Sector center angle in degrees.
    pub center: f64,
    /// Start angle (inclusive), wrapped into `[0, 360)`.
    pub lo: f64,
    /// End angle (exclusive), wrapped into `[0, 360)`.
    pub hi: f64,
    /// Number of directions in the sector.
    pub count: usize,
    /// `count / total`.
    pub frequency: f64,
}

/// Directional frequency distribution in increasing-angle order.
#[derive(Debug, Clone, PartialEq)]
pub struct WindRose {
    /// Angular width of each sector in degrees.
    pub sector_width: f64,
    /// One row per sector, starting with the sector centered on 0°.
    pub sectors: Vec<SectorRow>,
    /// Number of valid directions binned.
    pub total: usize,
    /// Number of missing directions dropped.
    pub dropped: usize,
}

impl WindRose {
    /// Frequencies matched 1:1 to sectors, in increasing-angle order.
    pub fn frequencies(&self) -> Vec<f64> {
        self.sectors.iter().map(|s| s.frequency).collect()
    }

    /// Counts matched 1:1 to sectors, in increasing-angle order.
    pub fn counts(&self) -> Vec<usize> {
        self.sectors.iter().map(|s| s.count).collect()
    }

    /// Sector whose center is `center` degrees, if any.
    pub fn sector(&self, center: f64) -> Option<&SectorRow> {
        self.sectors
            .iter()
            .find(|s| (s.center - center).abs() < 1e-9)
    }
}

/// One sector of a [`SectorStatistics`] table.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorStatistic {
    /// Sector center angle in degrees.
    pub center: f64,
    /// Number of members.
    pub count: usize,
    /// Reduced statistic; `None` for an empty sector without a numeric identity.
    pub value: Option<f64>,
}

/// A companion column reduced per direction sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorStatistics {
    /// Statistic applied to each sector.
    pub statistic: Statistic,
    /// One row per sector, in increasing-angle order.
    pub sectors: Vec<SectorStatistic>,
    /// Number of pairs dropped because the direction or value was missing.
    pub dropped: usize,
}

/// Bins directions into `N` north-centered sectors.
///
/// # Examples
///
/// ```
/// use u_wind::sector::SectorAggregator;
///
/// let agg = SectorAggregator::new(4).unwrap();
/// let rose = agg.wind_rose(&[359.0, 1.0, 0.0, 180.0]).unwrap();
/// assert_eq!(rose.counts(), vec![3, 0, 1, 0]);
/// assert_eq!(rose.sectors[2].center, 180.0);
/// ```
#[derive(Debug, Clone)]
pub struct SectorAggregator {
    sectors: usize,
    width: f64,
    /// Naive edges; bin 0 and bin `sectors` are the two halves of sector 0.
    edges: BinEdges,
}

impl SectorAggregator {
    /// Creates an aggregator with `sectors` equal sectors.
    ///
    /// # Errors
    /// `InvalidInput` if `sectors` is zero or does not divide 360 evenly.
    pub fn new(sectors: usize) -> Result<Self> {
        if sectors == 0 {
            return Err(WindError::invalid_input("sector count must be at least 1"));
        }
        if 360 % sectors != 0 {
            return Err(WindError::invalid_input(format!(
                "sector count {sectors} does not divide 360 evenly"
            )));
        }
        let width = FULL_CIRCLE / sectors as f64;

        let mut edges = Vec::with_capacity(sectors + 2);
        edges.push(0.0);
        edges.extend((0..sectors).map(|i| width / 2.0 + i as f64 * width));
        edges.push(FULL_CIRCLE);

        Ok(Self {
            sectors,
            width,
            edges: BinEdges::new(edges)?,
        })
    }

    /// Number of sectors.
    pub fn sectors(&self) -> usize {
        self.sectors
    }

    /// Sector width in degrees.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sector center angles `0, width, ..., (N - 1) * width`.
    pub fn centers(&self) -> Vec<f64> {
        (0..self.sectors).map(|i| i as f64 * self.width).collect()
    }

    /// Sector index for a single direction in `[0, 360]`.
    ///
    /// Returns `None` for non-finite or out-of-range directions.
    pub fn sector_index(&self, direction: f64) -> Option<usize> {
        let naive = self.edges.bin_index(wrap_full_circle(direction))?;
        Some(self.merge_index(naive))
    }

    /// Counts directions per sector and normalizes to frequencies.
    ///
    /// Missing directions are dropped with a warning event.
    ///
    /// # Errors
    /// - `InvalidInput` if `directions` is empty or a direction lies outside `[0, 360]`
    /// - `DegenerateDistribution` if every direction is missing
    pub fn wind_rose(&self, directions: &[f64]) -> Result<WindRose> {
        if directions.is_empty() {
            return Err(WindError::invalid_input("direction sequence is empty"));
        }
        let valid = drop_missing(directions, "wind_rose");
        if valid.is_empty() {
            return Err(WindError::degenerate(format!(
                "all {} directions are missing",
                directions.len()
            )));
        }
        let normalized = normalize_directions(&valid.values)?;

        let groups = self.merged_groups(&normalized, &normalized)?;
        let total = valid.len();
        let sectors = self
            .centers()
            .into_iter()
            .zip(groups)
            .map(|(center, members)| {
                let count = members.len();
                SectorRow {
                    center,
                    lo: (center - self.width / 2.0).rem_euclid(FULL_CIRCLE),
                    hi: (center + self.width / 2.0).rem_euclid(FULL_CIRCLE),
                    count,
                    frequency: count as f64 / total as f64,
                }
            })
            .collect();

        Ok(WindRose {
            sector_width: self.width,
            sectors,
            total,
            dropped: valid.dropped,
        })
    }

    /// Reduces a companion column (e.g. wind speed) per direction sector.
    ///
    /// Uses the same wraparound merge as [`wind_rose`](Self::wind_rose):
    /// members of both half-wedges around north are reduced together.
    ///
    /// # Errors
    /// - `InvalidInput` if the columns differ in length, are empty, or a
    ///   direction lies outside `[0, 360]`
    /// - `DegenerateDistribution` if every pair is missing
    ///
    /// # Examples
    ///
    /// ```
    /// use u_wind::binning::Statistic;
    /// use u_wind::sector::SectorAggregator;
    ///
    /// let agg = SectorAggregator::new(4).unwrap();
    /// let direction = [350.0, 10.0, 90.0];
    /// let speed = [4.0, 8.0, 5.0];
    /// let table = agg.aggregate(&direction, &speed, Statistic::Mean).unwrap();
    /// assert_eq!(table.sectors[0].value, Some(6.0));
    /// assert_eq!(table.sectors[1].value, Some(5.0));
    /// assert_eq!(table.sectors[2].value, None);
    /// ```
    pub fn aggregate(
        &self,
        directions: &[f64],
        values: &[f64],
        statistic: Statistic,
    ) -> Result<SectorStatistics> {
        if directions.len() != values.len() {
            return Err(WindError::invalid_input(format!(
                "direction and value columns differ in length ({} vs {})",
                directions.len(),
                values.len()
            )));
        }
        if directions.is_empty() {
            return Err(WindError::invalid_input("direction sequence is empty"));
        }
        let (dirs, vals, dropped) = drop_missing_pairs(directions, values, "sector_aggregate");
        if dirs.is_empty() {
            return Err(WindError::degenerate(format!(
                "all {} direction/value pairs are missing",
                directions.len()
            )));
        }
        let normalized = normalize_directions(&dirs)?;

        let sectors = self
            .centers()
            .into_iter()
            .zip(self.merged_groups(&normalized, &vals)?)
            .map(|(center, members)| SectorStatistic {
                center,
                count: members.len(),
                value: statistic.reduce(&members),
            })
            .collect();

        Ok(SectorStatistics {
            statistic,
            sectors,
            dropped,
        })
    }

    fn merge_index(&self, naive: usize) -> usize {
        if naive == self.sectors {
            0
        } else {
            naive
        }
    }

    /// Groups `values` by the naive bin of `directions`, then folds the
    /// trailing half-wedge into sector 0.
    fn merged_groups(&self, directions: &[f64], values: &[f64]) -> Result<Vec<Vec<f64>>> {
        let mut naive = group(directions, values, &self.edges)?;
        let tail = naive.pop().unwrap_or_default();
        naive[0].extend(tail);
        Ok(naive)
    }
}

fn wrap_full_circle(direction: f64) -> f64 {
    if direction == FULL_CIRCLE {
        0.0
    } else {
        direction
    }
}

/// Validates the `[0, 360]` range and maps 360 onto 0.
fn normalize_directions(directions: &[f64]) -> Result<Vec<f64>> {
    directions
        .iter()
        .map(|&d| {
            if !(0.0..=FULL_CIRCLE).contains(&d) {
                return Err(WindError::invalid_input(format!(
                    "direction {d} outside [0, 360]"
                )));
            }
            Ok(wrap_full_circle(d))
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wind_rose_conserves_counts(
            directions in proptest::collection::vec(0.0_f64..=360.0, 1..=300),
            sectors in prop::sample::select(vec![1_usize, 2, 4, 8, 12, 18, 36, 72]),
        ) {
            let agg = SectorAggregator::new(sectors).expect("divides 360");
            let rose = agg.wind_rose(&directions).expect("should bin");

            prop_assert_eq!(rose.sectors.len(), sectors);
            prop_assert_eq!(rose.counts().iter().sum::<usize>(), directions.len());
            let freq: f64 = rose.frequencies().iter().sum();
            prop_assert!((freq - 1.0).abs() < 1e-9, "sum = {}", freq);
        }

        #[test]
        fn sector_index_matches_nearest_center(
            direction in 0.0_f64..360.0,
            sectors in prop::sample::select(vec![4_usize, 12, 36]),
        ) {
            let agg = SectorAggregator::new(sectors).expect("divides 360");
            let width = agg.width();
            let position = (direction + width / 2.0) / width;
            // Only boundary values may round differently.
            let fract = position.fract();
            prop_assume!(fract > 1e-9 && fract < 1.0 - 1e-9);

            let expected = position.floor() as usize % sectors;
            let idx = agg.sector_index(direction).expect("in range");
            prop_assert_eq!(idx, expected);
        }
    }
}
