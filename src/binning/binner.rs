//! Binning and grouped reduction over fixed edges.

use super::{BinEdges, Statistic};
use crate::error::{Result, WindError};
use crate::samples::{drop_missing, drop_missing_pairs};

/// One bin of a [`BinnedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedRow {
    /// Display label `"[lo, hi)"`.
    pub label: String,
    /// Lower edge.
    pub lo: f64,
    /// Upper edge.
    pub hi: f64,
    /// Number of members.
    pub count: usize,
    /// Reduced statistic; `None` for an empty bin without a numeric identity.
    pub value: Option<f64>,
}

/// Result of [`bin`] / [`bin_by`]: one row per bin, in edge order.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedTable {
    /// Statistic applied to each bin.
    pub statistic: Statistic,
    /// Rows in edge order; always one per bin, including empty bins.
    pub rows: Vec<BinnedRow>,
    /// Number of missing samples dropped before binning.
    pub dropped: usize,
}

impl BinnedTable {
    /// Reduced values in edge order.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Total number of binned samples.
    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }
}

/// One bin of a [`DistributionTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    /// Display label `"[lo, hi)"`.
    pub label: String,
    /// Lower edge.
    pub lo: f64,
    /// Upper edge.
    pub hi: f64,
    /// Number of samples in the bin.
    pub count: usize,
    /// `count / total`.
    pub frequency: f64,
}

/// Counts and normalized frequencies per bin.
///
/// Frequencies sum to 1 and counts sum to [`total`](Self::total).
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionTable {
    /// Rows in edge order.
    pub rows: Vec<DistributionRow>,
    /// Number of valid samples binned.
    pub total: usize,
    /// Number of missing samples dropped.
    pub dropped: usize,
}

impl DistributionTable {
    /// Per-bin counts.
    pub fn counts(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.count).collect()
    }

    /// Per-bin normalized frequencies.
    pub fn frequencies(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.frequency).collect()
    }
}

/// Assigns every key to its bin index.
///
/// Keys must be finite; any key outside `[e_0, e_n]` is rejected.
pub(crate) fn assign(keys: &[f64], edges: &BinEdges) -> Result<Vec<usize>> {
    keys.iter()
        .map(|&k| {
            edges.bin_index(k).ok_or_else(|| {
                WindError::invalid_input(format!(
                    "value {k} outside bin range [{}, {}]",
                    edges.first(),
                    edges.last()
                ))
            })
        })
        .collect()
}

/// Groups `values` by the bin their matching key falls into.
pub(crate) fn group(keys: &[f64], values: &[f64], edges: &BinEdges) -> Result<Vec<Vec<f64>>> {
    let indices = assign(keys, edges)?;
    let mut groups = vec![Vec::new(); edges.n_bins()];
    for (idx, &v) in indices.into_iter().zip(values) {
        groups[idx].push(v);
    }
    Ok(groups)
}

fn check_non_empty(len: usize, valid: usize) -> Result<()> {
    if len == 0 {
        return Err(WindError::invalid_input("sample sequence is empty"));
    }
    if valid == 0 {
        return Err(WindError::degenerate(format!(
            "all {len} samples are missing"
        )));
    }
    Ok(())
}

/// Bins `values` by their own magnitude and reduces each bin.
///
/// Equivalent to `bin_by(values, values, edges, statistic)`.
///
/// # Errors
/// - `InvalidInput` if `values` is empty or a value lies outside the edges
/// - `DegenerateDistribution` if every value is missing
///
/// # Examples
///
/// ```
/// use u_wind::binning::{bin, BinEdges, Statistic};
///
/// let edges = BinEdges::new(vec![0.0, 5.0, 10.0]).unwrap();
/// let table = bin(&[1.0, 2.0, 7.0, 10.0], &edges, Statistic::Count).unwrap();
/// assert_eq!(table.rows[0].count, 2);
/// assert_eq!(table.rows[1].count, 2); // 10.0 lands in the last bin
/// ```
pub fn bin(values: &[f64], edges: &BinEdges, statistic: Statistic) -> Result<BinnedTable> {
    bin_by(values, values, edges, statistic)
}

/// Bins `values` by the matching entry of `keys` and reduces each bin.
///
/// This is the grouped form used for mast columns, e.g. the maximum wind
/// speed per wind-speed bin, or the mean temperature per direction bin.
/// Pairs with a missing key or value are dropped with a warning event.
/// Empty bins are kept: `Count`/`Sum` report `0.0`, other statistics `None`.
///
/// # Errors
/// - `InvalidInput` if the slices differ in length, are empty, or a key
///   lies outside the edges
/// - `DegenerateDistribution` if every pair is missing
///
/// # Examples
///
/// ```
/// use u_wind::binning::{bin_by, BinEdges, Statistic};
///
/// let speed = [1.0, 1.5, 3.5];
/// let temperature = [10.0, 12.0, 20.0];
/// let edges = BinEdges::uniform(0.0, 4.0, 1.0).unwrap();
/// let table = bin_by(&speed, &temperature, &edges, Statistic::Mean).unwrap();
/// assert_eq!(table.rows.len(), 4);
/// assert_eq!(table.rows[0].value, None);
/// assert_eq!(table.rows[1].value, Some(11.0));
/// assert_eq!(table.rows[3].value, Some(20.0));
/// ```
pub fn bin_by(
    keys: &[f64],
    values: &[f64],
    edges: &BinEdges,
    statistic: Statistic,
) -> Result<BinnedTable> {
    if keys.len() != values.len() {
        return Err(WindError::invalid_input(format!(
            "key and value columns differ in length ({} vs {})",
            keys.len(),
            values.len()
        )));
    }
    let (keys_ok, values_ok, dropped) = drop_missing_pairs(keys, values, "bin_by");
    check_non_empty(keys.len(), keys_ok.len())?;

    let groups = group(&keys_ok, &values_ok, edges)?;
    let rows = groups
        .iter()
        .enumerate()
        .map(|(i, members)| {
            let (lo, hi) = edges.bounds(i);
            BinnedRow {
                label: edges.label(i),
                lo,
                hi,
                count: members.len(),
                value: statistic.reduce(members),
            }
        })
        .collect();

    Ok(BinnedTable {
        statistic,
        rows,
        dropped,
    })
}

/// Counts `values` per bin and normalizes the counts to frequencies.
///
/// # Errors
/// - `InvalidInput` if `values` is empty or a value lies outside the edges
/// - `DegenerateDistribution` if every value is missing
///
/// # Examples
///
/// ```
/// use u_wind::binning::{histogram, BinEdges};
///
/// let edges = BinEdges::uniform(0.0, 3.0, 1.0).unwrap();
/// let dist = histogram(&[0.5, 1.5, 1.7, 3.0], &edges).unwrap();
/// assert_eq!(dist.counts(), vec![1, 2, 1]);
/// assert!((dist.frequencies().iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
pub fn histogram(values: &[f64], edges: &BinEdges) -> Result<DistributionTable> {
    let valid = drop_missing(values, "histogram");
    check_non_empty(values.len(), valid.len())?;

    let mut counts = vec![0_usize; edges.n_bins()];
    for idx in assign(&valid.values, edges)? {
        counts[idx] += 1;
    }

    let total = valid.len();
    let rows = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let (lo, hi) = edges.bounds(i);
            DistributionRow {
                label: edges.label(i),
                lo,
                hi,
                count,
                frequency: count as f64 / total as f64,
            }
        })
        .collect();

    Ok(DistributionTable {
        rows,
        total,
        dropped: valid.dropped,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn histogram_conserves_counts(
            data in proptest::collection::vec(0.0_f64..=40.0, 1..=200),
            missing in 0_usize..10,
        ) {
            let mut column = data.clone();
            column.extend(std::iter::repeat(f64::NAN).take(missing));
            let edges = BinEdges::uniform(0.0, 40.0, 1.0).expect("valid edges");
            let dist = histogram(&column, &edges).expect("should bin");

            let counted: usize = dist.counts().iter().sum();
            prop_assert_eq!(counted, data.len());
            prop_assert_eq!(dist.dropped, missing);

            let freq: f64 = dist.frequencies().iter().sum();
            prop_assert!((freq - 1.0).abs() < 1e-9, "sum = {}", freq);
        }

        #[test]
        fn bin_row_count_is_fixed(
            data in proptest::collection::vec(0.0_f64..=10.0, 1..=50),
        ) {
            let edges = BinEdges::uniform(0.0, 10.0, 2.5).expect("valid edges");
            let table = bin(&data, &edges, Statistic::Mean).expect("should bin");
            prop_assert_eq!(table.rows.len(), 4);
            prop_assert_eq!(table.total_count(), data.len());
        }
    }
}
