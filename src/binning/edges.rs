//! Validated bin edges with half-open membership.

use crate::error::{Result, WindError};

/// Strictly increasing bin edges `e_0 < e_1 < ... < e_n` defining `n` bins.
///
/// Bin `i` is the half-open interval `[e_i, e_{i+1})`, except that the
/// last bin also contains the value `e_n` itself.
///
/// # Examples
///
/// ```
/// use u_wind::binning::BinEdges;
///
/// let edges = BinEdges::new(vec![0.0, 1.0, 2.0]).unwrap();
/// assert_eq!(edges.n_bins(), 2);
/// assert_eq!(edges.bin_index(0.5), Some(0));
/// assert_eq!(edges.bin_index(1.0), Some(1));
/// assert_eq!(edges.bin_index(2.0), Some(1)); // last edge is inclusive
/// assert_eq!(edges.bin_index(2.5), None);
/// assert_eq!(edges.label(0), "[0, 1)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Creates bin edges from an explicit sequence.
    ///
    /// # Errors
    /// `InvalidInput` if fewer than 2 edges are given, any edge is
    /// non-finite, or the sequence is not strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(WindError::invalid_input(format!(
                "at least 2 bin edges required, got {}",
                edges.len()
            )));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(WindError::invalid_input(format!(
                "bin edges must be finite, got {bad}"
            )));
        }
        if let Some(w) = edges.windows(2).find(|w| w[1] <= w[0]) {
            return Err(WindError::invalid_input(format!(
                "bin edges must be strictly increasing, got {} then {}",
                w[0], w[1]
            )));
        }
        Ok(Self { edges })
    }

    /// Creates evenly spaced edges `start, start + step, ...` up to and
    /// including `stop` (the same edges as `arange(start, stop + step, step)`).
    ///
    /// # Errors
    /// `InvalidInput` if `step` is not positive or `stop <= start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_wind::binning::BinEdges;
    ///
    /// let edges = BinEdges::uniform(0.0, 360.0, 15.0).unwrap();
    /// assert_eq!(edges.n_bins(), 24);
    /// assert_eq!(edges.last(), 360.0);
    /// ```
    pub fn uniform(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !stop.is_finite() {
            return Err(WindError::invalid_input("edge range must be finite"));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(WindError::invalid_input(format!(
                "bin step must be positive and finite, got {step}"
            )));
        }
        if stop <= start {
            return Err(WindError::invalid_input(format!(
                "stop ({stop}) must exceed start ({start})"
            )));
        }
        // Tolerate floating-point drift so `stop` itself is kept.
        let n = ((stop - start) / step + 1e-9).floor() as usize;
        let edges = (0..=n).map(|i| start + i as f64 * step).collect();
        Self::new(edges)
    }

    /// Number of bins (`edges - 1`).
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Raw edge values.
    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    /// Lowest edge `e_0`.
    pub fn first(&self) -> f64 {
        self.edges[0]
    }

    /// Highest edge `e_n`.
    pub fn last(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Returns `true` if `x` lies inside `[e_0, e_n]`.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.first() && x <= self.last()
    }

    /// Index of the bin containing `x`, or `None` when `x` is outside
    /// `[e_0, e_n]` or not finite.
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        if !x.is_finite() || !self.contains(x) {
            return None;
        }
        if x == self.last() {
            return Some(self.n_bins() - 1);
        }
        // Number of edges <= x; at least 1 since x >= e_0.
        let upper = self.edges.partition_point(|&e| e <= x);
        Some(upper - 1)
    }

    /// Lower and upper edge of bin `i`.
    ///
    /// # Panics
    /// Panics if `i >= n_bins()`.
    pub fn bounds(&self, i: usize) -> (f64, f64) {
        (self.edges[i], self.edges[i + 1])
    }

    /// Display label of bin `i`, formatted as `"[lo, hi)"`.
    pub fn label(&self, i: usize) -> String {
        let (lo, hi) = self.bounds(i);
        format!("[{lo}, {hi})")
    }

    /// Midpoint of every bin, in edge order.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}
