//! Missing-value handling for raw sample columns.
//!
//! Import collaborators hand over columns with `NaN` (or any other
//! non-finite value) as the missing marker. Every estimator in this crate
//! filters those out first and reports the drop as a warning event.

use tracing::warn;

/// Non-missing samples extracted from a raw column.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSamples {
    /// Finite samples, in their original order.
    pub values: Vec<f64>,
    /// Number of missing (non-finite) samples removed.
    pub dropped: usize,
}

impl ValidSamples {
    /// Returns `true` if no finite sample survived.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of finite samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Removes missing samples from `data`, logging how many were dropped.
///
/// `context` names the caller in the warning event.
///
/// # Examples
///
/// ```
/// use u_wind::samples::drop_missing;
///
/// let valid = drop_missing(&[1.0, f64::NAN, 3.0], "example");
/// assert_eq!(valid.values, vec![1.0, 3.0]);
/// assert_eq!(valid.dropped, 1);
/// ```
pub fn drop_missing(data: &[f64], context: &'static str) -> ValidSamples {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    let dropped = data.len() - values.len();
    if dropped > 0 {
        warn!(
            context,
            dropped,
            remaining = values.len(),
            "Dropped missing samples"
        );
    }
    ValidSamples { values, dropped }
}

/// Removes pairs where either the key or the value is missing.
///
/// Returns `(keys, values, dropped)`. Both slices must have equal length;
/// the caller checks this.
pub(crate) fn drop_missing_pairs(
    keys: &[f64],
    values: &[f64],
    context: &'static str,
) -> (Vec<f64>, Vec<f64>, usize) {
    let (kept_keys, kept_values): (Vec<f64>, Vec<f64>) = keys
        .iter()
        .zip(values)
        .filter(|(k, v)| k.is_finite() && v.is_finite())
        .map(|(&k, &v)| (k, v))
        .unzip();
    let dropped = keys.len() - kept_keys.len();
    if dropped > 0 {
        warn!(
            context,
            dropped,
            remaining = kept_keys.len(),
            "Dropped missing sample pairs"
        );
    }
    (kept_keys, kept_values, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_missing_keeps_order() {
        let valid = drop_missing(&[3.0, f64::NAN, 1.0, f64::INFINITY, 2.0], "test");
        assert_eq!(valid.values, vec![3.0, 1.0, 2.0]);
        assert_eq!(valid.dropped, 2);
        assert_eq!(valid.len(), 3);
    }

    #[test]
    fn test_drop_missing_all_missing() {
        let valid = drop_missing(&[f64::NAN, f64::NEG_INFINITY], "test");
        assert!(valid.is_empty());
        assert_eq!(valid.dropped, 2);
    }

    #[test]
    fn test_drop_missing_pairs() {
        let keys = [1.0, f64::NAN, 3.0, 4.0];
        let values = [10.0, 20.0, f64::NAN, 40.0];
        let (k, v, dropped) = drop_missing_pairs(&keys, &values, "test");
        assert_eq!(k, vec![1.0, 4.0]);
        assert_eq!(v, vec![10.0, 40.0]);
        assert_eq!(dropped, 2);
    }
}
