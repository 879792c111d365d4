//! Per-bin reduction statistics.

use u_numflow::stats;

/// Statistic used to reduce the members of a bin to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Statistic {
    /// Number of members.
    Count,
    /// Sum of members.
    Sum,
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Smallest member.
    Min,
    /// Largest member.
    Max,
    /// Median.
    Median,
    /// Sample standard deviation (n - 1 denominator).
    StdDev,
}

impl Statistic {
    /// Value reported for a bin with no members.
    ///
    /// `Count` and `Sum` have a numeric identity (0); the others have none
    /// and report `None`.
    pub fn empty_value(self) -> Option<f64> {
        match self {
            Statistic::Count | Statistic::Sum => Some(0.0),
            _ => None,
        }
    }

    /// Reduces `members` to a single value.
    ///
    /// Members are expected to be finite. Returns [`empty_value`](Self::empty_value)
    /// for an empty slice, and `None` for `StdDev` with a single member.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_wind::binning::Statistic;
    ///
    /// let v = [2.0, 4.0, 9.0];
    /// assert_eq!(Statistic::Count.reduce(&v), Some(3.0));
    /// assert_eq!(Statistic::Max.reduce(&v), Some(9.0));
    /// assert_eq!(Statistic::Mean.reduce(&[]), None);
    /// assert_eq!(Statistic::Sum.reduce(&[]), Some(0.0));
    /// ```
    pub fn reduce(self, members: &[f64]) -> Option<f64> {
        if members.is_empty() {
            return self.empty_value();
        }
        match self {
            Statistic::Count => Some(members.len() as f64),
            Statistic::Sum => Some(members.iter().sum()),
            Statistic::Mean => stats::mean(members),
            Statistic::Min => members.iter().copied().reduce(f64::min),
            Statistic::Max => members.iter().copied().reduce(f64::max),
            Statistic::Median => stats::median(members),
            Statistic::StdDev => stats::std_dev(members),
        }
    }

    /// Lowercase name, e.g. `"mean"`.
    pub fn name(self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Median => "median",
            Statistic::StdDev => "std_dev",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_values() {
        let v = [1.0, 2.0, 3.0, 10.0];
        assert_eq!(Statistic::Count.reduce(&v), Some(4.0));
        assert_eq!(Statistic::Sum.reduce(&v), Some(16.0));
        assert!((Statistic::Mean.reduce(&v).unwrap() - 4.0).abs() < 1e-12);
        assert_eq!(Statistic::Min.reduce(&v), Some(1.0));
        assert_eq!(Statistic::Max.reduce(&v), Some(10.0));
        assert!((Statistic::Median.reduce(&v).unwrap() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_sample() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sample variance = 32 / 7
        let sd = Statistic::StdDev.reduce(&v).unwrap();
        assert!((sd - (32.0_f64 / 7.0).sqrt()).abs() < 1e-10);
        assert_eq!(Statistic::StdDev.reduce(&[1.0]), None);
    }

    #[test]
    fn test_empty_identity() {
        assert_eq!(Statistic::Count.reduce(&[]), Some(0.0));
        assert_eq!(Statistic::Sum.reduce(&[]), Some(0.0));
        for stat in [
            Statistic::Mean,
            Statistic::Min,
            Statistic::Max,
            Statistic::Median,
            Statistic::StdDev,
        ] {
            assert_eq!(stat.reduce(&[]), None, "{}", stat.name());
        }
    }

    #[test]
    fn test_default_is_mean() {
        assert_eq!(Statistic::default(), Statistic::Mean);
    }
}
