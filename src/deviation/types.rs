//! Deviation point strategies.

use std::cmp::Ordering;

use u_numflow::stats;

/// How the reference point of a value set is computed.
///
/// Every strategy maps a value set to a single scalar; all per-item
/// deviations are then measured against that scalar.
///
/// # Examples
///
/// ```
/// use u_devsort::deviation::Strategy;
///
/// let values = [4.0, 1.0, 3.0, 2.0];
/// assert_eq!(Strategy::Min.deviation_point(&values), Some(1.0));
/// assert_eq!(Strategy::Median.deviation_point(&values), Some(2.5));
/// assert_eq!(Strategy::Mean.deviation_point(&[]), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Smallest value of the set.
    Min,

    /// Largest value of the set.
    Max,

    /// Middle value; the average of the two middle values for an even count.
    Median,

    /// Arithmetic mean (compensated summation).
    Mean,
}

impl Strategy {
    /// All strategies, in declaration order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Min,
        Strategy::Max,
        Strategy::Median,
        Strategy::Mean,
    ];

    /// Returns the name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Min => "Min",
            Strategy::Max => "Max",
            Strategy::Median => "Median",
            Strategy::Mean => "Mean",
        }
    }

    /// Computes the deviation point of `values`.
    ///
    /// Returns `None` for an empty slice only. The emptiness check happens
    /// here, before any statistic runs. Non-finite values flow through the
    /// arithmetic: an infinite value drags the mean to infinity, NaN is
    /// skipped by min/max and ordered last by the median.
    pub fn deviation_point(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Strategy::Min => Some(values.iter().copied().fold(f64::NAN, f64::min)),
            Strategy::Max => Some(values.iter().copied().fold(f64::NAN, f64::max)),
            Strategy::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_unstable_by(f64::total_cmp);
                let n = sorted.len();
                if n % 2 == 1 {
                    Some(sorted[n / 2])
                } else {
                    Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
                }
            }
            Strategy::Mean => average(values),
        }
    }
}

/// Arithmetic mean, `None` only for an empty slice.
///
/// Compensated summation turns an infinite term or an overflowing total
/// into NaN; the plain sum is used instead whenever that happens.
pub(crate) fn average(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut total = stats::kahan_sum(data);
    if total.is_nan() {
        total = data.iter().sum();
    }
    Some(total / data.len() as f64)
}

/// Ascending order for scores, NaN last.
pub(crate) fn ascending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
