//! Snapshot and textual summary of a sorter's derived quantities.

use std::fmt;

use super::sorter::Sorter;
use super::types::Strategy;

/// Owned copy of every quantity a [`Sorter`] derives.
///
/// Taking a report forces all lazy quantities to be computed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviationReport {
    /// Strategy that produced the deviation point.
    pub strategy: Strategy,

    /// Value set, supplied or derived from the items.
    pub values: Vec<f64>,

    /// Item indices ordered by ascending absolute deviation.
    pub sorted_indices: Vec<usize>,

    /// Reference point; `None` for an empty value set.
    pub deviation_point: Option<f64>,

    /// `value - deviation_point`, aligned with `values`.
    pub deviations: Vec<f64>,

    /// Absolute deviations.
    pub abs_deviations: Vec<f64>,

    /// Mean of the deviations.
    pub avg_deviation: Option<f64>,

    /// Mean of the absolute deviations.
    pub abs_avg_deviation: Option<f64>,

    /// Population standard deviation of the values.
    pub pstdev: Option<f64>,

    /// Deviations divided by the mean absolute deviation (0 when it is 0).
    pub deviation_rates: Vec<f64>,

    /// Absolute deviation rates.
    pub abs_deviation_rates: Vec<f64>,
}

impl<T> Sorter<T> {
    /// Computes every derived quantity and returns an owned copy.
    pub fn report(&self) -> DeviationReport {
        DeviationReport {
            strategy: self.strategy(),
            values: self.values().to_vec(),
            sorted_indices: self.sorted_indices().to_vec(),
            deviation_point: self.deviation_point(),
            deviations: self.deviations().to_vec(),
            abs_deviations: self.abs_deviations().to_vec(),
            avg_deviation: self.avg_deviation(),
            abs_avg_deviation: self.abs_avg_deviation(),
            pstdev: self.pstdev(),
            deviation_rates: self.deviation_rates().to_vec(),
            abs_deviation_rates: self.abs_deviation_rates().to_vec(),
        }
    }
}

struct Scalar(Option<f64>);

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("None"),
        }
    }
}

/// Multi-line diagnostic rendering, one quantity per line.
impl<T: fmt::Debug> fmt::Display for Sorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: &[T] = self.items().unwrap_or(&[]);
        writeln!(f)?;
        writeln!(f, "Strategy: {}", self.strategy())?;
        writeln!(f, "Values: {:?}", self.values())?;
        writeln!(f, "Items: {items:?}")?;
        writeln!(f, "Sorted: {:?}", self.sorted())?;
        writeln!(f, "Deviation point: {}", Scalar(self.deviation_point()))?;
        writeln!(f, "Deviations: {:?}", self.deviations())?;
        writeln!(f, "Abs deviations: {:?}", self.abs_deviations())?;
        writeln!(f, "Avg deviation: {}", Scalar(self.avg_deviation()))?;
        writeln!(f, "Abs avg deviation: {}", Scalar(self.abs_avg_deviation()))?;
        writeln!(f, "Pstdev: {}", Scalar(self.pstdev()))?;
        writeln!(f, "Deviation rates: {:?}", self.deviation_rates())?;
        writeln!(f, "Abs deviation rates: {:?}", self.abs_deviation_rates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_matches_getters() {
        let s = Sorter::min().with_items(&[3.0, 1.0, 2.0]);
        let r = s.report();
        assert_eq!(r.strategy, Strategy::Min);
        assert_eq!(r.values, vec![3.0, 1.0, 2.0]);
        assert_eq!(r.sorted_indices, vec![1, 2, 0]);
        assert_eq!(r.deviation_point, Some(1.0));
        assert_eq!(r.deviations, vec![2.0, 0.0, 1.0]);
        assert_eq!(r.abs_avg_deviation, Some(1.0));
        assert_eq!(r.deviation_rates, vec![2.0, 0.0, 1.0]);
        assert_eq!(r.deviations.as_slice(), s.deviations());
    }

    #[test]
    fn test_report_empty() {
        let r = Sorter::<f64>::max().report();
        assert!(r.values.is_empty());
        assert_eq!(r.deviation_point, None);
        assert_eq!(r.pstdev, None);
        assert!(r.abs_deviation_rates.is_empty());
    }

    #[test]
    fn test_display_lists_every_quantity() {
        let s = Sorter::mean().with_items(&[1.0, 3.0]);
        let text = s.to_string();
        for label in [
            "Strategy: Mean",
            "Values: [1.0, 3.0]",
            "Items: [1.0, 3.0]",
            "Sorted: [1.0, 3.0]",
            "Deviation point: 2",
            "Deviations: [-1.0, 1.0]",
            "Abs deviations: [1.0, 1.0]",
            "Avg deviation: 0",
            "Abs avg deviation: 1",
            "Pstdev: 1",
            "Deviation rates: [-1.0, 1.0]",
            "Abs deviation rates: [1.0, 1.0]",
        ] {
            assert!(text.contains(label), "missing {label:?} in {text}");
        }
    }

    #[test]
    fn test_display_undefined_scalars() {
        let text = Sorter::<f64>::median().to_string();
        assert!(text.contains("Deviation point: None"));
        assert!(text.contains("Pstdev: None"));
        assert!(text.contains("Items: []"));
    }
}
