//! Lazily evaluated deviation engine.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;
use u_numflow::stats;

use super::types::{ascending_nan_last, average, Strategy};

/// Maps an item to the number it is ranked by.
type KeyFn<T> = Box<dyn Fn(&T) -> f64>;

/// Quantities derived from the current value set.
///
/// Each cell is empty until first read. Replacing the whole struct starts a
/// new generation.
#[derive(Default)]
struct DerivedCache {
    deviation_point: OnceCell<Option<f64>>,
    sorted: OnceCell<Vec<usize>>,
    deviations: OnceCell<Vec<f64>>,
    abs_deviations: OnceCell<Vec<f64>>,
    avg_deviation: OnceCell<Option<f64>>,
    abs_avg_deviation: OnceCell<Option<f64>>,
    pstdev: OnceCell<Option<f64>>,
    deviation_rates: OnceCell<Vec<f64>>,
    abs_deviation_rates: OnceCell<Vec<f64>>,
}

/// Ranks items by the distance of their value from a reference point.
///
/// A sorter owns an optional item set, an optional key function, and a value
/// set that is either supplied directly or derived from the items. Every
/// statistic is computed on first access and memoized until the item set or
/// value set is replaced.
///
/// The sorter is single-threaded: it is neither `Send` nor `Sync`. Use one
/// instance per thread.
///
/// # Examples
///
/// ```
/// use u_devsort::deviation::Sorter;
///
/// let sorter = Sorter::min().with_items(&[1.0, 10.0, 2.0]);
/// let ranked: Vec<f64> = sorter.sorted().into_iter().copied().collect();
/// assert_eq!(ranked, vec![1.0, 2.0, 10.0]);
/// assert_eq!(sorter.deviation_point(), Some(1.0));
/// ```
///
/// Ranking arbitrary items through a key function:
///
/// ```
/// use u_devsort::deviation::{Sorter, Strategy};
///
/// let words = ["tiny", "a", "medium", "enormous"];
/// let sorter = Sorter::new(Strategy::Median)
///     .with_key(|w: &&str| w.len() as f64)
///     .with_items(&words);
/// assert_eq!(sorter.sorted()[0], &"tiny");
/// ```
pub struct Sorter<T> {
    strategy: Strategy,
    key: Option<KeyFn<T>>,
    items: Option<Rc<[T]>>,
    values: OnceCell<Vec<f64>>,
    values_supplied: bool,
    pinned_point: Option<f64>,
    cache: DerivedCache,
}

impl<T> Sorter<T> {
    /// Creates an unbound sorter without a key function.
    ///
    /// Until a key is configured with [`with_key`](Self::with_key), values
    /// can only be supplied directly.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            key: None,
            items: None,
            values: OnceCell::new(),
            values_supplied: false,
            pinned_point: None,
            cache: DerivedCache::default(),
        }
    }

    /// Sets the key function used to derive the value set from items.
    pub fn with_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&T) -> f64 + 'static,
    {
        self.key = Some(Box::new(key));
        if !self.values_supplied {
            self.values = OnceCell::new();
        }
        self.cache = DerivedCache::default();
        self
    }

    /// Sets the item set from a copy of `items`.
    ///
    /// Values given with [`with_values`](Self::with_values) take precedence
    /// over values derived from these items. Unlike
    /// [`set_items`](Self::set_items), this keeps a deviation point given
    /// with [`with_deviation_point`](Self::with_deviation_point).
    pub fn with_items(mut self, items: &[T]) -> Self
    where
        T: Clone,
    {
        self.items = Some(Rc::from(items));
        if !self.values_supplied {
            self.values = OnceCell::new();
        }
        self.cache = DerivedCache::default();
        self
    }

    /// Sets the value set from a copy of `values`.
    ///
    /// Unlike [`set_values`](Self::set_values), this keeps a deviation point
    /// given with [`with_deviation_point`](Self::with_deviation_point).
    pub fn with_values(mut self, values: &[f64]) -> Self {
        self.values = OnceCell::from(values.to_vec());
        self.values_supplied = true;
        self.cache = DerivedCache::default();
        self
    }

    /// Pins the deviation point instead of computing it from the values.
    pub fn with_deviation_point(mut self, point: f64) -> Self {
        self.pin_deviation_point(Some(point));
        self
    }

    /// Returns the strategy that computes the deviation point.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the item set, if one is bound.
    pub fn items(&self) -> Option<&[T]> {
        self.items.as_deref()
    }

    /// Returns `true` if an item set is bound.
    pub fn is_bound(&self) -> bool {
        self.items.is_some()
    }

    /// Returns the pinned deviation point, if any.
    pub fn pinned_deviation_point(&self) -> Option<f64> {
        self.pinned_point
    }

    /// Replaces the item set with a copy of `items`.
    ///
    /// Clears the value set, every derived quantity, and the deviation
    /// point, pinned or not.
    pub fn set_items(&mut self, items: Option<&[T]>)
    where
        T: Clone,
    {
        self.replace_items(items.map(Rc::from));
    }

    /// Binds an item set shared with other sorters.
    pub(crate) fn bind_items(&mut self, items: Rc<[T]>) {
        self.replace_items(Some(items));
    }

    fn replace_items(&mut self, items: Option<Rc<[T]>>) {
        self.invalidate();
        self.items = items;
        self.values = OnceCell::new();
        self.values_supplied = false;
    }

    /// Replaces the value set with a copy of `values`.
    ///
    /// The item set is kept. Clears every derived quantity and the
    /// deviation point, pinned or not. Passing `None` makes the value set
    /// derivable from the items again.
    pub fn set_values(&mut self, values: Option<&[f64]>) {
        self.invalidate();
        self.values_supplied = values.is_some();
        self.values = match values {
            Some(v) => OnceCell::from(v.to_vec()),
            None => OnceCell::new(),
        };
    }

    /// Pins (or with `None`, unpins) the deviation point.
    ///
    /// Every derived quantity is recomputed against the new point.
    pub fn pin_deviation_point(&mut self, point: Option<f64>) {
        self.pinned_point = point;
        self.cache = DerivedCache::default();
    }

    fn invalidate(&mut self) {
        trace!(
            strategy = self.strategy.name(),
            had_pinned_point = self.pinned_point.is_some(),
            "invalidating derived quantities"
        );
        self.cache = DerivedCache::default();
        self.pinned_point = None;
    }

    /// Checks that the configuration is consistent.
    ///
    /// # Errors
    ///
    /// - the pinned deviation point is not finite
    /// - an explicit value set and the item set differ in length
    pub fn validate(&self) -> Result<(), String> {
        if let Some(p) = self.pinned_point {
            if !p.is_finite() {
                return Err(format!("deviation point must be finite, got {p}"));
            }
        }
        if let (Some(items), Some(values)) = (&self.items, self.values.get()) {
            if self.values_supplied && items.len() != values.len() {
                return Err(format!(
                    "value set has {} entries but item set has {}",
                    values.len(),
                    items.len()
                ));
            }
        }
        Ok(())
    }

    /// Returns the value set.
    ///
    /// Supplied values are returned as is. Otherwise the key function is
    /// applied to every item in order; without a key function or an item
    /// set the value set is empty.
    pub fn values(&self) -> &[f64] {
        self.values.get_or_init(|| match (&self.key, &self.items) {
            (Some(key), Some(items)) => {
                trace!(
                    strategy = self.strategy.name(),
                    items = items.len(),
                    "deriving value set"
                );
                items.iter().map(|item| key(item)).collect()
            }
            _ => Vec::new(),
        })
    }

    /// Returns the item indices ordered by ascending absolute deviation.
    ///
    /// The sort is stable and items with a NaN deviation come last. Empty
    /// when no item set is bound. If the item set and value set differ in
    /// length only the common prefix is ranked.
    pub fn sorted_indices(&self) -> &[usize] {
        self.cache.sorted.get_or_init(|| {
            let Some(items) = &self.items else {
                return Vec::new();
            };
            let abs = self.abs_deviations();
            let mut indices: Vec<usize> = (0..items.len().min(abs.len())).collect();
            indices.sort_by(|&a, &b| ascending_nan_last(abs[a], abs[b]));
            indices
        })
    }

    /// Returns the items ordered by ascending absolute deviation.
    pub fn sorted(&self) -> Vec<&T> {
        match &self.items {
            Some(items) => self
                .sorted_indices()
                .iter()
                .map(|&i| &items[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns the deviation point.
    ///
    /// A pinned point wins. Otherwise `None` for an empty value set, or the
    /// strategy's statistic of the values.
    pub fn deviation_point(&self) -> Option<f64> {
        if let Some(p) = self.pinned_point {
            return Some(p);
        }
        *self.cache.deviation_point.get_or_init(|| {
            let values = self.values();
            if values.is_empty() {
                return None;
            }
            self.strategy.deviation_point(values)
        })
    }

    /// Returns `value - deviation_point` for every value.
    pub fn deviations(&self) -> &[f64] {
        self.cache
            .deviations
            .get_or_init(|| match self.deviation_point() {
                Some(p) => self.values().iter().map(|v| v - p).collect(),
                None => Vec::new(),
            })
    }

    /// Returns the absolute value of every deviation.
    pub fn abs_deviations(&self) -> &[f64] {
        self.cache
            .abs_deviations
            .get_or_init(|| self.deviations().iter().map(|d| d.abs()).collect())
    }

    /// Returns the mean deviation, or `None` when there are no deviations.
    pub fn avg_deviation(&self) -> Option<f64> {
        *self
            .cache
            .avg_deviation
            .get_or_init(|| average(self.deviations()))
    }

    /// Returns the mean absolute deviation, or `None` when there are no
    /// deviations.
    pub fn abs_avg_deviation(&self) -> Option<f64> {
        *self
            .cache
            .abs_avg_deviation
            .get_or_init(|| average(self.abs_deviations()))
    }

    /// Returns the population standard deviation (N denominator) of the
    /// value set, or `None` when it is empty.
    pub fn pstdev(&self) -> Option<f64> {
        *self.cache.pstdev.get_or_init(|| {
            let values = self.values();
            if values.is_empty() {
                return None;
            }
            stats::population_std_dev(values).or_else(|| {
                // non-finite input: let the arithmetic propagate inf/NaN
                let mean = average(values)?;
                let squares: Vec<f64> = values.iter().map(|v| (v - mean).powi(2)).collect();
                average(&squares).map(f64::sqrt)
            })
        })
    }

    /// Returns every deviation divided by the mean absolute deviation.
    ///
    /// All rates are 0 when the mean absolute deviation is exactly 0.
    pub fn deviation_rates(&self) -> &[f64] {
        self.cache.deviation_rates.get_or_init(|| {
            let deviations = self.deviations();
            match self.abs_avg_deviation() {
                Some(avg) if avg != 0.0 => deviations.iter().map(|d| d / avg).collect(),
                _ => vec![0.0; deviations.len()],
            }
        })
    }

    /// Returns the absolute value of every deviation rate.
    pub fn abs_deviation_rates(&self) -> &[f64] {
        self.cache
            .abs_deviation_rates
            .get_or_init(|| self.deviation_rates().iter().map(|r| r.abs()).collect())
    }
}

impl<T> Sorter<T>
where
    T: Copy + Into<f64> + 'static,
{
    /// Creates a sorter whose items are numbers, keyed by identity.
    pub fn numeric(strategy: Strategy) -> Self {
        Self::new(strategy).with_key(|x: &T| (*x).into())
    }

    /// Numeric sorter measuring distance from the minimum.
    pub fn min() -> Self {
        Self::numeric(Strategy::Min)
    }

    /// Numeric sorter measuring distance from the maximum.
    pub fn max() -> Self {
        Self::numeric(Strategy::Max)
    }

    /// Numeric sorter measuring distance from the median.
    pub fn median() -> Self {
        Self::numeric(Strategy::Median)
    }

    /// Numeric sorter measuring distance from the mean.
    pub fn mean() -> Self {
        Self::numeric(Strategy::Mean)
    }
}

impl<T> fmt::Debug for Sorter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorter")
            .field("strategy", &self.strategy)
            .field("has_key", &self.key.is_some())
            .field("items", &self.items.as_ref().map(|i| i.len()))
            .field("values", &self.values.get().map(Vec::len))
            .field("pinned_point", &self.pinned_point)
            .finish()
    }
}
