//! Sum-of-deviation-rates aggregation.

use std::rc::Rc;

use tracing::{trace, warn};

use crate::deviation::{ascending_nan_last, Sorter};

/// Sums the absolute deviation rates of every sorter, per item.
///
/// Sorters without an item set are bound to `items` first; all of them
/// share one copy. Sorters that already hold an item set keep it and only
/// contribute to the indices the two sets have in common; a length
/// mismatch is reported as a `warn` event.
///
/// Returns an empty vector for empty `items` without touching the sorters.
pub fn multi_scores<T: Clone>(items: &[T], sorters: &mut [Sorter<T>]) -> Vec<f64> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut shared: Option<Rc<[T]>> = None;
    let mut scores = vec![0.0; items.len()];

    for sorter in sorters.iter_mut() {
        if !sorter.is_bound() {
            trace!(
                strategy = sorter.strategy().name(),
                items = items.len(),
                "binding sorter to item list"
            );
            let bound = shared.get_or_insert_with(|| Rc::from(items));
            sorter.bind_items(Rc::clone(bound));
        }
        let rates = sorter.abs_deviation_rates();
        if rates.len() != scores.len() {
            warn!(
                strategy = sorter.strategy().name(),
                items = scores.len(),
                rates = rates.len(),
                "sorter is bound to an item set of different length; scoring the common prefix"
            );
        }
        for (score, rate) in scores.iter_mut().zip(rates) {
            *score += rate;
        }
    }

    scores
}

/// Returns item indices ordered by ascending summed deviation rate.
///
/// The sort is stable: items with equal scores keep their original order.
/// Items whose score is NaN come last.
pub fn multi_sorted_indices<T: Clone>(items: &[T], sorters: &mut [Sorter<T>]) -> Vec<usize> {
    let scores = multi_scores(items, sorters);
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| ascending_nan_last(scores[a], scores[b]));
    indices
}

/// Returns the items ordered by ascending summed deviation rate.
///
/// Items that sit close to every sorter's reference point come first.
///
/// # Examples
///
/// ```
/// use u_devsort::deviation::Sorter;
/// use u_devsort::multi::multi_sorted;
///
/// let items = [1.0, 10.0, 2.0];
/// let mut sorters = [Sorter::min()];
/// let ranked: Vec<f64> = multi_sorted(&items, &mut sorters)
///     .into_iter()
///     .copied()
///     .collect();
/// assert_eq!(ranked, vec![1.0, 2.0, 10.0]);
/// ```
pub fn multi_sorted<'a, T: Clone>(items: &'a [T], sorters: &mut [Sorter<T>]) -> Vec<&'a T> {
    multi_sorted_indices(items, sorters)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}
