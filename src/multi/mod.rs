//! Multi-criteria ranking over several deviation sorters.
//!
//! Each [`Sorter`](crate::deviation::Sorter) ranks the same item list by its
//! own criterion. Because deviation rates are normalised by the average
//! absolute deviation, rates from criteria with different units are on a
//! common scale and can be added. The composite score of an item is the
//! unweighted sum of its absolute deviation rates; lower is better.

mod aggregate;

pub use aggregate::{multi_scores, multi_sorted, multi_sorted_indices};
