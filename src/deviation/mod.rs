//! Deviation engine: rank items by distance from a reference point.
//!
//! A [`Sorter`] maps items to numbers, picks a reference point from those
//! numbers with a [`Strategy`] (min, max, median or mean), and derives
//! per-item deviations plus the summary statistics built on them:
//!
//! - deviations and absolute deviations from the point
//! - average deviation and average absolute deviation
//! - population standard deviation of the values
//! - deviation rates: deviations divided by the average absolute deviation,
//!   which makes criteria with different scales comparable
//!
//! Everything is computed lazily and memoized per generation; replacing the
//! item set or value set starts a new generation.

mod report;
mod sorter;
mod types;

pub use report::DeviationReport;
pub use sorter::Sorter;
pub use types::Strategy;

pub(crate) use types::ascending_nan_last;
