//! Deviation-based item ranking.
//!
//! Ranks items by how close a derived number lies to a reference point of
//! the whole set, and combines several such rankings into one:
//!
//! - **Deviation engine** ([`deviation`]): a lazily evaluated [`Sorter`]
//!   computes the reference point (min, max, median or mean), deviations,
//!   average and absolute average deviation, population standard deviation
//!   and normalised deviation rates, memoizing each until its inputs change.
//! - **Multi-sort** ([`multi`]): runs several sorters over one item list and
//!   orders the items by the sum of their absolute deviation rates.
//!
//! # Example
//!
//! ```
//! use u_devsort::{multi_sorted, Sorter, Strategy};
//!
//! #[derive(Clone, Debug)]
//! struct Flat {
//!     rent: f64,
//!     area: f64,
//! }
//!
//! let flats = vec![
//!     Flat { rent: 900.0, area: 40.0 },
//!     Flat { rent: 1500.0, area: 80.0 },
//!     Flat { rent: 1100.0, area: 60.0 },
//! ];
//!
//! // cheap and close to a typical size
//! let mut sorters = vec![
//!     Sorter::new(Strategy::Min).with_key(|f: &Flat| f.rent),
//!     Sorter::new(Strategy::Median).with_key(|f: &Flat| f.area),
//! ];
//! let ranked = multi_sorted(&flats, &mut sorters);
//! assert_eq!(ranked[0].rent, 1100.0);
//! ```
//!
//! # Threading
//!
//! Sorters cache through interior mutability and share item sets by
//! reference counting; they are `!Send` and `!Sync`.

pub mod deviation;
pub mod multi;

pub use deviation::{DeviationReport, Sorter, Strategy};
pub use multi::{multi_scores, multi_sorted, multi_sorted_indices};
