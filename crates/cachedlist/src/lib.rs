//! # cachedlist
//!
//! Doubly-linked list with a self-tuning position cache.
//!
//! ## Architecture
//! - **Arena**: nodes live in a slot table, links are slot numbers
//! - **Position cache**: up to 100 (node, index) hints sampled at an even
//!   stride, shifted in place on single-element changes and resampled when
//!   the list drifts
//! - **Lookup**: indexed access walks from the closest of head, tail or a
//!   cache hint
//!
//! ## Example
//!
//! ```
//! use cachedlist::CachedList;
//!
//! let mut list: CachedList<_> = ["bravo", "delta"].into_iter().collect();
//! list.add_head("alpha");
//! list.insert("charlie", 2).unwrap();
//!
//! assert_eq!(list.get_item(2), Ok(&"charlie"));
//! assert_eq!(list.find_item(&"delta", None, false), Ok(3));
//! assert!(list.validate().is_ok());
//! ```

#![warn(missing_docs)]

mod arena;
mod cache;
mod error;
mod iter;
mod list;
mod position;
mod stats;
mod validate;

pub use arena::NodeHandle;
pub use cache::{capacity_for, PositionCache};
pub use error::{Error, Result};
pub use iter::{IntoIter, Iter};
pub use list::CachedList;
pub use position::PositionRef;
pub use stats::LookupStats;
pub use validate::Violation;
