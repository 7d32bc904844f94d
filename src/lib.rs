//! An ordered multiset with O(log n) order-statistic queries.
//!
//! This crate provides [`OrderedMultiset`], an in-memory multiset backed by a
//! red-black tree in which every node additionally tracks the size of its
//! subtree. The augmentation pays for O(log n) rank queries on top of the
//! usual O(log n) insert/remove/search/predecessor/successor:
//!
//! - [`kth_element`](OrderedMultiset::kth_element) - the k-th smallest element (1-indexed)
//! - [`count_less_than`](OrderedMultiset::count_less_than) - the rank of a value
//! - [`count_range`](OrderedMultiset::count_range) - elements within a half-open range
//! - Indexing by [`Rank`] - e.g. `set[Rank(0)]` for the smallest element
//!
//! The container is parameterized by a comparator closure meaning "not
//! greater", and by a caller-chosen *sentinel value* outside the valid value
//! domain. Empty-container queries ([`min`](OrderedMultiset::min),
//! [`max`](OrderedMultiset::max), [`prev_element`](OrderedMultiset::prev_element),
//! [`next_element`](OrderedMultiset::next_element)) echo the sentinel value
//! back instead of failing, so queries chain without per-call presence
//! checks.
//!
//! # Example
//!
//! ```
//! use rankset::OrderedMultiset;
//!
//! let mut scores = OrderedMultiset::new(|a: &u32, b: &u32| a <= b, u32::MAX);
//! scores.insert(85);
//! scores.insert(100);
//! scores.insert(85); // duplicates are kept
//!
//! assert_eq!(scores.len(), 3);
//! assert_eq!(*scores.min(), 85);
//! assert_eq!(*scores.kth_element(2), 85);
//! assert_eq!(scores.count_less_than(&100), 2);
//!
//! scores.remove(&85)?;
//! assert_eq!(scores.iter().copied().collect::<Vec<_>>(), [85, 100]);
//! # Ok::<(), rankset::NotFoundError>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Multiset semantics** - Equal elements are kept, stably ordered by insertion
//! - **O(log n) rank operations** - Subtree-size augmentation, updated inside rotations
//! - **Arena storage** - Nodes live in a slot arena addressed by handles; no raw pointers
//!
//! # Implementation
//!
//! The tree is the classic red-black tree of CLRS with a per-container
//! sentinel node standing in for every absent link, stored as slot 0 of the
//! node arena. Subtree sizes are bumped proactively on the descent of every
//! mutation and recomputed inside rotations, so rank queries never touch
//! stale counts.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod error;
mod rank;
mod raw;

pub mod ordered_multiset;

pub use error::NotFoundError;
pub use ordered_multiset::OrderedMultiset;
pub use rank::Rank;
