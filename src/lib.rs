#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod capacity;

pub mod comparer;

mod error;

/// An unordered map over the chained [`HashTable`].
///
/// Removed slots go to a free list that later inserts reuse.
pub mod hash_map;

pub mod hash_table;

/// An unordered set over the chained [`HashTable`].
pub mod hash_set;

pub mod ordered_map;

pub mod ordered_set;

pub mod version;

#[cfg(test)]
mod hash_table_proptest;

pub use comparer::AlternateComparer;
pub use comparer::DefaultComparer;
pub use comparer::DefaultHashBuilder;
pub use comparer::KeyComparer;
pub use comparer::StringComparer;
pub use comparer::StringComparison;
pub use error::Error;
pub use error::ErrorKind;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use ordered_map::OrderedMap;
pub use ordered_set::OrderedSet;
pub use version::Enumerator;
pub use version::EnumeratorState;
