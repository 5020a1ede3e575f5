//! A hash table with separate chaining and dynamic resizing,
//! built from scratch on owned singly linked bucket chains.
//!
//! The table grows by replacement: once the load factor would exceed
//! its threshold, `store` rehashes every entry into a fresh table of
//! twice the capacity and swaps it in. A failed rehash is rolled back
//! completely, the original table stays usable and the store proceeds
//! against it.
//!
//! Keys and values are bounded-length owned strings. The table is
//! single threaded, exclusive access is enforced through `&mut self`.

pub mod hashmap;
mod macros;

pub use hashmap::{HashTable, TableError};
