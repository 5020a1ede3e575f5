use thiserror::Error;

mod chain;
mod hash_table;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The caller passed something unusable, like an empty key
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Key or value is longer than its fixed bound. Nothing is truncated,
    /// the offending store is rejected outright.
    #[error("{what} is {len} bytes long, max is {max}")]
    LengthExceeded {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// Could not allocate an entry or the slot array
    #[error("could not allocate memory")]
    AllocationFailure,
}

pub use chain::{Entry, MAX_KEY_LEN, MAX_VALUE_LEN};
pub use hash_table::HashTable;
