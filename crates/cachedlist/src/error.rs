//! Error types for cachedlist

use std::fmt;

/// Result type alias for list operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by positional and search operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Index outside the range accepted by the operation
    IndexOutOfRange {
        /// The index that was passed in
        index: usize,
        /// List length at the time of the call
        len: usize,
    },

    /// Search exhausted its direction without a match
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfRange { index, len } => {
                write!(f, "linked list index {} out of range (len {})", index, len)
            }
            Error::NotFound => write!(f, "Item not found in linked list"),
        }
    }
}

impl std::error::Error for Error {}
