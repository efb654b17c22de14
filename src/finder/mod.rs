// Operation finders.
//
// A finder turns the bytes between a dictionary's head and its top into
// a sequence of literals and matches.  `Greedy` picks the best single
// operation at each position without looking ahead.

pub mod greedy;

pub use greedy::Greedy;

use thiserror::Error;

use crate::dict::{DictError, Dictionary};
use crate::ops::Operation;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FindError {
    /// A decision step ran with no data at the head.
    #[error("empty buffer at position {pos}")]
    EmptyBuffer { pos: u64 },
    /// Read or advance failure from the dictionary, passed through unchanged.
    #[error(transparent)]
    Dict(#[from] DictError),
}

// ---------------------------------------------------------------------------
// OpFinder
// ---------------------------------------------------------------------------

/// Finds the operations covering a dictionary's pending data.
pub trait OpFinder {
    /// Find operations starting at the dictionary's committed head.
    ///
    /// If `all` is set the whole buffered data is covered.  Otherwise the
    /// last operation, which ends at the current top and might grow once
    /// more data arrives, is withheld.  The committed head is not moved;
    /// the caller commits what it keeps.
    fn find_ops<D: Dictionary>(&self, dict: &mut D, all: bool) -> Result<Vec<Operation>, FindError>;

    /// Display name.
    fn name(&self) -> &'static str;
}
