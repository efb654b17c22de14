// Sliding-window dictionary.
//
// The finder only talks to a dictionary through the `Dictionary` trait:
// a cheap `DictView` snapshot (head/top/window start), byte comparison,
// reads, prefix-indexed candidate lookup, and `advance`, the single
// mutating call.  `HashDict` is the ring-buffer + hash-chain
// implementation used by the streaming parser.

pub mod buffer;
pub mod hash_dict;

pub use buffer::WindowBuffer;
pub use hash_dict::HashDict;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DictError {
    #[error("position {pos} outside buffered range {floor}..{top}")]
    OutOfRange { pos: u64, floor: u64, top: u64 },
    #[error("cannot advance {n} bytes, only {available} available")]
    AdvanceOutOfRange { n: usize, available: u64 },
    #[error("invalid dictionary configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Read-only snapshot of the window state.
///
/// The finder works on a copy of this and moves its `head` forward through
/// `Dictionary::advance`; the dictionary's committed head is not affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictView {
    /// Next position to encode.
    pub head: u64,
    /// Exclusive upper bound of the available data.
    pub top: u64,
    /// Oldest position still held by the buffer.
    pub floor: u64,
    /// Largest distance a match may reach back.
    pub dict_size: u64,
}

impl DictView {
    /// Oldest position a match starting at `head` may reference.
    #[inline]
    pub fn window_start(&self) -> u64 {
        self.head.saturating_sub(self.dict_size).max(self.floor)
    }

    /// Bytes available at and after `head`.
    #[inline]
    pub fn available(&self) -> u64 {
        self.top - self.head
    }
}

// ---------------------------------------------------------------------------
// Dictionary trait
// ---------------------------------------------------------------------------

/// The dictionary collaborator consumed by the finder.
pub trait Dictionary {
    /// Snapshot of the committed state.
    fn view(&self) -> DictView;

    /// Number of equal bytes starting at positions `a` and `b`, capped at
    /// `max_len` and at the end of available data.
    fn equal_run_length(&self, a: u64, b: u64, max_len: usize) -> usize;

    /// Copy bytes starting at `pos` into `buf`.
    ///
    /// Returns the number of bytes copied; a short count means the end of
    /// the available data was reached.  Positions outside the buffered
    /// range are an error.
    fn read_at(&self, buf: &mut [u8], pos: u64) -> Result<usize, DictError>;

    /// Append the positions whose first bytes equal `prefix` to `out`,
    /// restricted to `view.window_start()..view.head`.
    fn candidate_offsets(&self, view: &DictView, prefix: &[u8], out: &mut Vec<u64>);

    /// Consume `n` bytes at `view.head`, refreshing the index for the
    /// consumed positions.
    fn advance(&mut self, view: &mut DictView, n: usize) -> Result<(), DictError>;
}
