// Hash-indexed sliding-window dictionary.
//
// `HashDict` owns the ring buffer and the prefix table.  Its committed
// `head` only moves through `commit`; finder runs move a private
// `DictView` through `advance`.
//
// Indexing uses a high-water mark: every position below `indexed_to` is
// in the table exactly once.  A finder run that is later thrown away
// leaves the table holding positions beyond the committed head, which
// lookups filter out, so repeating the run sees the same candidates.

use std::io;

use log::trace;

use super::buffer::WindowBuffer;
use super::{DictError, DictView, Dictionary};
use crate::hash::config::{DictConfig, PREFIX_LEN};
use crate::hash::table::PrefixTable;

pub struct HashDict {
    buf: WindowBuffer,
    table: PrefixTable,
    config: DictConfig,
    /// Committed head.
    head: u64,
    /// All positions below this are indexed (or were evicted unindexed).
    indexed_to: u64,
}

impl HashDict {
    /// Create an empty dictionary for `config`.
    pub fn new(config: DictConfig) -> Result<Self, DictError> {
        config.validate()?;
        let capacity = config.capacity();
        Ok(Self {
            buf: WindowBuffer::new(capacity),
            table: PrefixTable::new(capacity),
            config,
            head: 0,
            indexed_to: 0,
        })
    }

    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    /// Committed head.
    pub fn head(&self) -> u64 {
        self.head
    }

    /// One past the newest buffered byte.
    pub fn top(&self) -> u64 {
        self.buf.top()
    }

    /// Bytes written but not yet committed.
    pub fn pending(&self) -> u64 {
        self.buf.top() - self.head
    }

    /// Bytes that can be written without evicting data the committed
    /// window still references.
    pub fn free(&self) -> usize {
        let in_use = self.buf.top() - self.view().window_start();
        self.buf.capacity() - in_use as usize
    }

    /// Append as much of `p` as fits; returns the number of bytes taken.
    pub fn write_bytes(&mut self, p: &[u8]) -> usize {
        let n = p.len().min(self.free());
        if n > 0 {
            self.buf.write(&p[..n]);
            self.index_through(self.head);
        }
        n
    }

    /// Move the committed head forward by `n` bytes.
    pub fn commit(&mut self, n: usize) -> Result<(), DictError> {
        let available = self.pending();
        if n as u64 > available {
            return Err(DictError::AdvanceOutOfRange { n, available });
        }
        self.head += n as u64;
        self.index_through(self.head);
        trace!("commit {n} bytes, head={}", self.head);
        Ok(())
    }

    /// Index every position below `end` whose prefix is fully buffered.
    fn index_through(&mut self, end: u64) {
        let keyed_limit = self.buf.top().saturating_sub(PREFIX_LEN as u64 - 1);
        let limit = end.min(keyed_limit);
        let mut pos = self.indexed_to.max(self.buf.floor());
        let mut key = [0u8; PREFIX_LEN];
        while pos < limit {
            if let Ok(PREFIX_LEN) = self.buf.read_at(&mut key, pos) {
                self.table.insert(&key, pos);
            }
            pos += 1;
        }
        self.indexed_to = self.indexed_to.max(limit);
    }
}

impl Dictionary for HashDict {
    fn view(&self) -> DictView {
        DictView {
            head: self.head,
            top: self.buf.top(),
            floor: self.buf.floor(),
            dict_size: self.config.dict_size as u64,
        }
    }

    fn equal_run_length(&self, a: u64, b: u64, max_len: usize) -> usize {
        self.buf.equal_run_length(a, b, max_len)
    }

    fn read_at(&self, buf: &mut [u8], pos: u64) -> Result<usize, DictError> {
        self.buf.read_at(buf, pos)
    }

    fn candidate_offsets(&self, view: &DictView, prefix: &[u8], out: &mut Vec<u64>) {
        if prefix.len() < PREFIX_LEN {
            return;
        }
        let key = &prefix[..PREFIX_LEN];
        let buf = &self.buf;
        self.table.collect(
            key,
            view.window_start(),
            view.head,
            self.config.max_chain,
            out,
            |pos| {
                // Bucket collisions share a chain; keep true prefix matches only.
                let mut stored = [0u8; PREFIX_LEN];
                matches!(buf.read_at(&mut stored, pos), Ok(PREFIX_LEN)) && stored[..] == *key
            },
        );
    }

    fn advance(&mut self, view: &mut DictView, n: usize) -> Result<(), DictError> {
        let available = view.available();
        if n as u64 > available {
            return Err(DictError::AdvanceOutOfRange { n, available });
        }
        view.head += n as u64;
        self.index_through(view.head);
        Ok(())
    }
}

impl io::Write for HashDict {
    /// Accepts as many bytes as fit; `Ok(0)` means the window is full and
    /// the caller must commit before writing more.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
