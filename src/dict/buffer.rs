// Ring buffer holding the most recent bytes of the stream.
//
// Positions are absolute stream offsets.  The buffer keeps the bytes in
// `floor..top`; writing past capacity evicts from the floor.

use super::DictError;
use crate::hash::rolling::forward_match;

/// Fixed-capacity ring of stream bytes addressed by absolute position.
pub struct WindowBuffer {
    data: Vec<u8>,
    floor: u64,
    top: u64,
}

impl WindowBuffer {
    /// Create an empty buffer.  `capacity` must be positive.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            data: vec![0u8; capacity.max(1)],
            floor: 0,
            top: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Oldest buffered position.
    pub fn floor(&self) -> u64 {
        self.floor
    }

    /// One past the newest buffered position.
    pub fn top(&self) -> u64 {
        self.top
    }

    #[inline]
    fn index(&self, pos: u64) -> usize {
        (pos % self.data.len() as u64) as usize
    }

    /// Append `p`, evicting the oldest bytes when the buffer overflows.
    pub fn write(&mut self, p: &[u8]) {
        let cap = self.data.len();
        // Only the last `cap` bytes can survive.
        let skip = p.len().saturating_sub(cap);
        self.top += skip as u64;
        let mut rest = &p[skip..];

        let mut idx = self.index(self.top);
        self.top += rest.len() as u64;
        while !rest.is_empty() {
            let n = (cap - idx).min(rest.len());
            self.data[idx..idx + n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            idx = 0;
        }
        self.floor = self.floor.max(self.top.saturating_sub(cap as u64));
    }

    /// Longest contiguous slice starting at `pos`, at most `len` bytes.
    /// Caller guarantees `floor <= pos <= top`.
    #[inline]
    fn contiguous(&self, pos: u64, len: usize) -> &[u8] {
        let idx = self.index(pos);
        let n = len
            .min(self.data.len() - idx)
            .min((self.top - pos) as usize);
        &self.data[idx..idx + n]
    }

    /// Copy bytes starting at `pos` into `buf`.  Returns the number copied,
    /// which is short only at `top`.
    pub fn read_at(&self, buf: &mut [u8], pos: u64) -> Result<usize, DictError> {
        if pos < self.floor || pos > self.top {
            return Err(DictError::OutOfRange {
                pos,
                floor: self.floor,
                top: self.top,
            });
        }
        let want = buf.len().min((self.top - pos) as usize);
        let mut done = 0usize;
        while done < want {
            let chunk = self.contiguous(pos + done as u64, want - done);
            buf[done..done + chunk.len()].copy_from_slice(chunk);
            done += chunk.len();
        }
        Ok(want)
    }

    /// Number of equal bytes starting at `a` and `b`, capped at `max_len`
    /// and at `top`.  Positions outside the buffer compare as 0.
    pub fn equal_run_length(&self, a: u64, b: u64, max_len: usize) -> usize {
        let range = self.floor..self.top;
        if !range.contains(&a) || !range.contains(&b) {
            return 0;
        }
        let limit = max_len.min((self.top - a.max(b)) as usize);
        let mut i = 0usize;
        while i < limit {
            let sa = self.contiguous(a + i as u64, limit - i);
            let sb = self.contiguous(b + i as u64, limit - i);
            let n = sa.len().min(sb.len());
            let m = forward_match(sa, sb, n);
            i += m;
            if m < n {
                break;
            }
        }
        i
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
