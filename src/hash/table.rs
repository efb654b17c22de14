// Prefix index for the dictionary.
//
// A bucket array keyed by the 4-byte prefix checksum holds the most
// recent position for each bucket; a `prev` ring (indexed by
// `pos & mask`) links every position to the previous one in its bucket.
//
// Entries are u32 offsets from `base`, plus HASH_CKOFFSET so that 0 means
// "empty".  When a position no longer fits, the base moves forward and
// entries older than one ring length are dropped.

use super::rolling::{HASH_CKOFFSET, HashCfg, prefix_cksum};

/// Largest offset from `base` an entry can hold.
const MAX_REL: u64 = u32::MAX as u64 - HASH_CKOFFSET;

/// Chained 4-byte prefix table.
pub struct PrefixTable {
    /// Bucket array: `table[bucket] = pos - base + HASH_CKOFFSET` or 0.
    table: Vec<u32>,
    /// Hash configuration.
    cfg: HashCfg,
    /// `prev[pos & prev_mask]` = previous entry in the same bucket.
    prev: Vec<u32>,
    /// Mask for prev array indexing: `prev.len() - 1`.
    prev_mask: usize,
    /// Position stored entries are relative to.
    base: u64,
}

impl PrefixTable {
    /// Create a table able to chain every position of a window of
    /// `window` bytes.  `window` must stay well below 2^32.
    pub fn new(window: usize) -> Self {
        let cfg = HashCfg::new(window.max(8));
        let prev_len = window.max(16).next_power_of_two();
        debug_assert!((prev_len as u64) < MAX_REL / 2);
        Self {
            table: vec![0u32; cfg.size],
            cfg,
            prev: vec![0u32; prev_len],
            prev_mask: prev_len - 1,
            base: 0,
        }
    }

    #[inline]
    fn decode(&self, val: u32) -> Option<u64> {
        (val != 0).then(|| self.base + u64::from(val) - HASH_CKOFFSET)
    }

    /// Insert `pos`, whose first 4 bytes are `prefix`.  Positions must be
    /// inserted in increasing order.
    #[inline]
    pub fn insert(&mut self, prefix: &[u8], pos: u64) {
        debug_assert!(pos >= self.base);
        if pos - self.base > MAX_REL {
            self.rebase(pos);
        }
        let stored = (pos - self.base + HASH_CKOFFSET) as u32;
        let bucket = self.cfg.bucket(prefix_cksum(prefix));
        let old_head = self.table[bucket];
        self.prev[pos as usize & self.prev_mask] = old_head;
        self.table[bucket] = stored;
    }

    /// Move `base` up to one ring length behind `pos`.  Entries below the
    /// new base can no longer be chained and become empty.
    fn rebase(&mut self, pos: u64) {
        let new_base = pos.saturating_sub(self.prev_mask as u64 + 1).max(self.base);
        let delta = new_base - self.base;
        let shift = |v: &mut u32| {
            let rel = u64::from(*v);
            *v = if rel < HASH_CKOFFSET + delta {
                0
            } else {
                (rel - delta) as u32
            };
        };
        self.table.iter_mut().for_each(shift);
        self.prev.iter_mut().for_each(shift);
        self.base = new_base;
    }

    /// Most recent position stored for `prefix`.
    #[inline]
    pub fn lookup(&self, prefix: &[u8]) -> Option<u64> {
        self.decode(self.table[self.cfg.bucket(prefix_cksum(prefix))])
    }

    /// Previous position chained behind `pos`.
    ///
    /// Returns `None` when the chain ends or the slot has been reused by a
    /// newer position.
    #[inline]
    pub fn chain_prev(&self, pos: u64) -> Option<u64> {
        let prev_pos = self.decode(self.prev[pos as usize & self.prev_mask])?;
        // A newer entry means the ring wrapped over this slot.
        if prev_pos >= pos {
            return None;
        }
        if pos - prev_pos > self.prev_mask as u64 {
            return None;
        }
        Some(prev_pos)
    }

    /// Walk the chain for `prefix`, most recent first, appending positions
    /// in `low..high` that pass `accept` to `out`.  Other positions are
    /// skipped without counting toward `limit`; the walk stops below `low`.
    pub fn collect<F>(
        &self,
        prefix: &[u8],
        low: u64,
        high: u64,
        limit: usize,
        out: &mut Vec<u64>,
        mut accept: F,
    ) where
        F: FnMut(u64) -> bool,
    {
        let mut cur = self.lookup(prefix);
        let mut taken = 0usize;
        while let Some(pos) = cur {
            if pos < low {
                break;
            }
            if pos < high && accept(pos) {
                out.push(pos);
                taken += 1;
                if taken == limit {
                    break;
                }
            }
            cur = self.chain_prev(pos);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_lookup() {
        let mut t = PrefixTable::new(1024);
        assert!(t.lookup(b"abcd").is_none());
        t.insert(b"abcd", 100);
        assert_eq!(t.lookup(b"abcd"), Some(100));
    }

    #[test]
    fn newest_entry_is_head() {
        let mut t = PrefixTable::new(1024);
        t.insert(b"abcd", 100);
        t.insert(b"abcd", 200);
        assert_eq!(t.lookup(b"abcd"), Some(200));
    }

    #[test]
    fn position_zero_is_not_empty() {
        let mut t = PrefixTable::new(64);
        t.insert(b"wxyz", 0);
        assert_eq!(t.lookup(b"wxyz"), Some(0));
    }

    #[test]
    fn positions_past_u32_rebase() {
        let mut t = PrefixTable::new(1024);
        let near = (1u64 << 32) - 10;
        t.insert(b"abcd", 7);
        t.insert(b"abcd", near);
        t.insert(b"wxyz", near + 1);
        t.insert(b"abcd", near + 20);
        assert_eq!(t.lookup(b"abcd"), Some(near + 20));
        assert_eq!(t.chain_prev(near + 20), Some(near));
        assert!(t.chain_prev(near).is_none());
        assert_eq!(t.lookup(b"wxyz"), Some(near + 1));

        // Far beyond: everything older than one ring length is dropped.
        let far = 3u64 << 32;
        t.insert(b"abcd", far);
        assert!(t.chain_prev(far).is_none());
        assert_eq!(t.lookup(b"wxyz"), None);
        assert_eq!(t.lookup(b"abcd"), Some(far));
    }

    #[test]
    fn chaining() {
        let mut t = PrefixTable::new(256);
        t.insert(b"abcd", 10);
        t.insert(b"abcd", 50);
        assert_eq!(t.lookup(b"abcd"), Some(50));
        assert_eq!(t.chain_prev(50), Some(10));
        assert!(t.chain_prev(10).is_none());
    }

    #[test]
    fn chain_stale_rejection() {
        let mut t = PrefixTable::new(16);
        t.insert(b"abcd", 0);
        t.insert(b"abcd", 100);
        // 100 is beyond the 16-entry ring from 0.
        assert!(t.chain_prev(100).is_none());
    }

    #[test]
    fn collect_filters_and_limits() {
        let mut t = PrefixTable::new(1024);
        for pos in [5u64, 20, 40, 60, 80] {
            t.insert(b"abcd", pos);
        }
        let mut out = Vec::new();
        t.collect(b"abcd", 10, 70, 10, &mut out, |_| true);
        assert_eq!(out, vec![60, 40, 20]);

        out.clear();
        t.collect(b"abcd", 0, 100, 2, &mut out, |_| true);
        assert_eq!(out, vec![80, 60]);

        // Skipped entries above `high` do not use up the limit.
        out.clear();
        t.collect(b"abcd", 0, 45, 2, &mut out, |_| true);
        assert_eq!(out, vec![40, 20]);

        out.clear();
        t.collect(b"abcd", 0, 100, 10, &mut out, |pos| pos % 20 == 0);
        assert_eq!(out, vec![80, 60, 40, 20]);
    }
}
