// Prefix hashing and byte comparison helpers.
//
// The prefix checksum covers exactly 4 bytes: read them as a little-endian
// u32 and multiply by an LCG constant.  Bucket selection folds the high
// bits into the table range.

/// LCG multiplier for 32-bit hashes.
pub const HASH_MULT_32: u32 = 1_597_334_677;

/// Offset added to stored positions so 0 means "empty bucket".
pub const HASH_CKOFFSET: u64 = 1;

// ---------------------------------------------------------------------------
// Prefix checksum
// ---------------------------------------------------------------------------

/// Checksum of the first 4 bytes of `prefix`.
#[inline(always)]
pub fn prefix_cksum(prefix: &[u8]) -> u32 {
    debug_assert!(prefix.len() >= 4);
    let val = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    val.wrapping_mul(HASH_MULT_32)
}

// ---------------------------------------------------------------------------
// Bucket folding
// ---------------------------------------------------------------------------

/// Largest bucket array, in bits.
const MAX_BUCKET_BITS: u32 = 24;

/// Bucket array geometry for the prefix table.
#[derive(Clone, Debug)]
pub struct HashCfg {
    /// Bucket count, a power of two.
    pub size: usize,
    /// `32 - log2(size)`: moves the top checksum bits down.
    pub shift: u32,
    /// Low-bit mask, `size - 1`.
    pub mask: u64,
}

impl HashCfg {
    /// Geometry for a window of `slots` positions: the largest power of two
    /// not above `slots`, between 2^2 and 2^24 buckets.
    pub fn new(slots: usize) -> Self {
        let bits = bucket_bits(slots);
        let size = 1usize << bits;
        Self {
            size,
            shift: 32 - bits,
            mask: size as u64 - 1,
        }
    }

    /// Fold a checksum into `0..size`.
    #[inline(always)]
    pub fn bucket(&self, cksum: u32) -> usize {
        let c = u64::from(cksum);
        ((c >> self.shift) ^ (c & self.mask)) as usize
    }
}

fn bucket_bits(slots: usize) -> u32 {
    slots.max(4).ilog2().min(MAX_BUCKET_BITS)
}

// ---------------------------------------------------------------------------
// Forward match comparison
// ---------------------------------------------------------------------------

/// Length of the common prefix of `s1` and `s2`, looking at no more than
/// `n` bytes.
#[inline]
pub fn forward_match(s1: &[u8], s2: &[u8], n: usize) -> usize {
    let n = n.min(s1.len()).min(s2.len());
    let mut i = 0;

    // Word at a time: the lowest differing byte is the first mismatch.
    let (words1, _) = s1[..n].as_chunks::<8>();
    let (words2, _) = s2[..n].as_chunks::<8>();
    for (a, b) in words1.iter().zip(words2) {
        let xor = u64::from_le_bytes(*a) ^ u64::from_le_bytes(*b);
        if xor != 0 {
            return i + (xor.trailing_zeros() / 8) as usize;
        }
        i += 8;
    }

    while i < n && s1[i] == s2[i] {
        i += 1;
    }
    i
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
