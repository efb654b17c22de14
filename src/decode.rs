// Operation replay.
//
// Rebuilds the parsed bytes from an operation sequence.  Used to verify
// parses; matches may overlap the bytes they produce (distance < length).

use thiserror::Error;

use crate::ops::{MAX_MATCH_LEN, MIN_MATCH_LEN, Operation};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("match distance {distance} exceeds {available} decoded bytes")]
    InvalidDistance { distance: u64, available: u64 },
    #[error("match length {length} outside {MIN_MATCH_LEN}..={MAX_MATCH_LEN}")]
    InvalidLength { length: usize },
}

/// Accumulates the output of replayed operations.
#[derive(Debug, Default, Clone)]
pub struct OpDecoder {
    out: Vec<u8>,
}

impl OpDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Decoded bytes so far.
    pub fn output(&self) -> &[u8] {
        &self.out
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }

    /// Apply one operation.  On error the output is left unchanged.
    pub fn apply(&mut self, op: &Operation) -> Result<(), DecodeError> {
        match *op {
            Operation::Literal(l) => self.out.push(l.byte),
            Operation::Match(m) => {
                if !(MIN_MATCH_LEN..=MAX_MATCH_LEN).contains(&m.length) {
                    return Err(DecodeError::InvalidLength { length: m.length });
                }
                let available = self.out.len() as u64;
                if m.distance == 0 || m.distance > available {
                    return Err(DecodeError::InvalidDistance {
                        distance: m.distance,
                        available,
                    });
                }
                let start = self.out.len() - m.distance as usize;
                if m.distance as usize >= m.length {
                    self.out.extend_from_within(start..start + m.length);
                } else {
                    // Overlapping copy: each byte may be one just written.
                    self.out.reserve(m.length);
                    for i in 0..m.length {
                        let b = self.out[start + i];
                        self.out.push(b);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn apply_all(&mut self, ops: &[Operation]) -> Result<(), DecodeError> {
        ops.iter().try_for_each(|op| self.apply(op))
    }
}

/// Replay `ops` from an empty output.
pub fn decode_ops(ops: &[Operation]) -> Result<Vec<u8>, DecodeError> {
    let mut dec = OpDecoder::with_capacity(crate::ops::total_length(ops) as usize);
    dec.apply_all(ops)?;
    Ok(dec.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_and_copy() {
        let ops = [
            Operation::literal(b'a'),
            Operation::literal(b'b'),
            Operation::literal(b'c'),
            Operation::backref(3, 3),
        ];
        assert_eq!(decode_ops(&ops).unwrap(), b"abcabc");
    }

    #[test]
    fn overlapping_copy_repeats() {
        let ops = [
            Operation::literal(b'a'),
            Operation::literal(b'b'),
            Operation::backref(2, 7),
        ];
        assert_eq!(decode_ops(&ops).unwrap(), b"ababababa");

        let ops = [Operation::literal(b'z'), Operation::backref(1, 273)];
        assert_eq!(decode_ops(&ops).unwrap(), vec![b'z'; 274]);
    }

    #[test]
    fn distance_beyond_output_fails() {
        let ops = [Operation::literal(b'a'), Operation::backref(2, 2)];
        assert_eq!(
            decode_ops(&ops),
            Err(DecodeError::InvalidDistance {
                distance: 2,
                available: 1
            })
        );
    }

    #[test]
    fn zero_distance_fails() {
        let mut dec = OpDecoder::new();
        dec.apply(&Operation::literal(b'a')).unwrap();
        assert!(matches!(
            dec.apply(&Operation::backref(0, 2)),
            Err(DecodeError::InvalidDistance { distance: 0, .. })
        ));
        assert_eq!(dec.output(), b"a");
    }

    #[test]
    fn length_outside_range_fails() {
        let mut dec = OpDecoder::new();
        dec.apply_all(&[Operation::literal(b'a'), Operation::literal(b'a')])
            .unwrap();
        assert_eq!(
            dec.apply(&Operation::backref(1, 1)),
            Err(DecodeError::InvalidLength { length: 1 })
        );
        assert_eq!(
            dec.apply(&Operation::backref(1, 274)),
            Err(DecodeError::InvalidLength { length: 274 })
        );
        assert_eq!(dec.len(), 2);
    }

    #[test]
    fn empty_sequence() {
        assert!(decode_ops(&[]).unwrap().is_empty());
        assert!(OpDecoder::new().is_empty());
    }
}
