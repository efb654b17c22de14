// Operations produced by the finder.
//
// An operation is either a single literal byte or a back-reference into
// the dictionary.  The only property the driver needs is how many bytes
// an operation consumes.

use std::fmt;

/// Shortest back-reference worth emitting.
pub const MIN_MATCH_LEN: usize = 2;

/// Longest back-reference a single match may cover.
pub const MAX_MATCH_LEN: usize = 273;

/// A single raw byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub byte: u8,
}

/// A back-reference: copy `length` bytes starting `distance` bytes before
/// the current head.  The copy may overlap the bytes it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub distance: u64,
    pub length: usize,
}

/// One parsing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Literal(Literal),
    Match(Match),
}

impl Operation {
    /// Build a literal operation.
    #[inline]
    pub fn literal(byte: u8) -> Self {
        Self::Literal(Literal { byte })
    }

    /// Build a match operation.
    #[inline]
    pub fn backref(distance: u64, length: usize) -> Self {
        debug_assert!(distance > 0);
        debug_assert!((MIN_MATCH_LEN..=MAX_MATCH_LEN).contains(&length));
        Self::Match(Match { distance, length })
    }

    /// Number of input bytes this operation covers.
    #[inline]
    pub fn length(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match(m) => m.length,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

impl From<Literal> for Operation {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

impl From<Match> for Operation {
    fn from(m: Match) -> Self {
        Self::Match(m)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = if self.byte.is_ascii_graphic() || self.byte == b' ' {
            self.byte as char
        } else {
            '.'
        };
        write!(f, "L{{{c}/{:02x}}}", self.byte)
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{{{},{}}}", self.distance, self.length)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(l) => l.fmt(f),
            Self::Match(m) => m.fmt(f),
        }
    }
}

/// Total number of bytes covered by a sequence of operations.
pub fn total_length(ops: &[Operation]) -> u64 {
    ops.iter().map(|op| op.length() as u64).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
