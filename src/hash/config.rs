// Dictionary profiles.
//
// Each profile fixes the window geometry and how deep the prefix index
// is walked when listing candidates.

use crate::dict::DictError;
use crate::ops::MAX_MATCH_LEN;

/// Number of short distances (1..=SHORT_DISTANCES) probed at every position.
pub const SHORT_DISTANCES: u64 = 10;

/// Width of the prefix the index is keyed on.
pub const PREFIX_LEN: usize = 4;

/// Default maximum match distance (1 MiB).
pub const DEFAULT_DICT_SIZE: usize = 1 << 20;

/// Default lookahead kept in front of the window (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 16;

/// Largest accepted window (64 MiB).
pub const MAX_DICT_SIZE: usize = 1 << 26;

/// Largest accepted lookahead (16 MiB).
pub const MAX_BUFFER_SIZE: usize = 1 << 24;

/// Dictionary configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictConfig {
    /// Name for display purposes.
    pub name: &'static str,
    /// Largest distance a match may reach back.
    pub dict_size: usize,
    /// Bytes buffered beyond the window for lookahead.
    pub buffer_size: usize,
    /// Maximum number of indexed candidates returned per position.
    pub max_chain: usize,
}

impl DictConfig {
    /// Ring buffer capacity: the window plus the lookahead.
    pub fn capacity(&self) -> usize {
        self.dict_size + self.buffer_size
    }

    /// Same profile with a different window size.
    pub fn with_dict_size(mut self, dict_size: usize) -> Self {
        self.dict_size = dict_size;
        self
    }

    /// Same profile with a different lookahead size.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Check the configuration can drive the streaming parser.
    ///
    /// The lookahead must exceed one maximal match, otherwise a full
    /// buffer could be covered by a single provisional operation and no
    /// progress would be possible.  Both sizes are capped so the ring and
    /// the prefix table stay allocatable.
    pub fn validate(&self) -> Result<(), DictError> {
        if self.dict_size == 0 {
            return Err(DictError::InvalidConfig("dict_size must be positive".into()));
        }
        if self.dict_size > MAX_DICT_SIZE {
            return Err(DictError::InvalidConfig(format!(
                "dict_size {} exceeds max {MAX_DICT_SIZE}",
                self.dict_size
            )));
        }
        if self.buffer_size <= MAX_MATCH_LEN {
            return Err(DictError::InvalidConfig(format!(
                "buffer_size {} must exceed the maximum match length {MAX_MATCH_LEN}",
                self.buffer_size
            )));
        }
        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(DictError::InvalidConfig(format!(
                "buffer_size {} exceeds max {MAX_BUFFER_SIZE}",
                self.buffer_size
            )));
        }
        if self.max_chain == 0 {
            return Err(DictError::InvalidConfig("max_chain must be positive".into()));
        }
        Ok(())
    }
}

impl Default for DictConfig {
    fn default() -> Self {
        DEFAULT
    }
}

/// Compression levels mapping to profiles.
///
/// - Levels 0-1: fastest
/// - Levels 2-5: fast
/// - Level 6: default
/// - Levels 7-9: slow
pub fn config_for_level(level: u32) -> DictConfig {
    match level {
        0 | 1 => FASTEST,
        2..=5 => FAST,
        6 => DEFAULT,
        _ => SLOW,
    }
}

// ---------------------------------------------------------------------------
// Profile definitions
// ---------------------------------------------------------------------------

pub const FASTEST: DictConfig = DictConfig {
    name: "fastest",
    dict_size: 1 << 16,
    buffer_size: DEFAULT_BUFFER_SIZE,
    max_chain: 2,
};

pub const FAST: DictConfig = DictConfig {
    name: "fast",
    dict_size: 1 << 18,
    buffer_size: DEFAULT_BUFFER_SIZE,
    max_chain: 8,
};

pub const DEFAULT: DictConfig = DictConfig {
    name: "default",
    dict_size: DEFAULT_DICT_SIZE,
    buffer_size: DEFAULT_BUFFER_SIZE,
    max_chain: 22,
};

pub const SLOW: DictConfig = DictConfig {
    name: "slow",
    dict_size: 1 << 23,
    buffer_size: DEFAULT_BUFFER_SIZE,
    max_chain: 64,
};
