// Parsing engine: one-shot APIs over the streaming parser.
//
// Provides high-level parse/decode calls that:
//   - Pick a dictionary profile from a level (hash::config)
//   - Feed the input through `OpStream` in chunks
//   - Replay operations back into bytes (decode)

use crate::decode::{DecodeError, decode_ops};
use crate::hash::config::{self, DictConfig};
use crate::ops::Operation;
use crate::stream::{OpStream, ParseStats, StreamError};

// ---------------------------------------------------------------------------
// Parse options
// ---------------------------------------------------------------------------

/// Configuration for a one-shot parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Compression level (0-9). Maps to dictionary profiles.
    pub level: u32,
    /// Override the profile's window size.
    pub dict_size: Option<usize>,
    /// Override the profile's lookahead size.
    pub buffer_size: Option<usize>,
    /// Bytes handed to the stream per write.
    pub chunk_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            level: 6,
            dict_size: None,
            buffer_size: None,
            chunk_size: 1 << 16, // 64 KiB
        }
    }
}

impl ParseOptions {
    /// Dictionary configuration after applying overrides.
    pub fn dict_config(&self) -> DictConfig {
        let mut cfg = config::config_for_level(self.level);
        if let Some(n) = self.dict_size {
            cfg = cfg.with_dict_size(n);
        }
        if let Some(n) = self.buffer_size {
            cfg = cfg.with_buffer_size(n);
        }
        cfg
    }
}

// ---------------------------------------------------------------------------
// High-level parse
// ---------------------------------------------------------------------------

/// Parse `data` with default options.
pub fn parse(data: &[u8]) -> Result<Vec<Operation>, StreamError> {
    parse_with_options(data, &ParseOptions::default()).map(|(ops, _)| ops)
}

/// Parse with custom options, returning the operations and stats.
pub fn parse_with_options(
    data: &[u8],
    opts: &ParseOptions,
) -> Result<(Vec<Operation>, ParseStats), StreamError> {
    let cfg = opts.dict_config();
    let mut stream = OpStream::new(Vec::with_capacity(data.len() / 4), cfg)?;
    for chunk in data.chunks(opts.chunk_size.max(1)) {
        stream.write(chunk)?;
    }
    stream.finish()
}

// ---------------------------------------------------------------------------
// High-level decode
// ---------------------------------------------------------------------------

/// Rebuild the bytes described by `ops`.
pub fn decode(ops: &[Operation]) -> Result<Vec<u8>, DecodeError> {
    decode_ops(ops)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8], opts: &ParseOptions) -> Vec<Operation> {
        let (ops, stats) = parse_with_options(data, opts).unwrap();
        assert_eq!(decode(&ops).unwrap(), data);
        assert_eq!(stats.bytes_in, data.len() as u64);
        ops
    }

    #[test]
    fn roundtrip_empty() {
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn roundtrip_text() {
        let data = b"It was the best of times, it was the worst of times, it was the age of wisdom";
        let ops = roundtrip(data, &ParseOptions::default());
        assert!(ops.iter().any(|op| op.is_match()));
    }

    #[test]
    fn all_levels_roundtrip() {
        let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8 ^ (i / 997) as u8).collect();
        for level in 0..=9 {
            let opts = ParseOptions {
                level,
                ..Default::default()
            };
            roundtrip(&data, &opts);
        }
    }

    #[test]
    fn overrides_apply() {
        let opts = ParseOptions {
            level: 6,
            dict_size: Some(4096),
            buffer_size: Some(1024),
            chunk_size: 100,
        };
        let cfg = opts.dict_config();
        assert_eq!(cfg.dict_size, 4096);
        assert_eq!(cfg.buffer_size, 1024);
        assert_eq!(cfg.name, "default");

        let data: Vec<u8> = b"0123456789abcdef".repeat(2000);
        roundtrip(&data, &opts);
    }

    #[test]
    fn bad_override_is_an_error() {
        let opts = ParseOptions {
            buffer_size: Some(16),
            ..Default::default()
        };
        assert!(parse_with_options(b"abc", &opts).is_err());
    }

    #[test]
    fn parse_matches_stream() {
        let data = b"abcabcabc";
        assert_eq!(
            parse(data).unwrap(),
            vec![
                Operation::literal(b'a'),
                Operation::literal(b'b'),
                Operation::literal(b'c'),
                Operation::backref(3, 6),
            ]
        );
    }
}
