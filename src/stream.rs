// Streaming parser front end.
//
// `OpStream` feeds bytes into a `HashDict` and drives a finder over them:
//   - `write` buffers data; whenever the window is full it runs the finder
//     in incremental mode and commits what it returns.
//   - `flush` does the same for whatever is buffered.
//   - `finish` covers the remainder, including the provisional tail.
// Committed operations go to the sink in stream order.

use std::io;

use log::{debug, warn};
use thiserror::Error;

use crate::dict::{DictError, HashDict};
use crate::finder::{FindError, Greedy, OpFinder};
use crate::hash::config::DictConfig;
use crate::ops::{Operation, total_length};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Find(#[from] FindError),
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error("window full with {pending} pending bytes and no operation committed")]
    Stalled { pending: u64 },
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Dict(DictError::Io(e)) => e,
            StreamError::Find(FindError::Dict(DictError::Io(e))) => e,
            other => io::Error::other(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters for a parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Bytes written into the stream.
    pub bytes_in: u64,
    /// Literal operations emitted.
    pub literals: u64,
    /// Match operations emitted.
    pub matches: u64,
    /// Bytes covered by matches.
    pub matched_bytes: u64,
}

impl ParseStats {
    /// Total operations emitted.
    pub fn ops_out(&self) -> u64 {
        self.literals + self.matches
    }

    /// Account for one emitted operation.
    pub fn record(&mut self, op: &Operation) {
        match op {
            Operation::Literal(_) => self.literals += 1,
            Operation::Match(m) => {
                self.matches += 1;
                self.matched_bytes += m.length as u64;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// OpStream
// ---------------------------------------------------------------------------

/// Incremental parser writing operations into `W`.
pub struct OpStream<W: Extend<Operation>, F: OpFinder = Greedy> {
    dict: HashDict,
    finder: F,
    sink: W,
    stats: ParseStats,
}

impl<W: Extend<Operation>> OpStream<W, Greedy> {
    /// Create a greedy stream over a fresh dictionary.
    pub fn new(sink: W, config: DictConfig) -> Result<Self, StreamError> {
        Self::with_finder(sink, config, Greedy)
    }
}

impl<W: Extend<Operation>, F: OpFinder> OpStream<W, F> {
    /// Create a stream using `finder`.
    pub fn with_finder(sink: W, config: DictConfig, finder: F) -> Result<Self, StreamError> {
        let dict = HashDict::new(config)?;
        debug!(
            "stream: {} with {} profile (dict {} bytes, buffer {} bytes)",
            finder.name(),
            config.name,
            config.dict_size,
            config.buffer_size
        );
        Ok(Self {
            dict,
            finder,
            sink,
            stats: ParseStats::default(),
        })
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Bytes buffered but not yet covered by committed operations.
    pub fn pending(&self) -> u64 {
        self.dict.pending()
    }

    /// Feed `data` into the stream.
    pub fn write(&mut self, mut data: &[u8]) -> Result<(), StreamError> {
        while !data.is_empty() {
            let n = self.dict.write_bytes(data);
            self.stats.bytes_in += n as u64;
            data = &data[n..];
            if self.dict.free() == 0 {
                self.run(false)?;
                if self.dict.free() == 0 {
                    let pending = self.dict.pending();
                    warn!("stream stalled with {pending} pending bytes");
                    return Err(StreamError::Stalled { pending });
                }
            }
        }
        Ok(())
    }

    /// Commit everything except the provisional tail.
    pub fn flush(&mut self) -> Result<(), StreamError> {
        if self.dict.pending() > 0 {
            self.run(false)?;
        }
        Ok(())
    }

    /// Cover the remaining data and return the sink with the final stats.
    pub fn finish(mut self) -> Result<(W, ParseStats), StreamError> {
        if self.dict.pending() > 0 {
            self.run(true)?;
        }
        debug!(
            "stream finished: {} bytes in, {} ops out ({} matches covering {} bytes)",
            self.stats.bytes_in,
            self.stats.ops_out(),
            self.stats.matches,
            self.stats.matched_bytes
        );
        Ok((self.sink, self.stats))
    }

    /// Run the finder once and commit its output.  Returns the number of
    /// operations committed.
    fn run(&mut self, all: bool) -> Result<usize, StreamError> {
        let ops = self.finder.find_ops(&mut self.dict, all)?;
        self.dict.commit(total_length(&ops) as usize)?;
        for op in &ops {
            self.stats.record(op);
        }
        let count = ops.len();
        debug!(
            "{}: committed {count} ops, head={} pending={}",
            self.finder.name(),
            self.dict.head(),
            self.dict.pending()
        );
        self.sink.extend(ops);
        Ok(count)
    }
}

impl<W: Extend<Operation>, F: OpFinder> io::Write for OpStream<W, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        OpStream::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        OpStream::flush(self)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
