//! lzgreedy: greedy LZ77 match finding in Rust.
//!
//! The crate provides:
//! - The operation model (`ops`)
//! - A sliding-window dictionary with a 4-byte prefix index (`dict`, `hash`)
//! - The greedy finder (`finder`)
//! - A streaming parser and one-shot APIs (`stream`, `engine`)
//! - Operation replay for verification (`decode`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use lzgreedy::engine;
//! use lzgreedy::ops::Operation;
//!
//! let ops = engine::parse(b"abcabcabc").unwrap();
//! assert_eq!(ops.last(), Some(&Operation::backref(3, 6)));
//! assert_eq!(engine::decode(&ops).unwrap(), b"abcabcabc");
//! ```

pub mod decode;
pub mod dict;
pub mod engine;
pub mod finder;
pub mod hash;
pub mod ops;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;
