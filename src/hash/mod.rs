// Prefix hashing and indexing for the dictionary.
//
// This module provides:
// - The 4-byte prefix checksum and bucket folding
// - Word-at-a-time forward match comparison
// - The chained prefix table
// - Dictionary profiles (fastest..slow)

pub mod config;
pub mod rolling;
pub mod table;
