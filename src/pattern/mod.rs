//! SHA-256 test pattern verification
//!
//! The firmware under test fills a 400KB buffer with `(offset + i) & 0xFF`,
//! hashes it in 64KB chunks with the on-chip SHA engine and prints the
//! digest. This module regenerates the same pattern on the host so the
//! printed digest can be checked.

pub mod digest;
pub mod generate;
pub mod report;
pub mod snippet;

pub use digest::{hash_chunked, hash_chunked_with, hash_whole, Sha256Digest};
pub use generate::{fill, generate, Chunk, ChunkPlan};
pub use report::{verify, Outcome, Verification};
pub use snippet::render_c_snippet;

use thiserror::Error;

/// Total test pattern size (400KB)
pub const TEST_DATA_SIZE: usize = 400 * 1024;

/// Chunk size used by the firmware (64KB)
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Number of chunks the firmware processes
pub const NUM_CHUNKS: usize = TEST_DATA_SIZE.div_ceil(CHUNK_SIZE);

/// SHA-256 of the 400KB pattern; the board should report this digest
pub const EXPECTED_PATTERN_SHA256: &str =
    "870130e6ddddd5d74acfa65ae6e060c0bdc135930cc55562c696737c6d046aee";

/// Errors raised while planning or hashing the pattern
#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("chunk size must be non-zero")]
    ZeroChunkSize,

    #[error("invalid digest hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
