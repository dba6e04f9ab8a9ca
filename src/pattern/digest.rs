//! SHA-256 over the test pattern
//!
//! Two hashing strategies the firmware check relies on: one-shot over the
//! whole buffer, and incremental over chunks regenerated at their absolute
//! offsets. Both run RustCrypto's `sha2` directly.

use super::generate::{fill, generate, Chunk, ChunkPlan};
use super::PatternError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// SHA-256 digest size in bytes
pub const SHA256_DIGEST_SIZE: usize = 32;

/// A SHA-256 digest (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest {
    bytes: [u8; SHA256_DIGEST_SIZE],
}

impl Sha256Digest {
    /// Create a new digest from bytes
    pub const fn new(bytes: [u8; SHA256_DIGEST_SIZE]) -> Self {
        Self { bytes }
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; SHA256_DIGEST_SIZE] {
        &self.bytes
    }

    /// Lowercase hex rendering (64 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Digest of `data` in a single update
    pub fn of(data: &[u8]) -> Self {
        Self::from_hasher(Sha256::new_with_prefix(data))
    }

    fn from_hasher(hasher: Sha256) -> Self {
        let mut bytes = [0u8; SHA256_DIGEST_SIZE];
        bytes.copy_from_slice(&hasher.finalize());
        Self::new(bytes)
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

/// Parses 64 hex characters, either case.
impl FromStr for Sha256Digest {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; SHA256_DIGEST_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self::new(bytes))
    }
}

/// Hash the full `size`-byte pattern (offset 0) in a single update
pub fn hash_whole(size: usize) -> Sha256Digest {
    let data = generate(size, 0);
    log::debug!("hashing {} bytes in one shot", data.len());
    Sha256Digest::of(&data)
}

/// Hash the `size`-byte pattern in chunks of at most `chunk_size` bytes
pub fn hash_chunked(size: usize, chunk_size: usize) -> Result<Sha256Digest, PatternError> {
    hash_chunked_with(size, chunk_size, |_| {})
}

/// Like [`hash_chunked`], calling `on_chunk` after each chunk is absorbed.
///
/// Only one chunk-sized buffer is live at a time.
pub fn hash_chunked_with<F>(
    size: usize,
    chunk_size: usize,
    mut on_chunk: F,
) -> Result<Sha256Digest, PatternError>
where
    F: FnMut(&Chunk),
{
    let plan = ChunkPlan::new(size, chunk_size)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; plan.chunk_size().min(size)];

    for chunk in plan.iter() {
        let data = &mut buf[..chunk.len];
        fill(data, chunk.offset);
        hasher.update(&*data);
        log::trace!(
            "chunk {}: offset={} len={}",
            chunk.index,
            chunk.offset,
            chunk.len
        );
        on_chunk(&chunk);
    }

    Ok(Sha256Digest::from_hasher(hasher))
}
