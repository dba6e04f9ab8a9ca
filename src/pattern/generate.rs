//! Deterministic test pattern generation and chunk planning

use super::PatternError;

/// Generate `size` bytes of the test pattern starting at logical `offset`.
///
/// Element `k` is `(offset + k) mod 256`, so a chunk generated at its
/// absolute offset matches the same range of the full buffer.
pub fn generate(size: usize, offset: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    fill(&mut buf, offset);
    buf
}

/// Fill `buf` with the test pattern starting at logical `offset`
pub fn fill(buf: &mut [u8], offset: usize) {
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte = (offset.wrapping_add(i) & 0xFF) as u8;
    }
}

/// One chunk of the pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based chunk number, as printed in progress lines
    pub index: usize,
    /// Absolute offset of the first byte
    pub offset: usize,
    /// Number of bytes in this chunk
    pub len: usize,
}

/// Partition of `[0, size)` into consecutive chunks of at most `chunk_size`
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    size: usize,
    chunk_size: usize,
}

impl ChunkPlan {
    /// Plan chunks over `size` bytes. Rejects a zero chunk size.
    pub fn new(size: usize, chunk_size: usize) -> Result<Self, PatternError> {
        if chunk_size == 0 {
            return Err(PatternError::ZeroChunkSize);
        }
        Ok(Self { size, chunk_size })
    }

    /// Total bytes covered by the plan
    pub fn size(&self) -> usize {
        self.size
    }

    /// Maximum chunk length
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks; the last one may be short, never empty
    pub fn len(&self) -> usize {
        self.size.div_ceil(self.chunk_size)
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterate chunks in increasing offset order
    pub fn iter(&self) -> impl Iterator<Item = Chunk> + '_ {
        (0..self.len()).map(move |n| {
            let offset = n * self.chunk_size;
            Chunk {
                index: n + 1,
                offset,
                len: self.chunk_size.min(self.size - offset),
            }
        })
    }
}
