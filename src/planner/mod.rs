use std::num::NonZeroUsize;

/// Default size of one parallel read unit (1 MiB).
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(1024 * 1024) {
    Some(n) => n,
    None => unreachable!(),
};

/// Ordered byte offsets covering `[0, file_size)` in steps of `chunk_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
    offsets: Vec<u64>,
}

impl ChunkPlan {
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Bytes of chunk `index` that lie inside the file. The last chunk may be
    /// shorter than `chunk_size`; out-of-range indices yield `None`.
    pub fn chunk_len(&self, index: usize) -> Option<u64> {
        let offset = *self.offsets.get(index)?;
        Some((self.file_size - offset).min(self.chunk_size))
    }
}

/// Splits a file of `file_size` bytes into `ceil(file_size / chunk_size)`
/// chunks. An empty file produces an empty plan.
pub fn plan(file_size: u64, chunk_size: NonZeroUsize) -> ChunkPlan {
    let chunk_size = chunk_size.get() as u64;
    let count = file_size.div_ceil(chunk_size);

    let offsets = (0..count).map(|i| i * chunk_size).collect();

    ChunkPlan {
        file_size,
        chunk_size,
        offsets,
    }
}
