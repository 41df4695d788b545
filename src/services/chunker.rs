//! Fixed-size, non-overlapping text chunking.

use crate::models::{Chunk, ChunkingConfig};

/// Splits text into consecutive chunks of at most `chunk_size` characters,
/// keeping no more than `max_chunks` of them.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    max_chunks: usize,
}

impl TextChunker {
    /// Create a chunker from configuration. A zero chunk size is treated as one.
    pub fn new(config: &ChunkingConfig) -> Self {
        Self::with_limits(config.chunk_size, config.max_chunks)
    }

    pub fn with_limits(chunk_size: usize, max_chunks: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_chunks,
        }
    }

    /// Create a chunker with default settings (7500 characters, 100 chunks).
    pub fn with_defaults() -> Self {
        Self::new(&ChunkingConfig::default())
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    /// Split `text` in order, starting at offset 0. The last chunk may be
    /// shorter; anything past `max_chunks * chunk_size` characters is dropped.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut rest = text;

        while !rest.is_empty() && chunks.len() < self.max_chunks {
            let split = rest
                .char_indices()
                .nth(self.chunk_size)
                .map_or(rest.len(), |(offset, _)| offset);
            let (head, tail) = rest.split_at(split);

            chunks.push(Chunk {
                index: chunks.len(),
                text: head.to_string(),
            });
            rest = tail;
        }

        chunks
    }

    /// Number of characters that `chunk` would discard.
    pub fn truncated_chars(&self, text: &str) -> usize {
        let limit = self.chunk_size.saturating_mul(self.max_chunks);
        text.chars().count().saturating_sub(limit)
    }
}
