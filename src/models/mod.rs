mod config;
mod document;
mod output;
mod report;

pub use config::{
    ChunkingConfig, Config, ConfigSource, DEFAULT_CHUNK_SIZE, DEFAULT_INDEX, DEFAULT_MAX_CHUNKS,
    DEFAULT_NAMESPACE, EmbeddingConfig, ExtractConfig, OPENAI_API_KEY_VAR, PINECONE_API_KEY_VAR,
    PINECONE_ENVIRONMENT_VAR, QDRANT_API_KEY_VAR, VectorDriver, VectorStoreConfig,
};
pub use document::{Chunk, ExtractedText, RecordMetadata, VectorRecord};
pub use output::OutputFormat;
pub use report::{EmbedReport, ExtractReport, ItemFailure};
