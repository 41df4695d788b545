//! Vector store abstraction layer.
//!
//! A trait over the supported backends (Pinecone, Qdrant) so the embed
//! pipeline only ever sees `upsert` of one record into one index/namespace.

mod pinecone;
mod qdrant;

pub use pinecone::PineconeBackend;
pub use qdrant::QdrantBackend;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::{EmbeddingConfig, VectorDriver, VectorRecord, VectorStoreConfig};

/// Abstract trait for vector store operations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Make the index ready to receive records.
    async fn prepare(&self) -> Result<(), VectorStoreError> {
        Ok(())
    }

    /// Insert or overwrite a single record, keyed by its id.
    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError>;

    /// Get the index (or collection) name.
    fn index(&self) -> &str;

    /// Get the namespace records are written into.
    fn namespace(&self) -> &str;
}

/// Create a vector store backend based on configuration.
pub async fn create_backend(
    config: &VectorStoreConfig,
    embedding: &EmbeddingConfig,
) -> Result<Box<dyn VectorStore>, VectorStoreError> {
    match config.driver {
        VectorDriver::Pinecone => {
            let backend = PineconeBackend::connect(config).await?;
            Ok(Box::new(backend))
        }
        VectorDriver::Qdrant => {
            let backend = QdrantBackend::new(config, embedding.dimension)?;
            Ok(Box::new(backend))
        }
    }
}
