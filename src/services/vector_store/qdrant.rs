//! Qdrant vector store backend implementation.

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{VectorRecord, VectorStoreConfig};

/// Qdrant vector store backend.
///
/// Qdrant has no namespaces, so the namespace is stored in the payload and
/// folded into the point id.
pub struct QdrantBackend {
    client: Qdrant,
    collection: String,
    namespace: String,
    embedding_dim: u64,
}

impl QdrantBackend {
    /// Create a new Qdrant backend from configuration with the given embedding dimension.
    pub fn new(config: &VectorStoreConfig, embedding_dim: u64) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.qdrant_api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.index.clone(),
            namespace: config.namespace.clone(),
            embedding_dim,
        })
    }

    /// Stable UUID for a record id within a namespace.
    pub fn point_id(namespace: &str, record_id: &str) -> String {
        let name = format!("{}:{}", namespace, record_id);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }
}

/// Point for `record`, with the namespace and record metadata as payload.
fn to_point(namespace: &str, record: VectorRecord) -> PointStruct {
    let mut payload: HashMap<String, Value> = HashMap::new();
    payload.insert("namespace".to_string(), namespace.to_string().into());
    payload.insert("record_id".to_string(), record.id.clone().into());
    payload.insert("filename".to_string(), record.metadata.filename.into());
    payload.insert(
        "chunk_index".to_string(),
        (record.metadata.chunk_index as i64).into(),
    );

    PointStruct::new(
        QdrantBackend::point_id(namespace, &record.id),
        record.values,
        payload,
    )
}

#[async_trait]
impl VectorStore for QdrantBackend {
    async fn prepare(&self) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if exists {
            return Ok(());
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection).vectors_config(
            VectorParamsBuilder::new(self.embedding_dim, Distance::Cosine),
        );

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::IndexError(e.to_string()))?;

        Ok(())
    }

    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        let point = to_point(&self.namespace, record);
        let upsert = UpsertPointsBuilder::new(&self.collection, vec![point]);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }

    fn index(&self) -> &str {
        &self.collection
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::PointId;

    #[test]
    fn test_point_id_is_stable_uuid() {
        let id = QdrantBackend::point_id("shoe", "a.txt_chunk_0");
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(id, QdrantBackend::point_id("shoe", "a.txt_chunk_0"));
    }

    #[test]
    fn test_point_carries_record_metadata() {
        let record = VectorRecord::new("Café menu_output.txt", 3, vec![0.25, 0.5]);
        let point = to_point("shoe", record);

        assert_eq!(
            point.id,
            Some(PointId::from(QdrantBackend::point_id(
                "shoe",
                "Cafe_menu_output.txt_chunk_3"
            )))
        );
        assert_eq!(point.payload.len(), 4);
        assert_eq!(point.payload["namespace"], Value::from("shoe".to_string()));
        assert_eq!(
            point.payload["record_id"],
            Value::from("Cafe_menu_output.txt_chunk_3".to_string())
        );
        assert_eq!(
            point.payload["filename"],
            Value::from("Café menu_output.txt".to_string())
        );
        assert_eq!(point.payload["chunk_index"], Value::from(3_i64));
        assert!(point.vectors.is_some());
    }

    #[test]
    fn test_point_id_depends_on_namespace() {
        assert_ne!(
            QdrantBackend::point_id("shoe", "a.txt_chunk_0"),
            QdrantBackend::point_id("boot", "a.txt_chunk_0")
        );
    }
}
