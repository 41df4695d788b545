//! Pinecone vector store backend over the REST data plane.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{VectorRecord, VectorStoreConfig};

const API_VERSION: &str = "2024-07";

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: [&'a VectorRecord; 1],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Pinecone vector store backend.
#[derive(Debug)]
pub struct PineconeBackend {
    client: Client,
    host: String,
    index: String,
    namespace: String,
}

impl PineconeBackend {
    /// Create a backend, asking the control plane for the index host unless
    /// one is configured.
    pub async fn connect(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        if let Some(env) = config.environment.as_deref() {
            tracing::debug!(environment = env, index = %config.index, "using Pinecone project");
        }

        let backend = match config.host.as_deref() {
            Some(host) => Self::with_host(config, host)?,
            None => {
                let client = build_client(config)?;
                let host = describe_index_host(&client, config).await?;
                Self::from_parts(client, &host, config)
            }
        };

        tracing::debug!(host = backend.host(), "resolved Pinecone index host");
        Ok(backend)
    }

    /// Create a backend for a known data-plane host.
    pub fn with_host(config: &VectorStoreConfig, host: &str) -> Result<Self, VectorStoreError> {
        let client = build_client(config)?;
        Ok(Self::from_parts(client, host, config))
    }

    fn from_parts(client: Client, host: &str, config: &VectorStoreConfig) -> Self {
        Self {
            client,
            host: normalize_host(host),
            index: config.index.clone(),
            namespace: config.namespace.clone(),
        }
    }

    /// Get the data-plane base URL.
    pub fn host(&self) -> &str {
        &self.host
    }
}

fn build_client(config: &VectorStoreConfig) -> Result<Client, VectorStoreError> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| VectorStoreError::ClientError("missing Pinecone API key".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        "api-key",
        HeaderValue::from_str(api_key).map_err(|e| VectorStoreError::ClientError(e.to_string()))?,
    );
    headers.insert("x-pinecone-api-version", HeaderValue::from_static(API_VERSION));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|e| VectorStoreError::ClientError(e.to_string()))
}

async fn describe_index_host(
    client: &Client,
    config: &VectorStoreConfig,
) -> Result<String, VectorStoreError> {
    let url = format!(
        "{}/indexes/{}",
        config.control_plane_url.trim_end_matches('/'),
        config.index
    );

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(VectorStoreError::IndexError(format!(
            "describe index '{}' failed with status {}: {}",
            config.index, status, body
        )));
    }

    let described: DescribeIndexResponse = response
        .json()
        .await
        .map_err(|e| VectorStoreError::IndexError(e.to_string()))?;

    Ok(described.host)
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[async_trait]
impl VectorStore for PineconeBackend {
    async fn upsert(&self, record: VectorRecord) -> Result<(), VectorStoreError> {
        let url = format!("{}/vectors/upsert", self.host);
        let request = UpsertRequest {
            vectors: [&record],
            namespace: &self.namespace,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::UpsertError(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    fn index(&self) -> &str {
        &self.index
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
