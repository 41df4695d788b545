//! Error types for the PDF embedding pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("missing required environment variable: {0}")]
    MissingSecret(&'static str),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Errors raised while turning a single PDF into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input directory not found: {0}")]
    InputNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF decode error: {0}")]
    DecodeError(String),
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to build embedding client: {0}")]
    ClientError(String),

    #[error("embedding server error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding timeout")]
    Timeout,
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("index error: {0}")]
    IndexError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("vector store client error: {0}")]
    ClientError(String),
}

/// Errors raised while embedding and uploading a single text document.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chunk {index}: {source}")]
    Embedding {
        index: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("chunk {index}: {source}")]
    Upload {
        index: usize,
        #[source]
        source: VectorStoreError,
    },
}

impl EmbedError {
    /// Index of the chunk that failed, which is also the number of chunks of
    /// the document already uploaded.
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            EmbedError::Embedding { index, .. } | EmbedError::Upload { index, .. } => Some(*index),
            EmbedError::DirectoryNotFound(_) | EmbedError::ReadError { .. } => None,
        }
    }
}
