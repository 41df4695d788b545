use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_INPUT_DIR: &str = "./source";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";
pub const DEFAULT_CHUNK_SIZE: usize = 7500;
pub const DEFAULT_MAX_CHUNKS: usize = 100;
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_EMBEDDING_DIMENSION: u64 = 1536;
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_INDEX: &str = "discorddemo";
pub const DEFAULT_NAMESPACE: &str = "shoe";

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";
pub const PINECONE_ENVIRONMENT_VAR: &str = "PINECONE_ENVIRONMENT";
pub const QDRANT_API_KEY_VAR: &str = "QDRANT_API_KEY";

const PROJECT_CONFIG_FILE: &str = "pdf2vec.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Project(PathBuf),
    Global(PathBuf),
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Project(p) => write!(f, "project ({})", p.display()),
            ConfigSource::Global(p) => write!(f, "global ({})", p.display()),
            ConfigSource::Default => write!(f, "defaults"),
        }
    }
}

impl Config {
    pub fn project_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pdf2vec").join("config.toml"))
    }

    /// Which config file `load` would read, without reading it.
    pub fn locate() -> ConfigSource {
        let project = Self::project_path();
        if project.exists() {
            ConfigSource::Project(project)
        } else if let Some(global) = Self::global_path()
            && global.exists()
        {
            ConfigSource::Global(global)
        } else {
            ConfigSource::Default
        }
    }

    /// Load the project config, falling back to the global config, then defaults.
    /// Secrets are read from the environment afterwards.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let source = Self::locate();
        let mut config = match source {
            ConfigSource::Project(ref path) | ConfigSource::Global(ref path) => {
                Self::from_file(path)?
            }
            ConfigSource::Default => Self::default(),
        };

        config.apply_env();
        Ok((config, source))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write a config file containing no secrets.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_secrets(|name| std::env::var(name).ok());
    }

    fn apply_secrets(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = read(OPENAI_API_KEY_VAR) {
            self.embedding.api_key = Some(key);
        }
        if let Some(key) = read(PINECONE_API_KEY_VAR) {
            self.vector_store.api_key = Some(key);
        }
        if let Some(env) = read(PINECONE_ENVIRONMENT_VAR) {
            self.vector_store.environment = Some(env);
        }
        if let Some(key) = read(QDRANT_API_KEY_VAR) {
            self.vector_store.qdrant_api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.vector_store.index.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vector_store.index must not be empty".to_string(),
            ));
        }
        if self.vector_store.namespace.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vector_store.namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the secrets the embed stage needs for the configured driver.
    pub fn require_secrets(&self) -> Result<(), ConfigError> {
        if self.embedding.api_key.is_none() {
            return Err(ConfigError::MissingSecret(OPENAI_API_KEY_VAR));
        }
        if self.vector_store.driver == VectorDriver::Pinecone {
            if self.vector_store.api_key.is_none() {
                return Err(ConfigError::MissingSecret(PINECONE_API_KEY_VAR));
            }
            if self.vector_store.environment.is_none() {
                return Err(ConfigError::MissingSecret(PINECONE_ENVIRONMENT_VAR));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Chunks past this count are dropped
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_max_chunks() -> usize {
    DEFAULT_MAX_CHUNKS
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            max_chunks: default_max_chunks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_dimension")]
    pub dimension: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_embedding_dimension() -> u64 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_timeout() -> u64 {
    120
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_embedding_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

/// Vector store backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorDriver {
    #[default]
    Pinecone,
    Qdrant,
}

impl std::fmt::Display for VectorDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorDriver::Pinecone => write!(f, "pinecone"),
            VectorDriver::Qdrant => write!(f, "qdrant"),
        }
    }
}

impl std::str::FromStr for VectorDriver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pinecone" => Ok(VectorDriver::Pinecone),
            "qdrant" => Ok(VectorDriver::Qdrant),
            _ => Err(format!("unknown vector store driver: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub driver: VectorDriver,

    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Pinecone data-plane host; resolved through the control plane when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default = "default_control_plane_url")]
    pub control_plane_url: String,

    /// Qdrant gRPC endpoint.
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(skip)]
    pub environment: Option<String>,

    #[serde(skip)]
    pub qdrant_api_key: Option<String>,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_control_plane_url() -> String {
    DEFAULT_CONTROL_PLANE_URL.to_string()
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            driver: VectorDriver::default(),
            index: default_index(),
            namespace: default_namespace(),
            host: None,
            control_plane_url: default_control_plane_url(),
            url: default_qdrant_url(),
            timeout_secs: default_timeout(),
            api_key: None,
            environment: None,
            qdrant_api_key: None,
        }
    }
}
