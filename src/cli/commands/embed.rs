use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::output::{EmbedTarget, get_formatter, progress_bar};
use crate::error::EmbedError;
use crate::models::{Config, EmbedReport, OutputFormat, VectorDriver};
use crate::services::{EmbedPipeline, Embedder, OpenAiEmbeddingClient, TextChunker, create_backend};

/// Flags shared by `embed` and `run` that override the loaded config.
#[derive(Debug, Clone, Default, Args)]
pub struct EmbedOverrides {
    #[arg(long, help = "Maximum characters per chunk")]
    pub chunk_size: Option<usize>,

    #[arg(long, help = "Maximum chunks embedded per file")]
    pub max_chunks: Option<usize>,

    #[arg(long, help = "Vector index (or collection) name")]
    pub index: Option<String>,

    #[arg(long, short = 'n', help = "Namespace records are written into")]
    pub namespace: Option<String>,

    #[arg(long, help = "Vector store driver: pinecone or qdrant")]
    pub driver: Option<VectorDriver>,
}

impl EmbedOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(chunk_size) = self.chunk_size {
            config.chunking.chunk_size = chunk_size;
        }
        if let Some(max_chunks) = self.max_chunks {
            config.chunking.max_chunks = max_chunks;
        }
        if let Some(ref index) = self.index {
            config.vector_store.index = index.clone();
        }
        if let Some(ref namespace) = self.namespace {
            config.vector_store.namespace = namespace.clone();
        }
        if let Some(driver) = self.driver {
            config.vector_store.driver = driver;
        }
    }
}

#[derive(Debug, Args)]
pub struct EmbedArgs {
    #[arg(
        long,
        short = 'd',
        help = "Directory of .txt files to embed (defaults to extract.output_dir)"
    )]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: EmbedOverrides,
}

pub async fn handle_embed(
    args: EmbedArgs,
    mut config: Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    args.overrides.apply(&mut config);
    if let Some(dir) = args.dir {
        config.extract.output_dir = dir;
    }

    check_embed_config(&config)?;
    let (report, target) = run_embed(&config, format, verbose).await?;

    let formatter = get_formatter(format);
    println!("{}", formatter.format_embed_report(&report, &target));

    Ok(())
}

/// Settings and secrets the embed stage cannot start without.
pub(crate) fn check_embed_config(config: &Config) -> Result<()> {
    config.validate().context("invalid configuration")?;
    config.require_secrets()?;
    Ok(())
}

/// Embed every text file in `config.extract.output_dir`.
pub(crate) async fn run_embed(
    config: &Config,
    format: OutputFormat,
    verbose: bool,
) -> Result<(EmbedReport, EmbedTarget)> {
    let dir = &config.extract.output_dir;
    if !dir.is_dir() {
        return Err(EmbedError::DirectoryNotFound(dir.clone()).into());
    }

    let embedder = OpenAiEmbeddingClient::new(&config.embedding)
        .context("failed to create embedding client")?;
    tracing::debug!(
        endpoint = embedder.endpoint(),
        model = embedder.model(),
        "embedding client ready"
    );
    let store = create_backend(&config.vector_store, &config.embedding)
        .await
        .context("failed to connect to vector store")?;
    store
        .prepare()
        .await
        .context("failed to prepare vector index")?;

    let pb = progress_bar(format, verbose);
    let chunker = TextChunker::new(&config.chunking);
    let pipeline = EmbedPipeline::new(&embedder, store.as_ref(), chunker)
        .with_progress(pb.clone());
    let report = pipeline.process_directory(dir).await?;
    pb.finish_and_clear();

    let target = EmbedTarget {
        driver: config.vector_store.driver.to_string(),
        index: store.index().to_string(),
        namespace: store.namespace().to_string(),
    };

    Ok((report, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_NAMESPACE;

    fn config_with_secrets() -> Config {
        let mut config = Config::default();
        config.embedding.api_key = Some("sk-test".to_string());
        config.vector_store.api_key = Some("pc-test".to_string());
        config.vector_store.environment = Some("us-west1-gcp".to_string());
        config
    }

    #[test]
    fn test_overrides_apply_only_given_values() {
        let mut config = Config::default();
        let overrides = EmbedOverrides {
            chunk_size: Some(1000),
            index: Some("docs".to_string()),
            driver: Some(VectorDriver::Qdrant),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.max_chunks, 100);
        assert_eq!(config.vector_store.index, "docs");
        assert_eq!(config.vector_store.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.vector_store.driver, VectorDriver::Qdrant);
    }

    #[test]
    fn test_check_rejects_missing_openai_key() {
        let mut config = config_with_secrets();
        config.embedding.api_key = None;

        let err = check_embed_config(&config).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_check_rejects_zero_chunk_size() {
        let mut config = config_with_secrets();
        config.chunking.chunk_size = 0;
        assert!(check_embed_config(&config).is_err());
    }

    #[test]
    fn test_check_qdrant_needs_no_pinecone_secrets() {
        let mut config = config_with_secrets();
        config.vector_store.driver = VectorDriver::Qdrant;
        config.vector_store.api_key = None;
        config.vector_store.environment = None;
        assert!(check_embed_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_run_embed_missing_directory_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = config_with_secrets();
        config.extract.output_dir = dir.path().join("output");

        let err = run_embed(&config, OutputFormat::Json, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EmbedError>(),
            Some(EmbedError::DirectoryNotFound(_))
        ));
    }
}
