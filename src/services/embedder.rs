//! Chunk, embed and upload text documents, one request at a time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::error::EmbedError;
use crate::models::{EmbedReport, ExtractedText, ItemFailure, VectorRecord};
use crate::services::{Embedder, TextChunker, VectorStore};
use crate::utils::has_extension;

/// List the `.txt` files (any case) directly inside `dir`, sorted by name.
pub fn discover_text_files(dir: &Path) -> Result<Vec<PathBuf>, EmbedError> {
    if !dir.is_dir() {
        return Err(EmbedError::DirectoryNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| EmbedError::ReadError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| readable_entry(dir, entry))
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, "txt"))
        .collect();
    files.sort();

    Ok(files)
}

fn readable_entry<T>(dir: &Path, entry: io::Result<T>) -> Option<T> {
    match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
            None
        }
    }
}

/// Read a text file into an [`ExtractedText`] named after the file.
pub fn read_text_file(path: &Path) -> Result<ExtractedText, EmbedError> {
    let text = fs::read_to_string(path).map_err(|source| EmbedError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ExtractedText::new(name, text))
}

/// Sequential embed-and-upload pipeline over explicit clients.
pub struct EmbedPipeline<'a> {
    embedder: &'a dyn Embedder,
    store: &'a dyn VectorStore,
    chunker: TextChunker,
    progress: ProgressBar,
}

impl<'a> EmbedPipeline<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        store: &'a dyn VectorStore,
        chunker: TextChunker,
    ) -> Self {
        Self {
            embedder,
            store,
            chunker,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-document progress on `progress`; its length is set per batch.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Embed and upload every chunk of one document, in order.
    ///
    /// Stops at the first failing chunk. Chunks uploaded before the failure
    /// stay in the store.
    pub async fn process_document(&self, document: &ExtractedText) -> Result<usize, EmbedError> {
        let chunks = self.chunker.chunk(&document.text);
        let total = chunks.len();

        let truncated = self.chunker.truncated_chars(&document.text);
        if truncated > 0 {
            tracing::warn!(
                file = %document.name,
                dropped_chars = truncated,
                max_chunks = self.chunker.max_chunks(),
                "text exceeds chunk limit, remainder dropped"
            );
        }

        for chunk in chunks {
            let index = chunk.index;
            let values = self
                .embedder
                .embed(&chunk.text)
                .await
                .map_err(|source| EmbedError::Embedding { index, source })?;

            let record = VectorRecord::new(&document.name, index, values);
            let id = record.id.clone();
            self.store
                .upsert(record)
                .await
                .map_err(|source| EmbedError::Upload { index, source })?;

            tracing::debug!(
                file = %document.name,
                id = %id,
                "uploaded chunk {}/{}",
                index + 1,
                total
            );
        }

        Ok(total)
    }

    /// Process already-loaded documents; a failing document is logged and
    /// skipped.
    pub async fn process_documents<I>(&self, documents: I) -> EmbedReport
    where
        I: IntoIterator<Item = ExtractedText>,
    {
        let documents: Vec<ExtractedText> = documents.into_iter().collect();
        let mut report = EmbedReport {
            documents: documents.len(),
            ..Default::default()
        };
        self.progress.set_length(documents.len() as u64);

        for document in &documents {
            self.progress.inc(1);
            let result = self.process_document(document).await;
            self.record(&mut report, Path::new(&document.name), document, result);
        }

        report
    }

    /// Process every `.txt` file in `dir`. Only a missing directory is fatal.
    pub async fn process_directory(&self, dir: &Path) -> Result<EmbedReport, EmbedError> {
        let files = discover_text_files(dir)?;
        let mut report = EmbedReport {
            documents: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::info!(dir = %dir.display(), "no text files found");
            return Ok(report);
        }

        tracing::info!(
            count = files.len(),
            index = self.store.index(),
            namespace = self.store.namespace(),
            model = self.embedder.model(),
            "embedding text files"
        );
        self.progress.set_length(files.len() as u64);

        for path in &files {
            self.progress.inc(1);
            tracing::debug!(path = %path.display(), "processing");

            let document = match read_text_file(path) {
                Ok(document) => document,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to process file");
                    report.failures.push(ItemFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let result = self.process_document(&document).await;
            self.record(&mut report, path, &document, result);
        }

        Ok(report)
    }

    fn record(
        &self,
        report: &mut EmbedReport,
        path: &Path,
        document: &ExtractedText,
        result: Result<usize, EmbedError>,
    ) {
        match result {
            Ok(uploaded) => {
                report.embedded += 1;
                report.chunks_uploaded += uploaded;
                if self.chunker.truncated_chars(&document.text) > 0 {
                    report.files_truncated += 1;
                }
            }
            Err(e) => {
                report.chunks_uploaded += e.chunk_index().unwrap_or(0);
                tracing::error!(path = %path.display(), error = %e, "failed to process file");
                report.failures.push(ItemFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }
}
