//! PDF discovery and text extraction.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::models::{ExtractReport, ExtractedText, ItemFailure};
use crate::utils::{clean_text, has_extension, output_file_name};

/// Turns raw PDF bytes into text.
pub trait PdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Decoder backed by the `pdf-extract` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractDecoder;

impl PdfDecoder for PdfExtractDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        // pdf-extract can panic on malformed documents
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractError::DecodeError(e.to_string())),
            Err(_) => Err(ExtractError::DecodeError(
                "decoder panicked on malformed input".to_string(),
            )),
        }
    }
}

/// Recursively collect `.pdf` files (any case) under `root`.
///
/// Entries inside each directory are visited in file-name order. Entries that
/// cannot be read are logged and skipped.
pub fn discover_pdfs(root: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    if !root.is_dir() {
        return Err(ExtractError::InputNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), "pdf") {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Extracts cleaned text from PDFs.
#[derive(Debug)]
pub struct PdfExtractor<D = PdfExtractDecoder> {
    decoder: D,
    progress: ProgressBar,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::with_decoder(PdfExtractDecoder)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PdfDecoder> PdfExtractor<D> {
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-file progress on `progress`; its length is set per batch.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Read, decode and clean a single PDF.
    pub fn extract_document(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let bytes = fs::read(path).map_err(|source| ExtractError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = self.decoder.decode(&bytes)?;
        let text = clean_text(&raw);
        if text.is_empty() {
            tracing::warn!(path = %path.display(), "no extractable text");
        }

        Ok(ExtractedText::new(output_file_name(path), text))
    }

    /// Extract every PDF under `root` in memory, without touching the output
    /// directory.
    pub fn extract_directory(
        &self,
        root: &Path,
    ) -> Result<(Vec<ExtractedText>, ExtractReport), ExtractError> {
        let mut documents = Vec::new();
        let report = self.for_each_document(root, |document| {
            documents.push(document);
            Ok(None)
        })?;
        Ok((documents, report))
    }

    /// Extract every PDF under `input` and write one text file per PDF into
    /// `output`, creating it if needed. Existing files are overwritten.
    pub fn run(&self, input: &Path, output: &Path) -> Result<ExtractReport, ExtractError> {
        if !input.is_dir() {
            return Err(ExtractError::InputNotFound(input.to_path_buf()));
        }

        fs::create_dir_all(output).map_err(|source| ExtractError::WriteError {
            path: output.to_path_buf(),
            source,
        })?;

        self.for_each_document(input, |document| {
            let target = output.join(&document.name);
            fs::write(&target, document.text.as_bytes()).map_err(|source| {
                ExtractError::WriteError {
                    path: target.clone(),
                    source,
                }
            })?;
            tracing::debug!(path = %target.display(), "saved text");
            Ok(Some(target))
        })
    }

    fn for_each_document<F>(&self, root: &Path, mut sink: F) -> Result<ExtractReport, ExtractError>
    where
        F: FnMut(ExtractedText) -> Result<Option<PathBuf>, ExtractError>,
    {
        let files = discover_pdfs(root)?;
        let mut report = ExtractReport {
            discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            tracing::info!(root = %root.display(), "no PDF files found");
            return Ok(report);
        }

        tracing::info!(count = files.len(), "found PDF files");
        self.progress.set_length(files.len() as u64);

        for path in &files {
            self.progress.inc(1);
            tracing::debug!(path = %path.display(), "processing");

            let result = self.extract_document(path).and_then(&mut sink);

            match result {
                Ok(Some(written)) => report.written.push(written),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to extract");
                    report.failures.push(ItemFailure {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::utils::testing::LogBuffer;

    /// Decodes test fixtures: "BROKEN" fails, anything else is returned as text.
    struct FixtureDecoder;

    impl PdfDecoder for FixtureDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<String, ExtractError> {
            if bytes == b"BROKEN" {
                return Err(ExtractError::DecodeError("invalid xref table".to_string()));
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    fn write(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_discover_is_recursive_and_filters() {
        let dir = TempDir::new().unwrap();
        let deep = write(dir.path(), "a/b/c/deep.pdf", b"x");
        let upper = write(dir.path(), "UPPER.PDF", b"x");
        write(dir.path(), "notes.txt", b"x");
        write(dir.path(), "a/b/image.png", b"x");
        write(dir.path(), "a/pdf", b"x");

        let mut found = discover_pdfs(dir.path()).unwrap();
        found.sort();
        let mut expected = vec![deep, upper];
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = discover_pdfs(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ExtractError::InputNotFound(_)));
    }

    #[test]
    fn test_extract_document_cleans_text() {
        let dir = TempDir::new().unwrap();
        let pdf = write(dir.path(), "My Report.pdf", b"  Line one\n\n\nLine \x07two  ");

        let doc = PdfExtractor::with_decoder(FixtureDecoder)
            .extract_document(&pdf)
            .unwrap();
        assert_eq!(doc.name, "My_Report_output.txt");
        assert_eq!(doc.text, "Line one Line two");
    }

    #[test]
    fn test_run_continues_after_empty_and_failed_documents() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let out_dir = output.path().join("nested").join("output");

        write(input.path(), "report.pdf", b"");
        write(input.path(), "broken.pdf", b"BROKEN");
        write(input.path(), "sub/next.pdf", b"next document");

        let report = PdfExtractor::with_decoder(FixtureDecoder)
            .run(input.path(), &out_dir)
            .unwrap();

        assert_eq!(report.discovered, 3);
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("broken.pdf"));

        assert_eq!(
            fs::read_to_string(out_dir.join("report_output.txt")).unwrap(),
            ""
        );
        assert_eq!(
            fs::read_to_string(out_dir.join("next_output.txt")).unwrap(),
            "next document"
        );
        assert!(!out_dir.join("broken_output.txt").exists());
    }

    #[test]
    fn test_run_overwrites_existing_output() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "doc.pdf", b"fresh");
        write(output.path(), "doc_output.txt", b"stale content");

        PdfExtractor::with_decoder(FixtureDecoder)
            .run(input.path(), output.path())
            .unwrap();

        assert_eq!(
            fs::read_to_string(output.path().join("doc_output.txt")).unwrap(),
            "fresh"
        );
    }

    #[test]
    fn test_run_missing_input_is_fatal() {
        let output = TempDir::new().unwrap();
        let err = PdfExtractor::with_decoder(FixtureDecoder)
            .run(&output.path().join("source"), output.path())
            .unwrap_err();
        assert!(matches!(err, ExtractError::InputNotFound(_)));
    }

    #[test]
    fn test_extract_directory_returns_documents() {
        let input = TempDir::new().unwrap();
        write(input.path(), "a.pdf", b"alpha");
        write(input.path(), "b.pdf", b"BROKEN");
        write(input.path(), "c.pdf", b"gamma");

        let (docs, report) = PdfExtractor::with_decoder(FixtureDecoder)
            .extract_directory(input.path())
            .unwrap();

        assert_eq!(
            docs,
            vec![
                ExtractedText::new("a_output.txt", "alpha"),
                ExtractedText::new("c_output.txt", "gamma"),
            ]
        );
        assert_eq!(report.discovered, 3);
        assert!(report.written.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_per_file_lines_stay_below_default_level() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "good.pdf", b"text");
        write(input.path(), "bad.pdf", b"BROKEN");

        let logs = LogBuffer::default();
        let _guard = logs.install("info");
        PdfExtractor::with_decoder(FixtureDecoder)
            .run(input.path(), output.path())
            .unwrap();

        let lines = logs.contents();
        assert!(lines.contains("found PDF files"));
        assert!(lines.contains("failed to extract"));
        assert!(!lines.contains("processing"));
        assert!(!lines.contains("saved text"));
    }

    #[test]
    fn test_per_file_lines_shown_at_debug() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "good.pdf", b"text");

        let logs = LogBuffer::default();
        let _guard = logs.install("debug");
        PdfExtractor::with_decoder(FixtureDecoder)
            .run(input.path(), output.path())
            .unwrap();

        let lines = logs.contents();
        assert!(lines.contains("processing"));
        assert!(lines.contains("saved text"));
    }

    #[test]
    fn test_real_decoder_rejects_garbage() {
        assert!(PdfExtractDecoder.decode(b"definitely not a pdf").is_err());
    }
}
