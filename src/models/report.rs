//! Batch outcomes reported by the extract and embed commands.

use std::path::PathBuf;

use serde::Serialize;

/// A file that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one extraction batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub discovered: usize,
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

/// Outcome of one embedding batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmbedReport {
    pub documents: usize,
    pub embedded: usize,
    pub chunks_uploaded: usize,
    pub files_truncated: usize,
    pub failures: Vec<ItemFailure>,
}
