use serde::{Deserialize, Serialize};

use crate::utils::text::sanitize_vector_id;

/// Cleaned text for one source document, keyed by its output filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub name: String,
    pub text: String,
}

impl ExtractedText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A contiguous slice of a document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub filename: String,
    #[serde(rename = "chunkIndex")]
    pub chunk_index: usize,
}

/// The unit upserted into the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Record id for a chunk: the sanitized filename plus `_chunk_<index>`.
    /// Every upload goes through here so re-runs overwrite instead of duplicating.
    pub fn generate_id(filename: &str, chunk_index: usize) -> String {
        format!("{}_chunk_{}", sanitize_vector_id(filename), chunk_index)
    }

    pub fn new(filename: &str, chunk_index: usize, values: Vec<f32>) -> Self {
        Self {
            id: Self::generate_id(filename, chunk_index),
            values,
            metadata: RecordMetadata {
                filename: filename.to_string(),
                chunk_index,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_generate_id() {
        assert_eq!(
            VectorRecord::generate_id("annual report_output.txt", 3),
            "annual_report_output.txt_chunk_3"
        );
        let id = VectorRecord::generate_id("a.txt", 5);
        assert_eq!(id, VectorRecord::generate_id("a.txt", 5));
        assert_ne!(id, VectorRecord::generate_id("a.txt", 6));
    }

    #[test]
    fn test_record_metadata_keeps_original_filename() {
        let record = VectorRecord::new("Café menu.txt", 0, vec![0.5, 0.25]);
        assert_eq!(record.id, "Cafe_menu.txt_chunk_0");
        assert_eq!(record.metadata.filename, "Café menu.txt");
        assert_eq!(record.metadata.chunk_index, 0);
    }

    #[test]
    fn test_metadata_wire_names() {
        let record = VectorRecord::new("a.txt", 2, vec![1.0]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["filename"], "a.txt");
        assert_eq!(json["metadata"]["chunkIndex"], 2);
        assert_eq!(json["id"], "a.txt_chunk_2");
    }
}
