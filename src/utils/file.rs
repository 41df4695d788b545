//! File utilities shared by the extract and embed stages.

use std::path::Path;

use super::text::underscore_whitespace;

/// Suffix appended to the stem of every extracted text file.
pub const OUTPUT_SUFFIX: &str = "_output.txt";

/// Check a path's extension, ignoring ASCII case.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Derive the text filename for a PDF: `report 2024.PDF` becomes
/// `report_2024_output.txt`.
pub fn output_file_name(pdf_path: &Path) -> String {
    let base = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let stem = match base.len().checked_sub(4) {
        Some(split)
            if base.is_char_boundary(split) && base[split..].eq_ignore_ascii_case(".pdf") =>
        {
            &base[..split]
        }
        _ => base.as_str(),
    };

    underscore_whitespace(&format!("{stem}{OUTPUT_SUFFIX}"))
}
