//! Utility modules.

pub mod file;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;

pub use file::{OUTPUT_SUFFIX, has_extension, output_file_name};
pub use text::{clean_text, sanitize_vector_id, underscore_whitespace};
