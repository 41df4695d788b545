//! Text processing utilities.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Anything outside printable ASCII, Thai, CJK unified ideographs, Hangul
/// syllables and whitespace.
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x20-\x7E\x{0E00}-\x{0E7F}\x{4E00}-\x{9FFF}\x{AC00}-\x{D7A3}\s]+")
        .expect("valid character class")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Normalize extracted PDF text: drop characters outside the permitted
/// scripts, collapse whitespace (newlines included) to single spaces, trim.
pub fn clean_text(text: &str) -> String {
    let stripped = DISALLOWED.replace_all(text, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// Replace each whitespace run with a single underscore.
pub fn underscore_whitespace(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}

/// ASCII-only identifier derived from a filename.
///
/// NFKD-decomposes the name, drops combining diacritics and any remaining
/// non-ASCII character, then underscores whitespace runs. Distinct names can
/// map to the same identifier (`"a b"` and `"a_b"`).
pub fn sanitize_vector_id(file_name: &str) -> String {
    let ascii: String = file_name
        .nfkd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .filter(char::is_ascii)
        .collect();
    underscore_whitespace(&ascii)
}
