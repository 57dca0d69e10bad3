use super::types::Format;

const XML_DECLARATION: &str = "<?xml";
const HTML_MARKER: &str = "<html";

/// Classifies raw filing text. Never fails; unclassifiable input is
/// `Format::Unknown` and the pipeline rejects it.
pub fn detect_format(content: &str) -> Format {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with(XML_DECLARATION) {
        Format::Xbrl
    } else if contains_ignore_ascii_case(content, HTML_MARKER) {
        Format::Html
    } else {
        Format::Unknown
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
