//! Input reader: decodes filing bytes with an ordered list of encodings.

use encoding_rs::Encoding;
use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::core::error::{CleanError, Result};
use crate::edgar::parsing::types::Document;

/// Pseudo-label for the encoding `chardet` detects in the input.
pub const AUTO_LABEL: &str = "auto";

/// Reads `path` and decodes it with the first encoding that accepts every
/// byte. A byte order mark wins over the configured list.
pub fn read_document(path: &Path, encodings: &[String]) -> Result<Document> {
    let bytes = fs::read(path)?;
    match decode_bytes(&bytes, encodings) {
        Some((text, encoding)) => {
            debug!("Decoded {} as {}", path.display(), encoding.name());
            Ok(Document::new(text))
        }
        None => Err(CleanError::DecodeFailure {
            path: path.to_path_buf(),
            encodings: encodings.to_vec(),
        }),
    }
}

/// Strict decoding: an encoding that would need a replacement character is
/// skipped rather than accepted.
pub fn decode_bytes(bytes: &[u8], encodings: &[String]) -> Option<(String, &'static Encoding)> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        if let Some(text) =
            encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        {
            return Some((text.into_owned(), encoding));
        }
    }

    for label in encodings {
        let Some(encoding) = resolve_label(label, bytes) else {
            continue;
        };
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return Some((text.into_owned(), encoding));
        }
        debug!("Input is not valid {}", encoding.name());
    }

    None
}

fn resolve_label(label: &str, bytes: &[u8]) -> Option<&'static Encoding> {
    if label.eq_ignore_ascii_case(AUTO_LABEL) {
        let (charset, confidence, _) = chardet::detect(bytes);
        debug!("chardet detected {} ({:.2})", charset, confidence);
        return Encoding::for_label(chardet::charset2encoding(&charset).as_bytes());
    }

    let encoding = Encoding::for_label(label.as_bytes());
    if encoding.is_none() {
        warn!("Skipping unknown encoding label {}", label);
    }
    encoding
}
