//! Error types for the filing cleaner.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cleaner operations.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Errors that fail a single document. A batch reports them per document
/// and moves on.
#[derive(Error, Debug)]
pub enum CleanError {
    /// The content is neither an XML instance nor HTML.
    #[error("Unsupported document format")]
    UnsupportedFormat,

    /// Every markup parser backend rejected the input.
    #[error("All markup parsers failed: {}", .attempts.join("; "))]
    ParseFailure { attempts: Vec<String> },

    /// None of the configured encodings could decode the input bytes.
    #[error("Could not decode {path:?} with any of: {}", .encodings.join(", "))]
    DecodeFailure {
        path: PathBuf,
        encodings: Vec<String>,
    },

    /// The XBRL instance is not well-formed XML.
    #[error("XBRL parsing error: {0}")]
    XmlParse(String),

    /// The tag vocabulary file could not be loaded.
    #[error("Invalid tag vocabulary: {0}")]
    Vocabulary(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<roxmltree::Error> for CleanError {
    fn from(err: roxmltree::Error) -> Self {
        CleanError::XmlParse(err.to_string())
    }
}
