pub mod core;
pub mod edgar;
pub mod utils;

// Re-exports
pub use self::core::{CleanError, CleanerConfig};
pub use edgar::parsing::{
    clean_document, clean_html, detect_format, process_xbrl, CleaningResult, Cleaner, Document,
    Format,
};
