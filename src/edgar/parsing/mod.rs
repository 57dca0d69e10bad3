pub mod format;
pub mod markup;
pub mod pipeline;
pub mod strip;
pub mod tables;
pub mod text;
pub mod tree;
pub mod types;
pub mod vocabulary;
pub mod xbrl;

#[cfg(test)]
mod tests;

pub use format::detect_format;
pub use markup::{Html5everParser, MarkupParser, ParserChain, XhtmlParser};
pub use pipeline::{clean_document, clean_html, Cleaner};
pub use text::clean_text;
pub use types::{
    CleaningResult, Document, Format, Table, Warning, XbrlContext, XbrlFact, XbrlResult,
};
pub use vocabulary::TagVocabulary;
pub use xbrl::{parse_xbrl, process_xbrl};
