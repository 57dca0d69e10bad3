//! Format dispatch and the HTML cleaning path.

use log::{debug, info};

use super::format::detect_format;
use super::markup::ParserChain;
use super::strip::StructuralStripper;
use super::tables::TableExtractor;
use super::text::clean_text;
use super::types::{CleaningResult, Document, Format};
use super::vocabulary::TagVocabulary;
use super::xbrl::parse_xbrl;
use crate::core::config::CleanerConfig;
use crate::core::error::{CleanError, Result};

/// Holds the parser backends and tag vocabulary shared by every document
/// it cleans. Each call owns its own tree, so one cleaner can serve many
/// threads at once.
#[derive(Default)]
pub struct Cleaner {
    chain: ParserChain,
    vocab: TagVocabulary,
}

impl Cleaner {
    pub fn new(chain: ParserChain, vocab: TagVocabulary) -> Self {
        Self { chain, vocab }
    }

    /// Builds the parser chain with the configured depth limit and loads the
    /// vocabulary file when one is configured.
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        let vocab = match &config.vocabulary_path {
            Some(path) => {
                info!("Loading tag vocabulary from {}", path.display());
                TagVocabulary::load(path)?
            }
            None => TagVocabulary::default(),
        };
        Ok(Self::new(ParserChain::with_max_depth(config.max_depth), vocab))
    }

    /// Routes on the detected format. There is no retry across paths: an
    /// XML-prefixed document that fails to parse is an error, not HTML.
    pub fn clean(&self, document: &Document) -> Result<CleaningResult> {
        match document.format() {
            Format::Html => self.clean_html(document.content()),
            Format::Xbrl => Ok(parse_xbrl(document.content())?.into_cleaning_result()),
            Format::Unknown => Err(CleanError::UnsupportedFormat),
        }
    }

    pub fn clean_str(&self, content: &str) -> Result<CleaningResult> {
        match detect_format(content) {
            Format::Html => self.clean_html(content),
            Format::Xbrl => Ok(parse_xbrl(content)?.into_cleaning_result()),
            Format::Unknown => Err(CleanError::UnsupportedFormat),
        }
    }

    /// Parse, capture tables, strip structure, filter noise.
    pub fn clean_html(&self, content: &str) -> Result<CleaningResult> {
        let mut warnings = Vec::new();
        let tree = self.chain.parse(content, &mut warnings)?;

        // Tables first: flattening destroys row and cell boundaries
        let tables = TableExtractor::new(&self.vocab).extract(&tree);
        let flat = StructuralStripper::new(&self.vocab).to_text(tree);
        let cleaned_text = clean_text(&flat);

        debug!(
            "Cleaned {} bytes of markup into {} bytes of text and {} tables",
            content.len(),
            cleaned_text.len(),
            tables.len()
        );

        Ok(CleaningResult {
            format: Format::Html,
            cleaned_text,
            tables,
            warnings,
        })
    }
}

/// Cleans HTML content with the default backends and vocabulary, returning
/// the cleaned text and the rendered tables.
pub fn clean_html(content: &str) -> Result<(String, String)> {
    let result = Cleaner::default().clean_html(content)?;
    let tables_text = result.tables_text();
    Ok((result.cleaned_text, tables_text))
}

/// Cleans a classified document with the default backends and vocabulary.
pub fn clean_document(document: &Document) -> Result<CleaningResult> {
    Cleaner::default().clean(document)
}
