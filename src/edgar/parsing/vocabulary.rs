//! Static tag vocabulary for SEC filings.
//!
//! The lists are configuration data: the built-in default mirrors the SEC
//! EDGAR tag dictionary, and a JSON file with the same field names can
//! replace it. All lookups are lowercase.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::error::{CleanError, Result};

const HEADER_TAGS: &[&str] = &[
    "SEC-HEADER",
    "ACCEPTANCE-DATETIME",
    "ACCESSION-NUMBER",
    "FILER",
    "COMPANY-DATA",
    "FILING-VALUES",
    "PUBLIC-DOCUMENT-COUNT",
    "FILED-DATE",
    "PERIOD",
    "SROS",
    "SUBMISSION-TYPE",
];

const DOCUMENT_TAGS: &[&str] = &["DOCUMENT", "TYPE", "SEQUENCE", "FILENAME", "DESCRIPTION", "TEXT"];

const XBRL_TAGS: &[&str] = &[
    "ix:continuation",
    "ix:denominator",
    "ix:exclude",
    "ix:footnote",
    "ix:fraction",
    "ix:header",
    "ix:hidden",
    "ix:nonFraction",
    "ix:nonNumeric",
    "ix:numerator",
    "ix:references",
    "ix:relationship",
    "ix:resources",
    "ix:tuple",
    "link:schemaRef",
    "xbrli:context",
    "xbrli:measure",
    "xbrli:unit",
];

const FACT_TAGS: &[&str] = &["ix:nonNumeric", "ix:nonFraction", "ix:fraction"];

const STYLE_TAGS: &[&str] = &["FONT", "CENTER", "B", "I", "U", "SUB", "SUP", "STRIKE", "SMALL", "BIG"];

const TABLE_TAGS: &[&str] = &[
    "TABLE", "TR", "TD", "TH", "THEAD", "TBODY", "TFOOT", "CAPTION", "COL", "COLGROUP",
];

const LAYOUT_TAGS: &[&str] = &[
    "DIV", "SPAN", "P", "BR", "HR", "PRE", "BLOCKQUOTE", "UL", "OL", "LI", "DL", "DT", "DD",
];

const CONTENT_TAGS: &[&str] = &[
    "RISK-FACTORS",
    "BUSINESS",
    "PROPERTIES",
    "LEGAL-PROCEEDINGS",
    "MINE-SAFETY-DISCLOSURES",
    "MARKET",
    "MANAGEMENT-DISCUSSION",
    "FINANCIAL-STATEMENTS",
    "CHANGES-DISAGREEMENTS",
    "CONTROLS-PROCEDURES",
    "OTHER-INFORMATION",
    "DIRECTORS-OFFICERS",
    "EXECUTIVE-COMPENSATION",
    "SECURITY-OWNERSHIP",
    "RELATIONSHIPS-TRANSACTIONS",
    "PRINCIPAL-ACCOUNTANT-FEES",
    "EXHIBITS",
];

/// Elements whose content never reaches the text stream.
const META_TAGS: &[&str] = &["HEAD", "META", "TITLE", "LINK", "STYLE", "SCRIPT"];

pub static DEFAULT_VOCABULARY: Lazy<TagVocabulary> = Lazy::new(TagVocabulary::builtin);

/// The tag dictionary used by the cleaner.
///
/// Only `fact_tags`, `table_tags` and `meta_tags` drive cleaning. The other
/// lists are carried so that a vocabulary file keeps the full shape of the
/// SEC tag dictionary and round-trips through `--vocabulary` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagVocabulary {
    #[serde(default)]
    pub header_tags: Vec<String>,
    #[serde(default)]
    pub document_tags: Vec<String>,
    #[serde(default)]
    pub xbrl_tags: Vec<String>,
    pub fact_tags: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    pub table_tags: Vec<String>,
    #[serde(default)]
    pub layout_tags: Vec<String>,
    #[serde(default)]
    pub content_tags: Vec<String>,
    pub meta_tags: Vec<String>,

    #[serde(skip)]
    fact_set: HashSet<String>,
    #[serde(skip)]
    table_set: HashSet<String>,
    #[serde(skip)]
    meta_set: HashSet<String>,
}

fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn lowercase_set(tags: &[String]) -> HashSet<String> {
    tags.iter().map(|t| t.to_ascii_lowercase()).collect()
}

impl Default for TagVocabulary {
    fn default() -> Self {
        DEFAULT_VOCABULARY.clone()
    }
}

impl TagVocabulary {
    fn builtin() -> Self {
        Self {
            header_tags: owned(HEADER_TAGS),
            document_tags: owned(DOCUMENT_TAGS),
            xbrl_tags: owned(XBRL_TAGS),
            fact_tags: owned(FACT_TAGS),
            style_tags: owned(STYLE_TAGS),
            table_tags: owned(TABLE_TAGS),
            layout_tags: owned(LAYOUT_TAGS),
            content_tags: owned(CONTENT_TAGS),
            meta_tags: owned(META_TAGS),
            fact_set: HashSet::new(),
            table_set: HashSet::new(),
            meta_set: HashSet::new(),
        }
        .indexed()
    }

    fn indexed(mut self) -> Self {
        self.fact_set = lowercase_set(&self.fact_tags);
        self.table_set = lowercase_set(&self.table_tags);
        self.meta_set = lowercase_set(&self.meta_tags);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let vocabulary: TagVocabulary =
            serde_json::from_str(json).map_err(|e| CleanError::Vocabulary(e.to_string()))?;
        if vocabulary.fact_tags.is_empty() {
            return Err(CleanError::Vocabulary("fact_tags must not be empty".to_string()));
        }
        Ok(vocabulary.indexed())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Inline XBRL fact markers (nonNumeric, nonFraction, fraction).
    pub fn is_fact_tag(&self, name: &str) -> bool {
        self.fact_set.contains(&name.to_ascii_lowercase())
    }

    /// Structural table vocabulary (table, rows, cells, sections).
    pub fn is_table_tag(&self, name: &str) -> bool {
        self.table_set.contains(&name.to_ascii_lowercase())
    }

    /// Non-content elements removed wholesale by the structural stripper.
    pub fn is_meta_tag(&self, name: &str) -> bool {
        self.meta_set.contains(&name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_tags_case_insensitive() {
        let vocab = TagVocabulary::default();
        assert!(vocab.is_fact_tag("ix:nonFraction"));
        assert!(vocab.is_fact_tag("IX:NONNUMERIC"));
        assert!(vocab.is_fact_tag("ix:fraction"));
        assert!(!vocab.is_fact_tag("ix:header"));
        assert!(!vocab.is_fact_tag("td"));
        assert!(vocab.is_table_tag("thead"));
    }

    #[test]
    fn test_meta_tags() {
        let vocab = TagVocabulary::default();
        for tag in ["script", "STYLE", "meta", "link", "head", "title"] {
            assert!(vocab.is_meta_tag(tag), "{} should be a meta tag", tag);
        }
        assert!(!vocab.is_meta_tag("body"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "fact_tags": ["ix:nonFraction"],
            "table_tags": ["table"],
            "meta_tags": ["script", "noscript"]
        }"#;
        let vocab = TagVocabulary::from_json(json).unwrap();
        assert!(vocab.is_fact_tag("IX:NONFRACTION"));
        assert!(!vocab.is_fact_tag("ix:nonNumeric"));
        assert!(vocab.is_meta_tag("noscript"));
        assert!(vocab.is_table_tag("TABLE"));
        assert!(!vocab.is_table_tag("tr"));
        assert!(vocab.header_tags.is_empty());
    }

    #[test]
    fn test_dictionary_lists_survive_reload() {
        let vocab = TagVocabulary::default();
        let json = serde_json::to_string(&vocab).unwrap();
        let reloaded = TagVocabulary::from_json(&json).unwrap();
        assert_eq!(reloaded, vocab);
        assert!(reloaded.header_tags.iter().any(|t| t == "ACCESSION-NUMBER"));
        assert!(reloaded.document_tags.iter().any(|t| t == "FILENAME"));
    }

    #[test]
    fn test_from_json_rejects_missing_fact_tags() {
        let json = r#"{"fact_tags": [], "table_tags": [], "meta_tags": []}"#;
        assert!(matches!(
            TagVocabulary::from_json(json),
            Err(CleanError::Vocabulary(_))
        ));
        assert!(TagVocabulary::from_json("{").is_err());
    }
}
