use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum::{AsRefStr, Display};

use super::format::detect_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Html,
    Xbrl,
    Unknown,
}

/// Decoded filing text together with its detected format.
#[derive(Debug, Clone)]
pub struct Document {
    content: String,
    format: Format,
}

impl Document {
    pub fn new(content: String) -> Self {
        let format = detect_format(&content);
        Self { content, format }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

pub type Row = Vec<String>;

/// Rows of a reconstructed table, header rows first and footer rows last.
/// Every row holds at least one non-empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells joined by tabs, rows joined by newlines.
    pub fn to_text(&self) -> String {
        self.rows.iter().map(|row| row.join("\t")).join("\n")
    }
}

/// Tables rendered one after another, separated by a blank line.
pub fn render_tables(tables: &[Table]) -> String {
    tables.iter().map(Table::to_text).join("\n\n")
}

pub const TABLES_SEPARATOR: &str = "\n\n--- Extracted Tables ---\n\n";

/// Non-fatal events recorded while cleaning a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A markup parser backend rejected the input and the next one was tried.
    ParserFallback { backend: String, reason: String },
    /// A fact referenced a unit id with no matching unit element.
    UnresolvedUnit { tag: String, unit_ref: String },
    /// A fact was skipped because its context id did not resolve.
    UnresolvedContext { tag: String, context_ref: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ParserFallback { backend, reason } => {
                write!(f, "parser {} failed: {}", backend, reason)
            }
            Warning::UnresolvedUnit { tag, unit_ref } => {
                write!(f, "fact {} references unknown unit {}", tag, unit_ref)
            }
            Warning::UnresolvedContext { tag, context_ref } => {
                write!(f, "fact {} references unknown context {}", tag, context_ref)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningResult {
    pub format: Format,
    pub cleaned_text: String,
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl CleaningResult {
    pub fn tables_text(&self) -> String {
        render_tables(&self.tables)
    }

    /// The text layout downstream consumers expect: the cleaned text, then
    /// the tables block only when at least one table was captured.
    pub fn render(&self) -> String {
        if self.tables.is_empty() {
            self.cleaned_text.clone()
        } else {
            format!("{}{}{}", self.cleaned_text, TABLES_SEPARATOR, self.tables_text())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub axis: String,
    pub member: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XbrlContext {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub instant: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
}

/// Context id -> context.
pub type XbrlContexts = HashMap<String, XbrlContext>;

/// Unit id -> measure, `None` when the unit carries no measure text.
pub type XbrlUnits = HashMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XbrlFact {
    pub tag: String,
    pub prefix: Option<String>,
    pub value: Option<String>,
    pub context: XbrlContext,
    pub unit: Option<String>,
    pub decimals: Option<String>,
}

impl XbrlFact {
    /// `"<tag>: <value>"`, the plain-text form of a fact.
    pub fn to_text(&self) -> String {
        format!("{}: {}", self.tag, self.value.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XbrlResult {
    pub text: String,
    pub facts: Vec<XbrlFact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl XbrlResult {
    /// Facts become a single table (tag, value, start, end, unit) so the
    /// XBRL path yields the same shape as the HTML path.
    pub fn into_cleaning_result(self) -> CleaningResult {
        let rows: Vec<Row> = self
            .facts
            .iter()
            .map(|fact| {
                let start = fact
                    .context
                    .start_date
                    .as_deref()
                    .or(fact.context.instant.as_deref());
                vec![
                    fact.tag.clone(),
                    fact.value.clone().unwrap_or_default(),
                    start.unwrap_or("").to_string(),
                    fact.context.end_date.clone().unwrap_or_default(),
                    fact.unit.clone().unwrap_or_default(),
                ]
            })
            .collect();

        let tables = if rows.is_empty() {
            Vec::new()
        } else {
            vec![Table { rows }]
        };

        CleaningResult {
            format: Format::Xbrl,
            cleaned_text: self.text,
            tables,
            warnings: self.warnings,
        }
    }
}
