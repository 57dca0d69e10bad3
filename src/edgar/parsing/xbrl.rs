//! Fact extraction for XBRL instance documents.

use itertools::Itertools;
use log::{debug, warn};
use roxmltree::{Document, Node, ParsingOptions};

use super::types::{
    Dimension, Warning, XbrlContext, XbrlContexts, XbrlFact, XbrlResult, XbrlUnits,
};
use crate::core::error::Result;

const INLINE_XBRL_NS: &str = "http://www.xbrl.org/2013/inlineXBRL";

/// Parses `content` as XML and extracts its facts.
pub fn parse_xbrl(content: &str) -> Result<XbrlResult> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(content, options)?;
    Ok(process_xbrl(&doc))
}

/// Extracts contexts, units and facts from a parsed instance.
///
/// Facts are visited depth-first in document order. A fact is kept only when
/// its `contextRef` resolves; an unknown `unitRef` leaves the unit empty and
/// is reported as a warning.
pub fn process_xbrl(doc: &Document) -> XbrlResult {
    let root = doc.root_element();
    let contexts = extract_contexts(root);
    let units = extract_units(root);
    debug!("Found {} contexts and {} units", contexts.len(), units.len());

    let mut facts = Vec::new();
    let mut warnings = Vec::new();

    for node in root.descendants().filter(|n| n.is_element()) {
        let Some(context_ref) = node.attribute("contextRef") else {
            continue;
        };
        let (prefix, tag) = fact_name(node);

        let Some(context) = contexts.get(context_ref) else {
            warn!("Skipping fact {}: unknown context {}", tag, context_ref);
            warnings.push(Warning::UnresolvedContext {
                tag,
                context_ref: context_ref.to_string(),
            });
            continue;
        };

        let unit = match node.attribute("unitRef") {
            Some(unit_ref) => match units.get(unit_ref) {
                Some(measure) => measure.clone(),
                None => {
                    warnings.push(Warning::UnresolvedUnit {
                        tag: tag.clone(),
                        unit_ref: unit_ref.to_string(),
                    });
                    None
                }
            },
            None => None,
        };

        facts.push(XbrlFact {
            tag,
            prefix,
            value: element_text(node),
            context: context.clone(),
            unit,
            decimals: node.attribute("decimals").map(String::from),
        });
    }

    let text = facts.iter().map(XbrlFact::to_text).join(" ");

    debug!("Extracted {} facts", facts.len());
    XbrlResult {
        text,
        facts,
        warnings,
    }
}

/// Every `context` element keyed by its `id`.
pub fn extract_contexts(root: Node) -> XbrlContexts {
    let mut contexts = XbrlContexts::new();

    for ctx in root.descendants().filter(|n| n.has_tag_name("context")) {
        let Some(id) = ctx.attribute("id") else {
            continue;
        };

        let mut context = XbrlContext {
            start_date: child_text(ctx, "startDate"),
            end_date: child_text(ctx, "endDate"),
            instant: child_text(ctx, "instant"),
            dimensions: Vec::new(),
        };

        for member in ctx.descendants().filter(|n| {
            n.has_tag_name("explicitMember") || n.has_tag_name("typedMember")
        }) {
            if let Some(axis) = member.attribute("dimension") {
                context.dimensions.push(Dimension {
                    axis: axis.to_string(),
                    member: element_text(member).unwrap_or_default(),
                });
            }
        }

        contexts.insert(id.to_string(), context);
    }

    contexts
}

/// Every `unit` element keyed by its `id`. Multiplied measures are joined
/// with `*`; a divide unit renders as `numerator/denominator`.
pub fn extract_units(root: Node) -> XbrlUnits {
    let mut units = XbrlUnits::new();

    for unit in root.descendants().filter(|n| n.has_tag_name("unit")) {
        let Some(id) = unit.attribute("id") else {
            continue;
        };

        let measure = match unit.descendants().find(|n| n.has_tag_name("divide")) {
            Some(divide) => {
                let numerator = measures_under(divide, "unitNumerator");
                let denominator = measures_under(divide, "unitDenominator");
                match (numerator, denominator) {
                    (Some(num), Some(den)) => Some(format!("{}/{}", num, den)),
                    (num, None) => num,
                    (None, Some(den)) => Some(format!("1/{}", den)),
                }
            }
            None => join_measures(unit),
        };

        units.insert(id.to_string(), measure);
    }

    units
}

fn measures_under(divide: Node, part: &str) -> Option<String> {
    divide
        .children()
        .find(|n| n.has_tag_name(part))
        .and_then(join_measures)
}

fn join_measures(node: Node) -> Option<String> {
    let measures: Vec<String> = node
        .descendants()
        .filter(|n| n.has_tag_name("measure"))
        .filter_map(element_text)
        .collect();
    if measures.is_empty() {
        None
    } else {
        Some(measures.join("*"))
    }
}

/// Namespace prefix and local name of a fact. Inline XBRL facts carry the
/// concept in their `name` attribute.
fn fact_name(node: Node) -> (Option<String>, String) {
    let tag_name = node.tag_name();
    if tag_name.namespace() == Some(INLINE_XBRL_NS) {
        if let Some(name) = node.attribute("name") {
            return match name.split_once(':') {
                Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
                None => (None, name.to_string()),
            };
        }
    }

    let prefix = tag_name
        .namespace()
        .and_then(|ns| node.lookup_prefix(ns))
        .filter(|p| !p.is_empty())
        .map(String::from);
    (prefix, tag_name.name().to_string())
}

fn child_text(node: Node, local: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.has_tag_name(local))
        .and_then(element_text)
}

/// All descendant text, trimmed; `None` when nothing but whitespace remains.
fn element_text(node: Node) -> Option<String> {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
