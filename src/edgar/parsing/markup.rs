//! Parser backends that turn filing markup into a `ParsedTree`.
//!
//! Backends are tried in order and the first tree that builds wins. The
//! strict XHTML reader handles well-formed inline XBRL documents and keeps
//! their prefixed tag names intact; legacy SGML/HTML filings fail it and
//! fall through to the HTML5 tree builder, which accepts anything.

use anyhow::{anyhow, Result};
use html_escape::decode_html_entities;
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::{ElementRef, Html};

use super::tree::{Element, Node, ParsedTree};
use super::types::Warning;
use crate::core::config::DEFAULT_MAX_DEPTH;
use crate::core::error::CleanError;

pub trait MarkupParser: Send + Sync {
    fn name(&self) -> &str;

    fn parse(&self, content: &str) -> Result<ParsedTree>;
}

/// Well-formed XML/XHTML only. Entities in text and attribute values are
/// decoded as HTML entities.
pub struct XhtmlParser {
    max_depth: usize,
}

impl XhtmlParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl MarkupParser for XhtmlParser {
    fn name(&self) -> &str {
        "xhtml"
    }

    fn parse(&self, content: &str) -> Result<ParsedTree> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().check_end_names = true;

        // The bottom of the stack collects top-level nodes.
        let mut stack: Vec<Element> = vec![Element::new("")];

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if stack.len() > self.max_depth {
                        return Err(anyhow!("nesting exceeds {} levels", self.max_depth));
                    }
                    stack.push(start_element(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let el = start_element(&e)?;
                    push_child(&mut stack, Node::Element(el));
                }
                Ok(Event::End(_)) => {
                    if stack.len() < 2 {
                        return Err(anyhow!("unexpected end tag"));
                    }
                    if let Some(el) = stack.pop() {
                        push_child(&mut stack, Node::Element(el));
                    }
                }
                Ok(Event::Text(e)) => {
                    let raw = e.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    push_child(&mut stack, Node::Text(decode_html_entities(&text).into_owned()));
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    push_child(&mut stack, Node::Text(String::from_utf8_lossy(&raw).into_owned()));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(anyhow!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    ))
                }
                _ => {}
            }
        }

        if stack.len() != 1 {
            let open = stack.last().map(|el| el.name.clone()).unwrap_or_default();
            return Err(anyhow!("unclosed element <{}> at end of input", open));
        }

        let top = stack.pop().map(|el| el.children).unwrap_or_default();
        if !top.iter().any(|node| matches!(node, Node::Element(_))) {
            return Err(anyhow!("no elements found"));
        }

        Ok(ParsedTree::new(top))
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value);
        el.attrs.push((key, decode_html_entities(&value).into_owned()));
    }
    Ok(el)
}

fn push_child(stack: &mut [Element], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

/// The HTML5 tree builder behind `scraper`. Never rejects markup on its own;
/// only the depth guard can fail it.
pub struct Html5everParser {
    max_depth: usize,
}

impl Html5everParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn convert(&self, element: ElementRef<'_>, depth: usize) -> Result<Element> {
        if depth > self.max_depth {
            return Err(anyhow!("nesting exceeds {} levels", self.max_depth));
        }

        let value = element.value();
        let mut el = Element::new(value.name());
        el.attrs = value
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        for child in element.children() {
            match child.value() {
                scraper::Node::Text(text) => el.children.push(Node::Text(String::from(&**text))),
                scraper::Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        el.children.push(Node::Element(self.convert(child_el, depth + 1)?));
                    }
                }
                _ => {}
            }
        }

        Ok(el)
    }
}

impl MarkupParser for Html5everParser {
    fn name(&self) -> &str {
        "html5ever"
    }

    fn parse(&self, content: &str) -> Result<ParsedTree> {
        let html = Html::parse_document(content);
        if !html.errors.is_empty() {
            debug!("html5ever recovered from {} markup errors", html.errors.len());
        }

        let mut top = Vec::new();
        for child in html.tree.root().children() {
            match child.value() {
                scraper::Node::Text(text) => top.push(Node::Text(String::from(&**text))),
                scraper::Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        top.push(Node::Element(self.convert(el, 2)?));
                    }
                }
                _ => {}
            }
        }

        Ok(ParsedTree::new(top))
    }
}

/// Ordered list of backends; the first to succeed provides the tree.
pub struct ParserChain {
    backends: Vec<Box<dyn MarkupParser>>,
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl ParserChain {
    pub fn new(backends: Vec<Box<dyn MarkupParser>>) -> Self {
        Self { backends }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(vec![
            Box::new(XhtmlParser::new(max_depth)),
            Box::new(Html5everParser::new(max_depth)),
        ])
    }

    #[cfg(test)]
    fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Each rejected backend is logged and recorded in `warnings`. Fails
    /// with `ParseFailure` when no backend produces a tree.
    pub fn parse(
        &self,
        content: &str,
        warnings: &mut Vec<Warning>,
    ) -> std::result::Result<ParsedTree, CleanError> {
        let mut attempts = Vec::new();

        for backend in &self.backends {
            match backend.parse(content) {
                Ok(tree) => {
                    debug!("Parsed markup with {} backend", backend.name());
                    return Ok(tree);
                }
                Err(e) => {
                    warn!("{} parser failed: {}", backend.name(), e);
                    warnings.push(Warning::ParserFallback {
                        backend: backend.name().to_string(),
                        reason: e.to_string(),
                    });
                    attempts.push(format!("{}: {}", backend.name(), e));
                }
            }
        }

        Err(CleanError::ParseFailure { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl MarkupParser for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn parse(&self, _content: &str) -> Result<ParsedTree> {
            Err(anyhow!("rejected"))
        }
    }

    fn names(tree: &ParsedTree) -> Vec<String> {
        tree.root.descendants().map(|e| e.lowercase_name()).collect()
    }

    #[test]
    fn test_xhtml_keeps_prefixed_names() {
        let xhtml = r#"<html xmlns:ix="http://www.xbrl.org/2013/inlineXBRL"><body><p>Revenue <ix:nonFraction contextRef="c1" name="us-gaap:Revenues">1,000</ix:nonFraction></p></body></html>"#;
        let tree = XhtmlParser::new(64).parse(xhtml).unwrap();
        let fact = tree
            .root
            .descendants()
            .find(|e| e.is("ix:nonfraction"))
            .unwrap();
        assert_eq!(fact.name, "ix:nonFraction");
        assert_eq!(fact.attr("contextref"), Some("c1"));
        assert_eq!(fact.rendered_text(), "1,000");
    }

    #[test]
    fn test_xhtml_decodes_entities() {
        let tree = XhtmlParser::new(64)
            .parse("<html><body><p>AT&amp;T&nbsp;Inc</p></body></html>")
            .unwrap();
        let text = tree.root.rendered_text();
        assert!(text.contains("AT&T\u{a0}Inc"));
    }

    #[test]
    fn test_xhtml_rejects_legacy_markup() {
        let legacy = "<HTML><BODY><P>Item 1<BR>Business</P></BODY></HTML>";
        assert!(XhtmlParser::new(64).parse(legacy).is_err());
        assert!(XhtmlParser::new(64).parse("<DOCUMENT><TYPE>10-K").is_err());
    }

    #[test]
    fn test_html5ever_accepts_legacy_markup() {
        let legacy = "<HTML><BODY><P>Item 1<BR>Business</P></BODY></HTML>";
        let tree = Html5everParser::new(64).parse(legacy).unwrap();
        assert_eq!(names(&tree), vec!["html", "head", "body", "p", "br"]);
    }

    #[test]
    fn test_depth_guard() {
        let deep = format!("<html><body>{}x{}</body></html>", "<div>".repeat(40), "</div>".repeat(40));
        assert!(XhtmlParser::new(10).parse(&deep).is_err());
        assert!(Html5everParser::new(10).parse(&deep).is_err());
        assert!(Html5everParser::new(64).parse(&deep).is_ok());
    }

    #[test]
    fn test_chain_falls_back() {
        let chain = ParserChain::new(vec![Box::new(Failing), Box::new(Html5everParser::new(64))]);
        let mut warnings = Vec::new();
        let tree = chain.parse("<html><body>ok</body></html>", &mut warnings).unwrap();
        assert!(tree.root.rendered_text().contains("ok"));
        assert_eq!(
            warnings,
            vec![Warning::ParserFallback {
                backend: "failing".to_string(),
                reason: "rejected".to_string()
            }]
        );
    }

    #[test]
    fn test_chain_all_backends_fail() {
        let chain = ParserChain::new(vec![Box::new(Failing), Box::new(Failing)]);
        let mut warnings = Vec::new();
        match chain.parse("<html></html>", &mut warnings) {
            Err(CleanError::ParseFailure { attempts }) => assert_eq!(attempts.len(), 2),
            other => panic!("expected ParseFailure, got {:?}", other.map(|_| ())),
        }
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(ParserChain::default().backend_names(), vec!["xhtml", "html5ever"]);
    }
}
