//! Removes non-content elements and unwraps everything else into a flat
//! text stream. Must only run after tables have been captured.

use super::tree::{Element, Node, ParsedTree};
use super::vocabulary::TagVocabulary;

const BOUNDARY: &str = " ";

pub struct StructuralStripper<'v> {
    vocab: &'v TagVocabulary,
}

impl<'v> StructuralStripper<'v> {
    pub fn new(vocab: &'v TagVocabulary) -> Self {
        Self { vocab }
    }

    /// Deletes script, style, meta, link and head elements together with
    /// their content.
    pub fn remove_non_content(&self, tree: &mut ParsedTree) {
        self.prune(&mut tree.root);
    }

    fn prune(&self, el: &mut Element) {
        el.children.retain(|child| match child {
            Node::Element(inner) => !self.vocab.is_meta_tag(&inner.name),
            Node::Text(_) => true,
        });
        for child in el.children.iter_mut() {
            if let Node::Element(inner) = child {
                self.prune(inner);
            }
        }
    }

    /// Replaces every element below the root by its children, leaving the
    /// root with text nodes only. Each former element boundary becomes a
    /// single space.
    pub fn unwrap_all(&self, tree: ParsedTree) -> ParsedTree {
        let mut flat = Vec::new();
        unwrap_into(tree.root, &mut flat);
        ParsedTree::new(flat)
    }

    pub fn to_text(&self, mut tree: ParsedTree) -> String {
        self.remove_non_content(&mut tree);
        let flat = self.unwrap_all(tree);
        flat.root
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

fn unwrap_into(el: Element, out: &mut Vec<Node>) {
    for child in el.children {
        match child {
            Node::Text(text) => out.push(Node::Text(text)),
            Node::Element(inner) => {
                out.push(Node::Text(BOUNDARY.to_string()));
                unwrap_into(inner, out);
                out.push(Node::Text(BOUNDARY.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::parsing::markup::{Html5everParser, MarkupParser};
    use crate::edgar::parsing::tree::builders::{el, text};

    fn collapse(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_non_content_removed() {
        let html = "<html><head><title>10-K</title><style>p { color: red }</style></head>\
                    <body><script>var x = 1;</script><p>Annual report</p>\
                    <link rel=\"stylesheet\" href=\"a.css\"><meta name=\"x\" content=\"y\"></body></html>";
        let tree = Html5everParser::new(64).parse(html).unwrap();
        let vocab = TagVocabulary::default();
        let out = StructuralStripper::new(&vocab).to_text(tree);
        assert_eq!(collapse(&out), "Annual report");
    }

    #[test]
    fn test_boundaries_become_spaces() {
        let tree = ParsedTree::new(vec![el(
            "body",
            vec![el("b", vec![text("Item")]), el("i", vec![text("1A.")]), text("Risk")],
        )]);
        let vocab = TagVocabulary::default();
        let out = StructuralStripper::new(&vocab).to_text(tree);
        assert_eq!(out, "  Item  1A. Risk ");
    }

    #[test]
    fn test_unwrap_leaves_only_text() {
        let tree = ParsedTree::new(vec![el("div", vec![el("span", vec![text("a")]), text("b")])]);
        let vocab = TagVocabulary::default();
        let flat = StructuralStripper::new(&vocab).unwrap_all(tree);
        assert!(flat.root.children.iter().all(|n| matches!(n, Node::Text(_))));
        assert_eq!(flat.depth(), 1);
    }

    #[test]
    fn test_nested_meta_removed() {
        let tree = ParsedTree::new(vec![el(
            "div",
            vec![text("keep"), el("span", vec![el("SCRIPT", vec![text("drop()")])])],
        )]);
        let vocab = TagVocabulary::default();
        let out = StructuralStripper::new(&vocab).to_text(tree);
        assert_eq!(collapse(&out), "keep");
    }
}
