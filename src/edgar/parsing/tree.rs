//! Owned markup tree produced by the parser backends.
//!
//! Every invocation of the pipeline builds its own tree and drops it once
//! tables and text have been extracted, so plain `Vec` children suffice.

pub const DOCUMENT_ROOT: &str = "#document";

/// Elements that start a new line when rendered; every other element is
/// inline and adds no space of its own.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "caption", "center", "dd", "div", "dl", "dt",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "ol", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTree {
    pub root: Element,
}

impl ParsedTree {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Element {
                name: DOCUMENT_ROOT.to_string(),
                attrs: Vec::new(),
                children,
            },
        }
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn lowercase_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Pre-order walk over the elements below `self`, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    pub fn has_descendant(&self, pred: impl Fn(&Element) -> bool) -> bool {
        self.descendants().any(|el| pred(el))
    }

    /// Nesting depth of the subtree, counting `self` as one level.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((el, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(el.elements().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Text of the subtree as a browser would render it: inline elements
    /// join their neighbours directly, block elements and `br` separate them.
    pub fn rendered_text(&self) -> String {
        let mut out = String::new();
        self.write_rendered(&mut out);
        out
    }

    fn is_block(&self) -> bool {
        BLOCK_TAGS.iter().any(|tag| self.is(tag))
    }

    fn write_rendered(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(el) if el.is_block() => {
                    out.push(' ');
                    el.write_rendered(out);
                    out.push(' ');
                }
                Node::Element(el) => el.write_rendered(out),
            }
        }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(el.elements());
        self.stack[start..].reverse();
        Some(el)
    }
}
