//! Table reconstruction from the parsed tree.
//!
//! Runs before the structural stripper flattens the tree, while row and cell
//! boundaries still exist. Two kinds of roots are captured: literal `table`
//! elements, and table-free containers holding inline XBRL facts, which
//! recovers tagged figures laid out without a table wrapper.

use super::tree::{Element, ParsedTree};
use super::types::{Row, Table};
use super::vocabulary::TagVocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Header,
    Body,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Table,
    Row,
    Cell,
    HeaderSection,
    BodySection,
    FooterSection,
}

pub struct TableExtractor<'v> {
    vocab: &'v TagVocabulary,
}

impl<'v> TableExtractor<'v> {
    pub fn new(vocab: &'v TagVocabulary) -> Self {
        Self { vocab }
    }

    /// Tables in pre-order discovery order. A subtree that produced a table
    /// is not searched again, so nested candidates are never captured twice.
    pub fn extract(&self, tree: &ParsedTree) -> Vec<Table> {
        let mut tables = Vec::new();
        self.walk(&tree.root, &mut tables);
        log::debug!("Extracted {} tables", tables.len());
        tables
    }

    fn walk(&self, el: &Element, out: &mut Vec<Table>) {
        if self.is_candidate(el) {
            if let Some(table) = self.build_table(el) {
                out.push(table);
                return;
            }
        }
        for child in el.elements() {
            self.walk(child, out);
        }
    }

    fn role(&self, el: &Element) -> Option<Role> {
        if !self.vocab.is_table_tag(&el.name) {
            return None;
        }
        match el.lowercase_name().as_str() {
            "table" => Some(Role::Table),
            "tr" => Some(Role::Row),
            "td" | "th" => Some(Role::Cell),
            "thead" => Some(Role::HeaderSection),
            "tbody" => Some(Role::BodySection),
            "tfoot" => Some(Role::FooterSection),
            _ => None,
        }
    }

    fn is_table(&self, el: &Element) -> bool {
        self.role(el) == Some(Role::Table)
    }

    fn is_fact(&self, el: &Element) -> bool {
        self.vocab.is_fact_tag(&el.name)
    }

    fn is_candidate(&self, el: &Element) -> bool {
        if self.is_table(el) {
            return true;
        }
        el.has_descendant(|d| self.is_fact(d)) && !el.has_descendant(|d| self.is_table(d))
    }

    fn build_table(&self, root: &Element) -> Option<Table> {
        let mut header = Vec::new();
        let mut body = Vec::new();
        let mut footer = Vec::new();

        let mut row_nodes = Vec::new();
        self.collect_rows(root, Zone::Body, &mut row_nodes);

        if row_nodes.is_empty() {
            let mut fact_rows = Vec::new();
            self.collect_fact_rows(root, &mut fact_rows);
            body.extend(fact_rows.into_iter().filter_map(|row| self.fact_row(row)));
        } else {
            for (zone, row_el) in row_nodes {
                if let Some(row) = self.row(row_el) {
                    match zone {
                        Zone::Header => header.push(row),
                        Zone::Body => body.push(row),
                        Zone::Footer => footer.push(row),
                    }
                }
            }
        }

        let rows: Vec<Row> = header.into_iter().chain(body).chain(footer).collect();
        if rows.is_empty() {
            None
        } else {
            Some(Table { rows })
        }
    }

    /// Rows below `el` tagged with the section they sit in. Nested tables
    /// are not entered; their text stays inside the enclosing cell.
    fn collect_rows<'t>(&self, el: &'t Element, zone: Zone, out: &mut Vec<(Zone, &'t Element)>) {
        for child in el.elements() {
            match self.role(child) {
                Some(Role::Table) => {}
                Some(Role::Row) => out.push((zone, child)),
                Some(Role::HeaderSection) => self.collect_rows(child, Zone::Header, out),
                Some(Role::FooterSection) => self.collect_rows(child, Zone::Footer, out),
                Some(Role::BodySection) => self.collect_rows(child, Zone::Body, out),
                _ => self.collect_rows(child, zone, out),
            }
        }
    }

    /// Elements that directly hold inline facts stand in for rows when a
    /// root has no row markup.
    fn collect_fact_rows<'t>(&self, root: &'t Element, out: &mut Vec<&'t Element>) {
        if root.elements().any(|child| self.is_fact(child)) {
            out.push(root);
        }
        for child in root.elements() {
            self.collect_nested_fact_rows(child, out);
        }
    }

    fn collect_nested_fact_rows<'t>(&self, el: &'t Element, out: &mut Vec<&'t Element>) {
        if self.is_fact(el) || self.is_table(el) {
            return;
        }
        if el.elements().any(|child| self.is_fact(child)) {
            out.push(el);
        }
        for child in el.elements() {
            self.collect_nested_fact_rows(child, out);
        }
    }

    fn row(&self, row_el: &Element) -> Option<Row> {
        let mut cells = Vec::new();
        self.collect_cells(row_el, &|el: &Element| self.role(el) == Some(Role::Cell), &mut cells);
        if cells.is_empty() {
            self.collect_cells(row_el, &|el: &Element| self.is_fact(el), &mut cells);
        }
        non_empty_row(cells)
    }

    fn fact_row(&self, row_el: &Element) -> Option<Row> {
        non_empty_row(row_el.elements().filter(|child| self.is_fact(child)).collect())
    }

    /// Outermost matches below `el`, in document order.
    fn collect_cells<'t>(
        &self,
        el: &'t Element,
        is_cell: &dyn Fn(&Element) -> bool,
        out: &mut Vec<&'t Element>,
    ) {
        for child in el.elements() {
            if is_cell(child) {
                out.push(child);
            } else if !self.is_table(child) {
                self.collect_cells(child, is_cell, out);
            }
        }
    }
}

fn cell_text(el: &Element) -> String {
    el.rendered_text().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty_row(cells: Vec<&Element>) -> Option<Row> {
    let row: Row = cells
        .into_iter()
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();
    if row.is_empty() {
        None
    } else {
        Some(row)
    }
}
