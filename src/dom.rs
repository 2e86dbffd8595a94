//! Table sources looked up by element id
//!
//! A [`Document`] is the environment an export reads tables from. The HTML
//! implementation parses markup with `scraper`; a plain `HashMap` works for
//! programmatic use.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table[id]").expect("table selector is valid"));

/// Structural snapshot of one table element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableElement {
    pub id: String,
    /// Rows of the header container (`<thead>`), raw cell text
    pub header_rows: Vec<Vec<String>>,
    /// Body rows, raw cell text
    pub body_rows: Vec<Vec<String>>,
    /// Full outer markup, used by the legacy export
    pub outer_html: String,
}

impl TableElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_header<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.header_rows
            .push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.body_rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Build the element from a parsed `<table>` node
    fn from_element(id: &str, table: ElementRef<'_>) -> Self {
        let mut element = TableElement::new(id);
        element.outer_html = table.html();

        for section in table.children().filter_map(ElementRef::wrap) {
            match section.value().name() {
                "thead" => element.header_rows.extend(rows_of(section)),
                "tbody" | "tfoot" => element.body_rows.extend(rows_of(section)),
                "tr" => element.body_rows.push(cells_of(section)),
                _ => {}
            }
        }

        element
    }
}

fn rows_of(section: ElementRef<'_>) -> Vec<Vec<String>> {
    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(cells_of)
        .collect()
}

fn cells_of(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|cell| cell.text().collect::<String>())
        .collect()
}

/// Lookup of table elements by identifier. A miss is `None`, never an error.
pub trait Document {
    fn table_by_id(&self, id: &str) -> Option<TableElement>;
}

impl Document for HashMap<String, TableElement> {
    fn table_by_id(&self, id: &str) -> Option<TableElement> {
        self.get(id).cloned()
    }
}

/// HTML page holding the tables to export
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    tables: HashMap<String, TableElement>,
}

impl HtmlDocument {
    /// Parse a full document or a fragment. Tables without an `id` are not
    /// addressable and are ignored; the first table wins on duplicate ids.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut tables = HashMap::new();

        for table in document.select(&TABLE_SELECTOR) {
            if let Some(id) = table.value().attr("id") {
                tables
                    .entry(id.to_string())
                    .or_insert_with(|| TableElement::from_element(id, table));
            }
        }

        Self { tables }
    }

    /// A document with no tables in it
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn table_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        ids.sort();
        ids
    }
}

impl Document for HtmlDocument {
    fn table_by_id(&self, id: &str) -> Option<TableElement> {
        self.tables.get(id).cloned()
    }
}
