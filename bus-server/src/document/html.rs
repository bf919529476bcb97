//! HTML-backed documents.

use scraper::{ElementRef, Html};

use super::{RenderedDocument, Row, Table};

/// Snapshot of a parsed HTML page: its title and all of its tables.
///
/// The scraper DOM is only alive while [`HtmlDocument::parse`] runs; the
/// snapshot owns plain strings, so it can be moved across tasks freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    title: String,
    tables: Vec<Table>,
}

impl HtmlDocument {
    /// Parse an HTML page.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut title = String::new();
        let mut tables = Vec::new();

        for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
            match element.value().name() {
                "title" if title.is_empty() => title = element_text(element),
                "table" => tables.push(Table::new(table_rows(element))),
                _ => {}
            }
        }

        Self { title, tables }
    }

    /// Build a document directly from its parts.
    pub fn from_parts(title: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            title: title.into(),
            tables,
        }
    }
}

impl RenderedDocument for HtmlDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn tables(&self) -> &[Table] {
        &self.tables
    }
}

/// Rows that belong to `table` itself, not to tables nested inside it.
fn table_rows(table: ElementRef<'_>) -> Vec<Row> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(row_cells(child)),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr")
                    .map(row_cells),
            ),
            _ => {}
        }
    }
    rows
}

fn row_cells(tr: ElementRef<'_>) -> Row {
    Row::new(
        tr.children()
            .filter_map(ElementRef::wrap)
            .filter(|e| matches!(e.value().name(), "td" | "th"))
            .map(element_text)
            .collect(),
    )
}

/// Element text with runs of whitespace collapsed to one space.
fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
