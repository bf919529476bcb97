//! Rendered page documents.
//!
//! The engine only needs a small query surface from a loaded page: its
//! title, and every table as rows of cell text. [`RenderedDocument`] is
//! that surface; [`HtmlDocument`] implements it over parsed HTML.

mod html;

pub use html::HtmlDocument;

/// Query surface over a fully loaded page.
pub trait RenderedDocument {
    /// The document title, or an empty string.
    fn title(&self) -> &str;

    /// Every table in document order.
    fn tables(&self) -> &[Table];
}

/// One table row as trimmed cell text (`th` and `td` alike).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Text of the cell at `index`, if present.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A table as an ordered list of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from string slices (convenient for fixtures).
    pub fn from_cells(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| Row::new(r.iter().map(|c| c.to_string()).collect()))
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any cell contains `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .any(|c| c.contains(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_from_cells() {
        let table = Table::from_cells(&[&["去程", "返程"], &["站A", "3分"]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1).and_then(|r| r.cell(0)), Some("站A"));
        assert_eq!(table.row(1).and_then(|r| r.cell(5)), None);
        assert!(table.contains_text("返"));
        assert!(!table.contains_text("站B"));
    }
}
