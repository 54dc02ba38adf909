//! Table types.

use super::{Block, Paragraph, TextRun};
use serde::{Deserialize, Serialize};

/// A table (`w:tbl`).
///
/// Row arity may vary inside a table read from a document; call
/// [`Table::normalize`] to make it rectangular.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Raw `w:tblPr` element, written back unchanged
    #[serde(skip)]
    pub properties_xml: Option<String>,

    /// Raw `w:tblGrid` element, written back unchanged
    #[serde(skip)]
    pub grid_xml: Option<String>,

    /// Uninterpreted elements after the last row
    #[serde(skip)]
    pub trailing_xml: Option<String>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows of cell text. Short rows are padded.
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = Vec<S>>) -> Self {
        let mut table = Self {
            rows: rows.into_iter().map(TableRow::from_strings).collect(),
            ..Self::default()
        };
        table.normalize();
        table
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pad every row with empty cells up to the column count.
    pub fn normalize(&mut self) {
        let columns = self.column_count();
        for row in &mut self.rows {
            while row.cells.len() < columns {
                row.cells.push(TableCell::empty());
            }
        }
    }

    /// Cell texts, row-major, each trimmed.
    pub fn rows_text(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.plain_text().trim().to_string()).collect())
            .collect()
    }

    /// All cell texts in row-major order.
    pub fn cell_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .map(|c| c.plain_text())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Visit every paragraph in every cell, nested tables included.
    pub fn for_each_paragraph_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        for cell in self.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
            for block in &mut cell.content {
                block.for_each_paragraph_mut(f);
            }
        }
    }
}

/// A table row (`w:tr`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Raw `w:trPr` element
    #[serde(skip)]
    pub properties_xml: Option<String>,

    /// Raw `w:tblPrEx` element
    #[serde(skip)]
    pub exceptions_xml: Option<String>,

    /// Uninterpreted table children (bookmarks, content controls) before this row
    #[serde(skip)]
    pub leading_xml: Option<String>,

    /// Uninterpreted elements after the last cell
    #[serde(skip)]
    pub trailing_xml: Option<String>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell (`w:tc`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs and nested tables)
    pub content: Vec<Block>,

    /// Raw `w:tcPr` element
    #[serde(skip)]
    pub properties_xml: Option<String>,

    /// Uninterpreted row children before this cell
    #[serde(skip)]
    pub leading_xml: Option<String>,
}

impl TableCell {
    /// Create a cell holding the given blocks.
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Create a cell with a single paragraph of text.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut paragraph = Paragraph::new();
        if !text.is_empty() {
            paragraph.add_run(TextRun::new(text));
        }
        Self::new(vec![Block::Paragraph(paragraph)])
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Get plain text, paragraphs joined by newlines.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter(|b| !b.is_opaque())
            .map(|b| b.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the cell has no visible text.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}
