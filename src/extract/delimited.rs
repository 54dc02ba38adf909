//! Pipe-delimited text to table conversion.

use serde::{Deserialize, Serialize};

use super::boundary::{ends_section, section_terminators};
use super::locator::locate_section;
use super::options::{ExtractOptions, SectionSpec};
use crate::model::{Block, Document, Table};

/// Separator rows contain a run of this many dashes.
const SEPARATOR_RUN: usize = 10;

/// Run formatting for cells of converted tables (Calibri 11pt).
const CELL_RUN_PROPERTIES: &str =
    r#"<w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr>"#;

/// Whether a line is a separator row.
pub fn is_separator_line(line: &str) -> bool {
    line.contains(&"-".repeat(SEPARATOR_RUN))
}

/// Rows of trimmed cells from pipe-delimited lines.
///
/// Separator rows and lines without `|` are skipped.
pub fn parse_delimited_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter(|line| line.contains('|') && !is_separator_line(line))
        .map(|line| line.split('|').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Build a rectangular table from pipe-delimited text.
///
/// The column count is the widest row; shorter rows are padded with empty
/// cells. Returns `None` when no line qualifies.
pub fn parse_delimited(text: &str) -> Option<Table> {
    let rows = parse_delimited_rows(text);
    if rows.is_empty() {
        log::warn!("No table rows found in delimited text");
        return None;
    }
    Some(Table::from_rows(rows))
}

/// Serialize table rows as `cell1 | cell2 | ...` lines.
pub fn to_delimited(table: &Table) -> String {
    table
        .rows_text()
        .iter()
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A paragraph holding at least one `|`.
fn is_row(block: &Block) -> bool {
    block
        .as_paragraph()
        .is_some_and(|p| p.plain_text().contains('|'))
}

/// Outcome of [`tabulate_section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TabulateOutcome {
    /// Delimited text was replaced by a table at `position`
    Converted {
        /// Block position of the new table
        position: usize,
        /// Row count
        rows: usize,
        /// Column count
        columns: usize,
    },
    /// The section holds no delimited rows; the document is unchanged
    NoRows,
    /// The section heading was not found; the document is unchanged
    SectionNotFound,
}

/// Replace the delimited paragraphs of a section with a table.
///
/// The first run of consecutive paragraphs inside the section that contain
/// `|` or are separator rows is joined line by line, converted, and replaced
/// by the resulting table. Pipe-delimited lines never end the section, so an
/// upper-case header row such as `COMPONENT | QTY` stays part of the table.
pub fn tabulate_section(
    doc: &mut Document,
    spec: &SectionSpec,
    options: &ExtractOptions,
) -> TabulateOutcome {
    let Some(heading) = locate_section(doc, &spec.candidates(), options) else {
        return TabulateOutcome::SectionNotFound;
    };

    let terminators = section_terminators(&spec.terminators, options);
    let end = doc
        .blocks
        .iter()
        .enumerate()
        .skip(heading + 1)
        .find(|(_, b)| !is_row(b) && ends_section(b, &terminators, options))
        .map(|(i, _)| i)
        .unwrap_or(doc.blocks.len());

    let is_delimited = |block: &Block| match block {
        Block::Paragraph(p) => {
            let text = p.plain_text();
            text.contains('|') || is_separator_line(&text)
        }
        _ => false,
    };

    let content = &doc.blocks[heading + 1..end];
    // A run must start on an actual row
    let Some(first) = content.iter().position(is_row) else {
        log::warn!("Section '{}' has no delimited text", spec.name);
        return TabulateOutcome::NoRows;
    };
    let len = content[first..]
        .iter()
        .take_while(|&b| is_delimited(b))
        .count();

    let start = heading + 1 + first;
    let end = start + len;
    let text = doc.blocks[start..end]
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n");

    let Some(mut table) = parse_delimited(&text) else {
        return TabulateOutcome::NoRows;
    };
    table.for_each_paragraph_mut(&mut |p| {
        for run in p.runs_mut() {
            run.properties_xml = Some(CELL_RUN_PROPERTIES.to_string());
        }
    });

    let (rows, columns) = (table.row_count(), table.column_count());
    doc.blocks.splice(start..end, std::iter::once(Block::Table(table)));
    log::info!(
        "Converted {} delimited paragraph(s) in '{}' to a {}x{} table at block {}",
        len,
        spec.name,
        rows,
        columns,
        start
    );

    TabulateOutcome::Converted {
        position: start,
        rows,
        columns,
    }
}
