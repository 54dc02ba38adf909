//! Block listing for inspecting a document's structure.

use serde::{Deserialize, Serialize};

use super::classify::{classify_table, CategorySet};
use super::locator::is_heading_like;
use super::options::ExtractOptions;
use crate::model::{Block, Document};

/// Characters of block text kept in a summary.
const PREVIEW_CHARS: usize = 60;

/// One body block as shown by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block position
    pub position: usize,
    /// "paragraph" or "table"
    pub kind: String,
    /// Paragraph style name or id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Whether the block passes the heading-like test
    pub heading_like: bool,
    /// Start of the block text
    pub preview: String,
    /// Table rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Table columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    /// Table labels
    #[serde(skip_serializing_if = "CategorySet::is_empty")]
    pub labels: CategorySet,
}

/// Summarize every body block in document order.
pub fn summarize_blocks(doc: &Document, options: &ExtractOptions) -> Vec<BlockSummary> {
    doc.blocks
        .iter()
        .enumerate()
        .map(|(position, block)| {
            let mut summary = BlockSummary {
                position,
                kind: block.kind().to_string(),
                style: None,
                heading_like: is_heading_like(block, &options.heading),
                preview: preview(&block.plain_text()),
                rows: None,
                columns: None,
                labels: CategorySet::new(),
            };
            match block {
                Block::Paragraph(p) => {
                    summary.style = p
                        .style
                        .style_name
                        .clone()
                        .or_else(|| p.style.style_id.clone());
                }
                Block::Table(t) => {
                    summary.rows = Some(t.row_count());
                    summary.columns = Some(t.column_count());
                    summary.labels = classify_table(t, &options.vocabulary);
                }
                Block::Opaque { name, .. } => summary.preview = format!("<{}>", name),
            }
            summary
        })
        .collect()
}

/// Single-line, shortened text.
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let mut short: String = flat.chars().take(PREVIEW_CHARS).collect();
        short.push_str("...");
        short
    }
}
