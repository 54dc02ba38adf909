//! Body-level content blocks.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A content block in the document body.
///
/// Blocks are addressed by their index in [`super::Document::blocks`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// A body element the model does not interpret (content controls,
    /// bookmarks, custom XML), written back unchanged
    Opaque {
        /// Qualified element name, e.g. `w:sdt`
        name: String,

        /// Raw element XML
        #[serde(skip)]
        xml: String,
    },
}

impl Block {
    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
            Block::Opaque { .. } => String::new(),
        }
    }

    /// Get the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Get the table if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Check if this block is kept as raw XML only.
    pub fn is_opaque(&self) -> bool {
        matches!(self, Block::Opaque { .. })
    }

    /// Short kind name used in listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Table(_) => "table",
            Block::Opaque { .. } => "opaque",
        }
    }

    /// Visit this block's paragraphs, descending into table cells.
    pub fn for_each_paragraph_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        match self {
            Block::Paragraph(p) => f(p),
            Block::Table(t) => t.for_each_paragraph_mut(f),
            Block::Opaque { .. } => {}
        }
    }
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_accessors() {
        let p: Block = Paragraph::with_text("Storage").into();
        let t: Block = Table::from_rows(vec![vec!["a", "b"]]).into();

        assert_eq!(p.kind(), "paragraph");
        assert!(p.as_paragraph().is_some());
        assert!(p.as_table().is_none());
        assert!(t.is_table());
        assert_eq!(t.plain_text(), "a\tb");
    }

    #[test]
    fn test_opaque_block() {
        let sdt = Block::Opaque {
            name: "w:sdt".to_string(),
            xml: "<w:sdt/>".to_string(),
        };

        assert_eq!(sdt.kind(), "opaque");
        assert!(sdt.is_opaque());
        assert!(sdt.as_paragraph().is_none());
        assert_eq!(sdt.plain_text(), "");
        assert_eq!(serde_json::to_string(&sdt).unwrap(), r#"{"type":"opaque","name":"w:sdt"}"#);
    }
}
