//! Document-level types.

use super::{Block, Paragraph, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed DOCX document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Body blocks in document order
    pub blocks: Vec<Block>,

    /// Paragraph styles declared by the package
    pub styles: StyleSheet,

    /// The package this document was read from
    #[serde(skip)]
    pub source: Option<PackageSource>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get a block by position.
    pub fn get_block(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a paragraph to the document.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the document.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Tables with their block positions, in document order.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &Table)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_table().map(|t| (i, t)))
    }

    /// Visit every paragraph, including those inside tables.
    pub fn for_each_paragraph_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        for block in &mut self.blocks {
            block.for_each_paragraph_mut(f);
        }
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|block| !block.is_opaque())
            .map(|block| block.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Raw package data kept for writing the document back.
#[derive(Debug, Clone, Default)]
pub struct PackageSource {
    /// Original package bytes
    pub bytes: Vec<u8>,

    /// Zip entry name of the main document part
    pub main_part: String,

    /// Start tag of the root element, namespace declarations included
    pub root_tag: String,

    /// Raw XML between the root start tag and `w:body`
    pub prelude: String,

    /// Raw `w:sectPr` closing the body
    pub section_xml: Option<String>,
}

/// Paragraph style table from `word/styles.xml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    /// Styles keyed by style id
    pub styles: BTreeMap<String, StyleInfo>,
}

impl StyleSheet {
    /// Look up a style by id.
    pub fn get(&self, style_id: &str) -> Option<&StyleInfo> {
        self.styles.get(style_id)
    }

    /// Register a style.
    pub fn insert(&mut self, style_id: impl Into<String>, info: StyleInfo) {
        self.styles.insert(style_id.into(), info);
    }

    /// Number of known styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no styles are known.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// A single paragraph style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Display name (e.g. "heading 2")
    pub name: String,

    /// Outline level (0-based, as stored in `w:outlineLvl`)
    pub outline_level: Option<u8>,
}

impl StyleInfo {
    /// Heading level implied by this style (1-based), if any.
    pub fn heading_level(&self) -> Option<u8> {
        if let Some(level) = self.outline_level {
            if level < 9 {
                return Some(level + 1);
            }
        }
        let lower = self.name.to_lowercase();
        lower
            .strip_prefix("heading")
            .and_then(|rest| rest.trim().parse::<u8>().ok())
            .filter(|l| (1..=9).contains(l))
    }
}

/// Document metadata from `docProps/core.xml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author (`dc:creator`)
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Description
    pub description: Option<String>,

    /// Last editor
    pub last_modified_by: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Convert metadata to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        let fields = [
            ("title", &self.title),
            ("author", &self.author),
            ("subject", &self.subject),
            ("keywords", &self.keywords),
            ("description", &self.description),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                lines.push(format!("{}: \"{}\"", key, escape_yaml(value)));
            }
        }
        if let Some(ref created) = self.created {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
