//! Rendering result with metadata and statistics.

use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: RenderStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }
}

/// Counts collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Paragraphs rendered as body text
    pub paragraph_count: u32,

    /// Paragraphs rendered as headings
    pub heading_count: u32,

    /// Tables rendered (nested tables included)
    pub table_count: u32,

    /// Whitespace-separated tokens in the output
    pub word_count: u32,

    /// Non-whitespace characters in the output
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count words and characters of rendered text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count = text.split_whitespace().count() as u32;
        self.char_count = text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
