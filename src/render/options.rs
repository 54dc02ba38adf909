//! Rendering options and configuration.

use super::{CleanupOptions, CleanupPreset};
use crate::extract::HeadingHeuristic;

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How to render tables
    pub table_fallback: TableFallback,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// Include YAML frontmatter with metadata
    pub include_frontmatter: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Promote short upper-case paragraphs to headings
    pub heading: Option<HeadingHeuristic>,

    /// Text cleanup options
    pub cleanup: Option<CleanupOptions>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.table_fallback = fallback;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the heading heuristic used for unstyled headings.
    pub fn with_heading_heuristic(mut self, heuristic: HeadingHeuristic) -> Self {
        self.heading = Some(heuristic);
        self
    }

    /// Only styled paragraphs become headings.
    pub fn without_heading_heuristic(mut self) -> Self {
        self.heading = None;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_fallback: TableFallback::Markdown,
            max_heading_level: 6,
            include_frontmatter: false,
            escape_special_chars: true,
            heading: Some(HeadingHeuristic::default()),
            cleanup: None,
        }
    }
}

/// How to render tables in Markdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFallback {
    /// Pipe table; multi-paragraph cells are joined with `<br>`
    #[default]
    Markdown,
    /// HTML table tags (keeps nested tables)
    Html,
}
