//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph (`w:p`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in document order
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph carrying a named style, e.g. `styled("INTENDED USE", "Heading2")`.
    pub fn styled(text: impl Into<String>, style_id: impl Into<String>) -> Self {
        let mut p = Self::with_text(text);
        p.set_style(style_id, None);
        p
    }

    /// Create a heading paragraph using the built-in `HeadingN` style.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let level = level.clamp(1, 9);
        let mut p = Self::with_text(text);
        p.set_style(format!("Heading{}", level), Some(format!("heading {}", level)));
        p.style.heading_level = Some(level);
        p
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Set the paragraph style.
    ///
    /// Raw paragraph properties read from the source are dropped so the
    /// writer emits the new style reference.
    pub fn set_style(&mut self, style_id: impl Into<String>, style_name: Option<String>) {
        self.style.style_id = Some(style_id.into());
        self.style.style_name = style_name;
        self.style.properties_xml = None;
    }

    /// Replace all content with a single run, keeping the first run's formatting.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let properties_xml = self
            .runs()
            .next()
            .and_then(|run| run.properties_xml.clone());
        self.content.clear();
        self.content.push(InlineContent::Text(TextRun {
            text: text.into(),
            properties_xml,
        }));
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::Hyperlink { runs, .. } => {
                    runs.iter().map(|r| r.text.as_str()).collect::<String>()
                }
                InlineContent::Opaque { .. } => String::new(),
            })
            .collect()
    }

    /// Plain text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.plain_text().trim().to_string()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }

    /// Check if the paragraph carries a heading style.
    pub fn is_heading(&self) -> bool {
        if self.style.heading_level.is_some() {
            return true;
        }
        self.style
            .style_name
            .as_deref()
            .or(self.style.style_id.as_deref())
            .map(|name| {
                let name = name.trim().to_lowercase();
                name.starts_with("heading") || name == "title"
            })
            .unwrap_or(false)
    }

    /// Get the heading level or None.
    pub fn heading_level(&self) -> Option<u8> {
        self.style.heading_level
    }

    /// Iterate over every text run, including runs inside hyperlinks.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.content.iter().flat_map(|c| match c {
            InlineContent::Text(run) => std::slice::from_ref(run).iter(),
            InlineContent::Hyperlink { runs, .. } => runs.iter(),
            InlineContent::Opaque { .. } => Default::default(),
        })
    }

    /// Mutable variant of [`Paragraph::runs`].
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut TextRun> {
        self.content.iter_mut().flat_map(|c| match c {
            InlineContent::Text(run) => std::slice::from_mut(run).iter_mut(),
            InlineContent::Hyperlink { runs, .. } => runs.iter_mut(),
            InlineContent::Opaque { .. } => Default::default(),
        })
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run
    Text(TextRun),

    /// A hyperlink wrapping plain runs
    Hyperlink {
        /// Attributes of the `w:hyperlink` element (unescaped)
        attributes: Vec<(String, String)>,
        /// Runs inside the link
        runs: Vec<TextRun>,
    },

    /// Inline markup kept verbatim (drawings, fields, bookmarks, ...)
    Opaque {
        /// Raw XML
        #[serde(skip)]
        xml: String,
    },
}

/// A run of text with consistent formatting (`w:r`).
///
/// Tabs and line breaks are carried as `'\t'` and `'\n'` in `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Raw `w:rPr` element, written back unchanged
    #[serde(skip)]
    pub properties_xml: Option<String>,
}

impl TextRun {
    /// Create a new run without formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties_xml: None,
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties_xml: Some("<w:rPr><w:b/></w:rPr>".to_string()),
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Paragraph styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Style id referenced by `w:pStyle` (e.g. "Heading2")
    pub style_id: Option<String>,

    /// Human readable style name from the style sheet (e.g. "heading 2")
    pub style_name: Option<String>,

    /// Heading level derived from the style's outline level
    pub heading_level: Option<u8>,

    /// Raw `w:pPr` element, written back unchanged
    #[serde(skip)]
    pub properties_xml: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_run(TextRun::bold("world"));
        p.content.push(InlineContent::Hyperlink {
            attributes: vec![("r:id".to_string(), "rId4".to_string())],
            runs: vec![TextRun::new("!")],
        });
        p.content.push(InlineContent::Opaque {
            xml: "<w:bookmarkStart w:id=\"0\" w:name=\"x\"/>".to_string(),
        });

        assert_eq!(p.plain_text(), "Hello world!");
        assert_eq!(p.runs().count(), 3);
    }

    #[test]
    fn test_heading() {
        let h2 = Paragraph::heading("INTENDED USE", 2);
        assert!(h2.is_heading());
        assert_eq!(h2.heading_level(), Some(2));
        assert_eq!(h2.style.style_id.as_deref(), Some("Heading2"));
    }

    #[test]
    fn test_style_name_marks_heading() {
        let mut p = Paragraph::with_text("Overview");
        p.style.style_name = Some("Heading 3".to_string());
        assert!(p.is_heading());

        let body = Paragraph::styled("Body", "Normal");
        assert!(!body.is_heading());
    }

    #[test]
    fn test_set_text_keeps_first_run_format() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::bold("Old"));
        p.add_text(" text");
        p.set_text("New");

        assert_eq!(p.plain_text(), "New");
        assert_eq!(p.content.len(), 1);
        assert!(p.runs().next().unwrap().properties_xml.is_some());
    }

    #[test]
    fn test_runs_mut_reaches_hyperlinks() {
        let mut p = Paragraph::new();
        p.content.push(InlineContent::Hyperlink {
            attributes: Vec::new(),
            runs: vec![TextRun::new("link")],
        });
        for run in p.runs_mut() {
            run.text = run.text.to_uppercase();
        }
        assert_eq!(p.plain_text(), "LINK");
    }
}
