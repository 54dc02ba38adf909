//! # kitdoc
//!
//! Section and table extraction for ELISA kit datasheets stored as DOCX.
//!
//! A datasheet is read into an ordered list of body blocks (paragraphs and
//! tables). Named sections are located by heading text and bounded by the
//! next heading-like block, tables are labelled by keyword vocabulary, and
//! the document can be rewritten in place (rebranding text, turning
//! pipe-delimited paragraphs into real tables) and saved back with its
//! formatting intact.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kitdoc::{extract::ExtractOptions, parse_file};
//!
//! fn main() -> kitdoc::Result<()> {
//!     let doc = parse_file("EK0410.docx")?;
//!
//!     let report = kitdoc::extract::extract_report(&doc, &ExtractOptions::default());
//!     println!("{}", report.to_json(true)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section extraction**: heading lookup with synonyms, heading-like and terminator boundaries
//! - **Table classification**: non-exclusive keyword labels (reagent, specs, standard curve, ...)
//! - **Rewriting**: run-level text replacement, delimited text to table conversion
//! - **Round-trip writing**: untouched package parts are copied byte for byte
//! - **Output formats**: Markdown, plain text, JSON

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod writer;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, ExtractionReport, Replacement, ReplaceStats, SectionSpec, TableCategory,
    TabulateOutcome,
};
pub use model::{
    Block, Document, InlineContent, Metadata, Paragraph, ParagraphStyle, Table, TableCell,
    TableRow, TextRun,
};
pub use parser::{DocxParser, ErrorMode, ParseOptions};
pub use render::{CleanupOptions, CleanupPreset, JsonFormat, RenderOptions, TableFallback};
pub use writer::{create_backup, save, WriteOptions};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a DOCX file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use kitdoc::parse_file;
///
/// let doc = parse_file("datasheet.docx").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = DocxParser::open(path)?;
    parser.parse()
}

/// Parse a DOCX file with custom options.
///
/// # Example
///
/// ```no_run
/// use kitdoc::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient();
/// let doc = parse_file_with_options("datasheet.docx", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = DocxParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a DOCX from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = DocxParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a DOCX from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = DocxParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Parse a DOCX from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    let parser = DocxParser::from_reader(reader)?;
    parser.parse()
}

/// Parse a DOCX from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    let parser = DocxParser::from_reader_with_options(reader, options)?;
    parser.parse()
}

/// Extract plain text from a DOCX file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    Ok(doc.plain_text())
}

/// Build the extraction report for a DOCX file.
///
/// # Example
///
/// ```no_run
/// use kitdoc::{extract_report_file, ExtractOptions};
///
/// let report = extract_report_file("EK0410.docx", &ExtractOptions::default()).unwrap();
/// for name in &report.missing {
///     eprintln!("missing section: {}", name);
/// }
/// ```
pub fn extract_report_file<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<ExtractionReport> {
    let path = path.as_ref();
    let doc = parse_file(path)?;
    Ok(extract::extract_report(&doc, options))
}

/// Convert a DOCX to Markdown.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Convert a DOCX to Markdown with custom options.
///
/// # Example
///
/// ```no_run
/// use kitdoc::{to_markdown_with_options, CleanupPreset, RenderOptions};
///
/// let options = RenderOptions::new()
///     .with_frontmatter(true)
///     .with_cleanup_preset(CleanupPreset::Standard);
/// let markdown = to_markdown_with_options("datasheet.docx", &options).unwrap();
/// ```
pub fn to_markdown_with_options<P: AsRef<Path>>(
    path: P,
    options: &RenderOptions,
) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_markdown(&doc, options)
}

/// Convert a DOCX to plain text.
pub fn to_text<P: AsRef<Path>>(path: P, options: &RenderOptions) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, options)
}

/// Convert a DOCX to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for reading, rewriting and exporting datasheets.
///
/// # Example
///
/// ```no_run
/// use kitdoc::{Kitdoc, Replacement, SectionSpec};
///
/// let mut kit = Kitdoc::new().with_backups(true).parse("EK0410.docx")?;
/// kit.replace(&[Replacement::literal("Boster", "Innovative Research, Inc.")]);
/// kit.tabulate(&SectionSpec::reagents_provided());
/// kit.save_in_place()?;
/// # Ok::<(), kitdoc::Error>(())
/// ```
pub struct Kitdoc {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    extract_options: ExtractOptions,
    backups: bool,
}

impl Kitdoc {
    /// Create a new Kitdoc builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            extract_options: ExtractOptions::default(),
            backups: false,
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set table fallback mode.
    pub fn with_table_fallback(mut self, fallback: TableFallback) -> Self {
        self.render_options = self.render_options.with_table_fallback(fallback);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.render_options = self.render_options.with_cleanup_preset(preset);
        self
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Back up existing files before saving over them.
    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backups = enabled;
        self
    }

    /// Parse a DOCX file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<KitdocResult> {
        let path = path.as_ref();
        let parser = DocxParser::open_with_options(path, self.parse_options.clone())?;
        let document = parser.parse()?;
        Ok(self.wrap(document, Some(path.to_path_buf())))
    }

    /// Parse a DOCX from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<KitdocResult> {
        let parser = DocxParser::from_bytes_with_options(data, self.parse_options.clone())?;
        let document = parser.parse()?;
        Ok(self.wrap(document, None))
    }

    fn wrap(self, document: Document, path: Option<PathBuf>) -> KitdocResult {
        KitdocResult {
            document,
            path,
            render_options: self.render_options,
            extract_options: self.extract_options,
            backups: self.backups,
            last_operation: None,
        }
    }
}

impl Default for Kitdoc {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed datasheet together with the builder's options.
pub struct KitdocResult {
    /// The parsed document
    pub document: Document,
    path: Option<PathBuf>,
    render_options: RenderOptions,
    extract_options: ExtractOptions,
    backups: bool,
    last_operation: Option<&'static str>,
}

impl KitdocResult {
    /// Source path, when parsed from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Build the extraction report.
    pub fn report(&self) -> ExtractionReport {
        extract::extract_report(&self.document, &self.extract_options)
    }

    /// Apply text replacements to every run.
    pub fn replace(&mut self, replacements: &[Replacement]) -> ReplaceStats {
        self.last_operation = Some("replace");
        extract::replace_text(&mut self.document, replacements)
    }

    /// Convert a section's delimited text into a table.
    pub fn tabulate(&mut self, spec: &SectionSpec) -> TabulateOutcome {
        self.last_operation = Some("tabulate");
        extract::tabulate_section(&mut self.document, spec, &self.extract_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Save to `path`; returns the backup path if one was taken.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<Option<PathBuf>> {
        let mut options = WriteOptions::new();
        if self.backups {
            options = options.with_backup(self.last_operation.unwrap_or("edit"));
        }
        writer::save(&self.document, path, &options)
    }

    /// Save over the file the document was read from.
    pub fn save_in_place(&self) -> Result<Option<PathBuf>> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::Config("document was not read from a file".to_string()))?;
        self.save(path)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> Vec<u8> {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Boster Human IL-6 ELISA Kit"));
        doc.add_paragraph(Paragraph::with_text("REAGENTS PROVIDED"));
        doc.add_paragraph(Paragraph::with_text("Plate | 1 | Box"));
        doc.add_paragraph(Paragraph::with_text("Buffer | 2 | Vial"));
        doc.add_paragraph(Paragraph::with_text("STORAGE"));
        writer::to_bytes(&doc).unwrap()
    }

    #[test]
    fn test_kitdoc_builder() {
        let kit = Kitdoc::new()
            .lenient()
            .with_frontmatter()
            .with_cleanup(CleanupPreset::Standard)
            .with_backups(true);

        assert_eq!(kit.parse_options.error_mode, ErrorMode::Lenient);
        assert!(kit.render_options.include_frontmatter);
        assert!(kit.render_options.cleanup.is_some());
        assert!(kit.backups);
    }

    #[test]
    fn test_kitdoc_builder_default() {
        let kit = Kitdoc::default();
        assert!(!kit.render_options.include_frontmatter);
        assert!(!kit.backups);
        assert_eq!(kit.extract_options.sections.len(), 16);
    }

    #[test]
    fn test_parse_bytes_empty_data() {
        let result = parse_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_bytes_not_a_package() {
        let result = parse_bytes(b"<!DOCTYPE html><html></html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/datasheet.docx");
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_parse_reader() {
        let doc = parse_reader(std::io::Cursor::new(sample_bytes())).unwrap();
        assert_eq!(doc.block_count(), 5);
        assert!(doc.source.is_some());
    }

    #[test]
    fn test_result_rewrite_round_trip() {
        let mut kit = Kitdoc::new().parse_bytes(&sample_bytes()).unwrap();
        assert!(kit.path().is_none());

        let stats = kit.replace(&[Replacement::literal("Boster", "Innovative Research, Inc.")]);
        assert_eq!(stats.total(), 1);
        let outcome = kit.tabulate(&SectionSpec::reagents_provided());
        assert!(matches!(outcome, TabulateOutcome::Converted { position: 2, .. }));

        let bytes = writer::to_bytes(kit.document()).unwrap();
        let reread = parse_bytes(&bytes).unwrap();
        assert_eq!(reread.block_count(), 4);
        assert!(reread.blocks[2].is_table());
        assert!(reread.plain_text().starts_with("Innovative Research, Inc. Human IL-6"));
        assert!(matches!(kit.save_in_place(), Err(Error::Config(_))));
    }

    #[test]
    fn test_result_outputs() {
        let kit = Kitdoc::new().parse_bytes(&sample_bytes()).unwrap();

        let markdown = kit.to_markdown().unwrap();
        assert!(markdown.contains("## REAGENTS PROVIDED"));
        assert!(kit.to_text().unwrap().contains("Plate | 1 | Box"));
        assert!(kit.to_json(JsonFormat::Compact).unwrap().contains("\"blocks\""));

        let report = kit.report();
        assert_eq!(
            report.sections["Reagents Provided"],
            vec!["Plate | 1 | Box", "Buffer | 2 | Vial"]
        );
    }
}
