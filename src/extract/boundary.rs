//! Section boundaries.

use serde::{Deserialize, Serialize};

use super::delimited::to_delimited;
use super::locator::{is_heading_like, locate_section};
use super::options::{ExtractOptions, SectionSpec};
use crate::model::{Block, Document};

/// A located section: heading position plus the half-open content range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Position of the heading block
    pub heading: usize,
    /// First content block (`heading + 1`)
    pub start: usize,
    /// One past the last content block
    pub end: usize,
}

impl Section {
    /// Number of content blocks.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the section has no content blocks.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Content blocks in document order.
    pub fn content<'a>(&self, doc: &'a Document) -> &'a [Block] {
        &doc.blocks[self.start..self.end]
    }

    /// Trimmed, non-empty texts of the content blocks.
    ///
    /// Tables contribute one `cell | cell` line per row.
    pub fn texts(&self, doc: &Document) -> Vec<String> {
        self.content(doc)
            .iter()
            .flat_map(|block| match block {
                Block::Paragraph(p) => vec![p.trimmed_text()],
                Block::Table(t) => to_delimited(t).lines().map(str::to_string).collect(),
                Block::Opaque { .. } => Vec::new(),
            })
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// End of the section whose heading sits at `heading`.
///
/// The first later block that is heading-like, or whose upper-cased trimmed
/// text contains a terminator, ends the section. Without one the section
/// runs to the end of the document.
pub fn resolve_section_end<S: AsRef<str>>(
    doc: &Document,
    heading: usize,
    terminators: &[S],
    options: &ExtractOptions,
) -> usize {
    let terminators = section_terminators(terminators, options);
    doc.blocks
        .iter()
        .enumerate()
        .skip(heading + 1)
        .find(|(_, block)| ends_section(block, &terminators, options))
        .map(|(i, _)| i)
        .unwrap_or(doc.blocks.len())
}

/// Per-section terminators followed by the global ones, upper-cased.
pub(crate) fn section_terminators<S: AsRef<str>>(
    terminators: &[S],
    options: &ExtractOptions,
) -> Vec<String> {
    terminators
        .iter()
        .map(|t| t.as_ref())
        .chain(options.terminators.iter().map(String::as_str))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Whether `block` closes the section before it.
pub(crate) fn ends_section(
    block: &Block,
    terminators: &[String],
    options: &ExtractOptions,
) -> bool {
    if is_heading_like(block, &options.heading) {
        return true;
    }
    match block {
        Block::Paragraph(p) => {
            let text = p.trimmed_text().to_uppercase();
            terminators.iter().any(|t| text.contains(t.as_str()))
        }
        _ => false,
    }
}

/// Locate a section by spec and resolve its range.
pub fn find_section(doc: &Document, spec: &SectionSpec, options: &ExtractOptions) -> Option<Section> {
    let heading = locate_section(doc, &spec.candidates(), options)?;
    let end = resolve_section_end(doc, heading, &spec.terminators, options);
    log::debug!(
        "Section '{}' heading at {}, content {}..{}",
        spec.name,
        heading,
        heading + 1,
        end
    );
    Some(Section {
        heading,
        start: heading + 1,
        end,
    })
}

/// Resolve every configured section; sections not found are `None`.
pub fn find_sections<'a>(
    doc: &Document,
    options: &'a ExtractOptions,
) -> Vec<(&'a SectionSpec, Option<Section>)> {
    options
        .sections
        .iter()
        .map(|spec| (spec, find_section(doc, spec, options)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Table};

    fn doc(texts: &[&str]) -> Document {
        Document::from_blocks(
            texts
                .iter()
                .map(|t| Block::Paragraph(Paragraph::with_text(*t)))
                .collect(),
        )
    }

    const NO_TERMINATORS: &[&str] = &[];

    #[test]
    fn test_end_is_len_without_later_heading() {
        let d = doc(&["BACKGROUND", "Interleukin 6 is a cytokine.", "It is secreted."]);
        let end = resolve_section_end(&d, 0, NO_TERMINATORS, &ExtractOptions::default());
        assert_eq!(end, 3);
    }

    #[test]
    fn test_adjacent_headings_give_empty_section() {
        let d = doc(&["intro", "OVERVIEW", "TECHNICAL DETAILS", "text"]);
        let options = ExtractOptions::default();
        let section = find_section(&d, &SectionSpec::new("Overview"), &options).unwrap();

        assert_eq!(section.heading, 1);
        assert_eq!((section.start, section.end), (2, 2));
        assert!(section.is_empty());
        assert!(section.texts(&d).is_empty());
    }

    #[test]
    fn test_heading_at_last_position() {
        let d = doc(&["text", "DATA ANALYSIS"]);
        let section = find_section(&d, &SectionSpec::new("Data Analysis"), &ExtractOptions::default())
            .unwrap();
        assert_eq!((section.start, section.end), (2, 2));
        assert_eq!(section.content(&d).len(), 0);
    }

    #[test]
    fn test_terminator_ends_section() {
        let d = doc(&[
            "REAGENTS PROVIDED",
            "Pre-coated plate",
            "Storage of unopened kit: 4°C",
            "more",
        ]);
        let options = ExtractOptions::default();

        assert_eq!(resolve_section_end(&d, 0, &["STORAGE"], &options), 2);
        assert_eq!(resolve_section_end(&d, 0, NO_TERMINATORS, &options), 4);

        let global = ExtractOptions::default().with_terminators(["storage"]);
        assert_eq!(resolve_section_end(&d, 0, NO_TERMINATORS, &global), 2);
    }

    #[test]
    fn test_terminator_inside_numbered_heading() {
        let d = doc(&["REAGENTS PROVIDED", "Plate | 1", "2. Kit storage", "Keep at 4°C"]);
        let options = ExtractOptions::default();

        assert_eq!(resolve_section_end(&d, 0, &["STORAGE"], &options), 2);
        assert_eq!(resolve_section_end(&d, 0, NO_TERMINATORS, &options), 4);
    }

    #[test]
    fn test_opaque_block_stays_in_section() {
        let mut d = doc(&["STORAGE", "Keep at 4°C"]);
        d.blocks.push(Block::Opaque {
            name: "w:bookmarkEnd".to_string(),
            xml: r#"<w:bookmarkEnd w:id="0"/>"#.to_string(),
        });
        d.add_paragraph(Paragraph::with_text("Avoid freeze-thaw cycles."));

        let section =
            find_section(&d, &SectionSpec::new("Storage"), &ExtractOptions::default()).unwrap();
        assert_eq!(section.end, 4);
        assert_eq!(section.texts(&d), vec!["Keep at 4°C", "Avoid freeze-thaw cycles."]);
    }

    #[test]
    fn test_first_qualifying_block_wins() {
        let d = doc(&["STORAGE", "Keep at 4°C", "NOTE", "Avoid freeze", "DATA ANALYSIS"]);
        let end = resolve_section_end(&d, 0, NO_TERMINATORS, &ExtractOptions::default());
        assert_eq!(end, 2);
    }

    #[test]
    fn test_section_texts_round_trip() {
        let mut d = doc(&["INTENDED USE", "  For research use only. ", ""]);
        d.add_table(Table::from_rows(vec![vec!["Range", "1-100 pg/ml"]]));
        d.add_paragraph(Paragraph::with_text("Not for diagnostics."));

        let section =
            find_section(&d, &SectionSpec::new("Intended Use"), &ExtractOptions::default()).unwrap();
        let texts = section.texts(&d);
        assert_eq!(
            texts,
            vec![
                "For research use only.",
                "Range | 1-100 pg/ml",
                "Not for diagnostics."
            ]
        );

        // Each paragraph text maps back to a block inside the range
        for text in texts.iter().filter(|t| !t.contains('|')) {
            let position = d.blocks[section.start..section.end]
                .iter()
                .position(|b| b.as_paragraph().map(|p| p.trimmed_text()) == Some(text.clone()))
                .unwrap();
            assert!(section.start + position < section.end);
        }
    }

    #[test]
    fn test_find_sections_reports_missing() {
        let d = doc(&["STORAGE", "Keep at 4°C"]);
        let options = ExtractOptions::default().with_sections(vec![
            SectionSpec::new("Storage"),
            SectionSpec::new("Data Analysis"),
        ]);

        let found = find_sections(&d, &options);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1.map(|s| s.len()), Some(1));
        assert!(found[1].1.is_none());
    }
}
