//! Section heading lookup.

use super::options::{ExtractOptions, HeadingHeuristic, MatchMode};
use crate::model::{Block, Document};

/// Position of the first block whose text matches one of `candidates`.
///
/// Scans from the start of the document. Tables never match. A miss is
/// logged and returned as `None`.
pub fn locate_section<S: AsRef<str>>(
    doc: &Document,
    candidates: &[S],
    options: &ExtractOptions,
) -> Option<usize> {
    let found = locate_section_from(doc, candidates, 0, options);
    if found.is_none() {
        log::warn!(
            "Section not found: {}",
            candidates
                .iter()
                .map(|c| c.as_ref())
                .collect::<Vec<_>>()
                .join(" / ")
        );
    }
    found
}

/// Like [`locate_section`], starting at block `from`.
pub fn locate_section_from<S: AsRef<str>>(
    doc: &Document,
    candidates: &[S],
    from: usize,
    options: &ExtractOptions,
) -> Option<usize> {
    let candidates: Vec<String> = candidates
        .iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect();

    doc.blocks
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, block)| {
            let Block::Paragraph(p) = block else {
                return false;
            };
            let text = p.trimmed_text().to_lowercase();
            !text.is_empty()
                && candidates.iter().any(|c| match options.match_mode {
                    MatchMode::Exact => text == *c,
                    MatchMode::Contains => text.contains(c.as_str()),
                })
        })
        .map(|(i, _)| i)
}

/// Whether a block looks like a section heading.
///
/// A paragraph qualifies by style (heading/title style or an outline level)
/// or by shape: non-empty trimmed text with at least one letter, no
/// lower-case letters, shorter than `max_chars` characters. Short upper-case
/// data values are accepted false positives.
pub fn is_heading_like(block: &Block, heuristic: &HeadingHeuristic) -> bool {
    let Block::Paragraph(p) = block else {
        return false;
    };
    if heuristic.use_styles && p.is_heading() {
        return true;
    }
    heuristic.use_text_shape && is_heading_text(&p.trimmed_text(), heuristic.max_chars)
}

/// The text-shape half of [`is_heading_like`].
pub fn is_heading_text(text: &str, max_chars: usize) -> bool {
    let text = text.trim();
    !text.is_empty()
        && text.chars().count() < max_chars
        && text.chars().any(char::is_uppercase)
        && !text.chars().any(char::is_lowercase)
}
