//! Section extraction, table classification and in-place rewriting.
//!
//! Sections are found by heading text and bounded by the next heading-like
//! block or terminator keyword. Tables are labelled by keyword vocabulary.
//! The rewriting operations (`replace_text`, `tabulate_section`) mutate the
//! document in place; persist the result with [`crate::writer::save`].

mod boundary;
mod classify;
mod delimited;
mod inspect;
mod locator;
mod options;
mod replace;
mod report;

pub use boundary::{find_section, find_sections, resolve_section_end, Section};
pub use classify::{
    classify_table, classify_tables, table_text, CategorySet, KeywordVocabulary, TableCategory,
};
pub use delimited::{
    is_separator_line, parse_delimited, parse_delimited_rows, tabulate_section, to_delimited,
    TabulateOutcome,
};
pub use inspect::{summarize_blocks, BlockSummary};
pub use locator::{is_heading_like, is_heading_text, locate_section, locate_section_from};
pub use options::{default_sections, ExtractOptions, HeadingHeuristic, MatchMode, SectionSpec};
pub use replace::{
    compile_rules, default_rules, load_rules, load_rules_file, replace_text, ReplaceStats,
    Replacement, ReplacementRule,
};
pub use report::{
    catalog_number, extract_report, specifications, standard_curve, ExtractionReport,
    StandardCurve, TableSummary,
};
