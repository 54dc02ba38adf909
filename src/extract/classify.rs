//! Keyword-based table classification.
//!
//! Each category is an independent predicate over the lower-cased cell
//! text of a table; a table can carry any number of labels. Matching is
//! plain substring search, so short keywords such as "od" also hit inside
//! longer words.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::model::{Document, Table};

/// Table label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    /// Kit contents / reagents
    Reagent,
    /// Performance specifications
    Specs,
    /// Assay procedure steps
    AssayProcedure,
    /// Standard curve data
    StandardCurve,
    /// Intra/inter-assay precision
    Reproducibility,
}

impl TableCategory {
    /// All categories in declaration order.
    pub const ALL: [TableCategory; 5] = [
        TableCategory::Reagent,
        TableCategory::Specs,
        TableCategory::AssayProcedure,
        TableCategory::StandardCurve,
        TableCategory::Reproducibility,
    ];

    /// Stable label, as used in reports.
    pub fn label(self) -> &'static str {
        match self {
            TableCategory::Reagent => "reagent",
            TableCategory::Specs => "specs",
            TableCategory::AssayProcedure => "assay_procedure",
            TableCategory::StandardCurve => "standard_curve",
            TableCategory::Reproducibility => "reproducibility",
        }
    }
}

impl fmt::Display for TableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Labels matched by one table.
pub type CategorySet = BTreeSet<TableCategory>;

/// Keywords per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordVocabulary {
    keywords: BTreeMap<TableCategory, Vec<String>>,
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        let sets: [(TableCategory, &[&str]); 5] = [
            (
                TableCategory::Reagent,
                &[
                    "microplate",
                    "antibody",
                    "standard",
                    "buffer",
                    "substrate",
                    "stop solution",
                    "component",
                    "reagent",
                    "kit",
                    "material",
                    "content",
                ],
            ),
            (
                TableCategory::Specs,
                &["sensitivity", "specificity", "storage", "reactive species"],
            ),
            (
                TableCategory::AssayProcedure,
                &["assay", "step", "procedure", "protocol"],
            ),
            (
                TableCategory::StandardCurve,
                &["standard", "curve", "concentration", "od"],
            ),
            (
                TableCategory::Reproducibility,
                &["intra", "inter", "precision", "cv%"],
            ),
        ];

        let keywords = sets
            .into_iter()
            .map(|(category, words)| (category, words.iter().map(|w| w.to_string()).collect()))
            .collect();
        Self { keywords }
    }
}

impl KeywordVocabulary {
    /// A vocabulary with no keywords.
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
        }
    }

    /// Keywords of a category.
    pub fn keywords(&self, category: TableCategory) -> &[String] {
        self.keywords
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the keywords of a category. Keywords are stored lower-cased.
    pub fn set<S: AsRef<str>>(&mut self, category: TableCategory, words: impl IntoIterator<Item = S>) {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        self.keywords.insert(category, words);
    }

    /// Categories whose keywords occur in `text` (already lower-cased).
    pub fn matches(&self, text: &str) -> CategorySet {
        self.keywords
            .iter()
            .filter(|(_, words)| {
                words
                    .iter()
                    .any(|w| !w.is_empty() && text.contains(&w.to_lowercase()))
            })
            .map(|(category, _)| *category)
            .collect()
    }
}

/// Cell texts in row-major order, space separated and lower-cased.
pub fn table_text(table: &Table) -> String {
    table.cell_texts().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Classify one table.
pub fn classify_table(table: &Table, vocabulary: &KeywordVocabulary) -> CategorySet {
    vocabulary.matches(&table_text(table))
}

/// Classify every body table, returning `(block position, labels)` in document order.
pub fn classify_tables(doc: &Document, vocabulary: &KeywordVocabulary) -> Vec<(usize, CategorySet)> {
    doc.tables()
        .map(|(position, table)| {
            let labels = classify_table(table, vocabulary);
            log::debug!(
                "Table at block {} labelled {:?}",
                position,
                labels.iter().map(|c| c.label()).collect::<Vec<_>>()
            );
            (position, labels)
        })
        .collect()
}
