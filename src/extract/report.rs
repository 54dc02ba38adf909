//! Extraction report: the section and table mappings handed to template population.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::boundary::find_sections;
use super::classify::{classify_tables, CategorySet, TableCategory};
use super::options::ExtractOptions;
use crate::error::Result;
use crate::model::{Block, Document};

/// A classified body table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Block position
    pub position: usize,
    /// Matched labels
    pub labels: CategorySet,
    /// Trimmed cell texts
    pub rows: Vec<Vec<String>>,
}

/// Concentration / optical density pairs of a standard curve table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardCurve {
    /// Concentrations, first column
    pub concentrations: Vec<String>,
    /// OD readings, second column
    pub od_values: Vec<String>,
}

/// Everything extracted from one datasheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Document title from the package metadata
    pub title: Option<String>,
    /// Catalog number, if one was found
    pub catalog_number: Option<String>,
    /// Section name to trimmed non-empty texts
    pub sections: BTreeMap<String, Vec<String>>,
    /// Configured sections that were not found
    pub missing: Vec<String>,
    /// Label to rows of the first table carrying that label
    pub tables: BTreeMap<TableCategory, Vec<Vec<String>>>,
    /// Every body table with its labels
    pub classified: Vec<TableSummary>,
    /// Key/value pairs from two-column specification tables
    pub specifications: BTreeMap<String, String>,
    /// Standard curve points, if a curve table was found
    pub standard_curve: Option<StandardCurve>,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

impl ExtractionReport {
    /// Serialize to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Number of sections found.
    pub fn found_count(&self) -> usize {
        self.sections.len()
    }
}

/// Build the extraction report for a document.
pub fn extract_report(doc: &Document, options: &ExtractOptions) -> ExtractionReport {
    let mut sections = BTreeMap::new();
    let mut missing = Vec::new();
    for (spec, section) in find_sections(doc, options) {
        match section {
            Some(section) => {
                sections.insert(spec.name.clone(), section.texts(doc));
            }
            None => missing.push(spec.name.clone()),
        }
    }

    let classified: Vec<TableSummary> = classify_tables(doc, &options.vocabulary)
        .into_iter()
        .filter_map(|(position, labels)| {
            let table = doc.blocks.get(position)?.as_table()?;
            Some(TableSummary {
                position,
                labels,
                rows: table.rows_text(),
            })
        })
        .collect();

    let mut tables = BTreeMap::new();
    for summary in &classified {
        for label in &summary.labels {
            tables
                .entry(*label)
                .or_insert_with(|| summary.rows.clone());
        }
    }

    log::info!(
        "Extracted {} section(s), {} missing, {} table(s)",
        sections.len(),
        missing.len(),
        classified.len()
    );

    ExtractionReport {
        title: doc.metadata.title.clone(),
        catalog_number: catalog_number(doc),
        sections,
        missing,
        tables,
        classified,
        specifications: specifications(doc),
        standard_curve: standard_curve(doc),
        generated_at: Utc::now(),
    }
}

fn paragraph_texts(doc: &Document) -> impl Iterator<Item = String> + '_ {
    doc.blocks
        .iter()
        .filter_map(Block::as_paragraph)
        .map(|p| p.plain_text())
}

/// Find the kit's catalog number.
///
/// Tries `Catalog Number: X` style labels first, then any `catalog ... # X`
/// paragraph, then a bare `EK<digits>` code.
pub fn catalog_number(doc: &Document) -> Option<String> {
    let labelled = match RegexBuilder::new(r"Catalog (?:Number|No|#)\s*[:.]?\s*([A-Z0-9-]+)")
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            log::error!("Catalog pattern failed to compile: {}", e);
            return None;
        }
    };

    for text in paragraph_texts(doc) {
        if let Some(caps) = labelled.captures(&text) {
            return Some(caps[1].to_string());
        }
    }

    for text in paragraph_texts(doc) {
        if text.to_lowercase().contains("catalog") {
            if let Some((_, rest)) = text.split_once('#') {
                if let Some(code) = rest.split_whitespace().next() {
                    return Some(code.to_string());
                }
            }
        }
    }

    let code = Regex::new(r"EK\d+").ok()?;
    paragraph_texts(doc).find_map(|text| code.find(&text).map(|m| m.as_str().to_string()))
}

/// Specification key for a table header cell.
fn specification_key(header: &str) -> Option<&'static str> {
    let header = header.to_lowercase();
    if header.contains("sensitivity") {
        Some("sensitivity")
    } else if header.contains("detection range") {
        Some("detection_range")
    } else if header.contains("specificity") {
        Some("specificity")
    } else if header.contains("standard") {
        Some("standard")
    } else if header.contains("cross") && header.contains("reactivity") {
        Some("cross_reactivity")
    } else {
        None
    }
}

/// Key/value pairs from table rows with at least two cells.
///
/// The first cell names the property, the second holds the value. Later
/// rows overwrite earlier ones.
pub fn specifications(doc: &Document) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();
    for (_, table) in doc.tables() {
        for row in table.rows_text() {
            if row.len() < 2 {
                continue;
            }
            if let Some(key) = specification_key(&row[0]) {
                specs.insert(key.to_string(), row[1].clone());
            }
        }
    }
    specs
}

/// Points of the first standard curve table.
///
/// A curve table has more than two rows and a `concentration` header cell;
/// each later row whose first two cells both hold a number contributes a
/// point.
pub fn standard_curve(doc: &Document) -> Option<StandardCurve> {
    let number = Regex::new(r"\d+(?:\.\d+)?").ok()?;

    for (position, table) in doc.tables() {
        let rows = table.rows_text();
        if rows.len() <= 2 {
            continue;
        }
        if !rows[0]
            .iter()
            .any(|c| c.to_lowercase().contains("concentration"))
        {
            continue;
        }

        let mut curve = StandardCurve::default();
        for row in rows.iter().skip(1).filter(|r| r.len() >= 2) {
            if let (Some(conc), Some(od)) = (number.find(&row[0]), number.find(&row[1])) {
                curve.concentrations.push(conc.as_str().to_string());
                curve.od_values.push(od.as_str().to_string());
            }
        }
        if !curve.concentrations.is_empty() {
            log::debug!("Standard curve table at block {}", position);
            return Some(curve);
        }
    }
    None
}
