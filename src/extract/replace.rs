//! Run-level text replacement.
//!
//! Replacements are applied inside each text run. A term split across two
//! runs is not matched, and no word-boundary checks are made, so a literal
//! also matches inside longer words.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Document;

/// A single replacement.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Plain substring replacement
    Literal {
        /// Text to find
        from: String,
        /// Replacement text
        to: String,
    },
    /// Regular expression replacement (`$1` style references allowed)
    Regex {
        /// Compiled pattern
        pattern: Regex,
        /// Replacement text
        to: String,
    },
}

impl Replacement {
    /// Literal replacement.
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Replacement::Literal {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Regular expression replacement.
    pub fn regex(pattern: &str, to: impl Into<String>) -> Result<Self> {
        Ok(Replacement::Regex {
            pattern: Regex::new(pattern)?,
            to: to.into(),
        })
    }

    /// Remove `term` together with an optional trailing ® sign.
    pub fn scrub_trademark(term: &str) -> Result<Self> {
        Self::regex(&format!("{}(?:®)?", regex::escape(term)), "")
    }

    /// Short description for logs and statistics.
    pub fn describe(&self) -> String {
        match self {
            Replacement::Literal { from, to } => format!("'{}' -> '{}'", from, to),
            Replacement::Regex { pattern, to } => format!("/{}/ -> '{}'", pattern.as_str(), to),
        }
    }

    /// Apply to `text`; `None` when nothing matched.
    pub fn apply(&self, text: &str) -> Option<String> {
        match self {
            Replacement::Literal { from, to } => {
                if from.is_empty() || !text.contains(from.as_str()) {
                    None
                } else {
                    Some(text.replace(from.as_str(), to))
                }
            }
            Replacement::Regex { pattern, to } => {
                if pattern.is_match(text) {
                    Some(pattern.replace_all(text, to.as_str()).into_owned())
                } else {
                    None
                }
            }
        }
    }
}

/// Per-replacement statistics of a replacement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceStats {
    /// Runs visited
    pub runs_visited: usize,
    /// `(description, runs changed)` in replacement order
    pub changed: Vec<(String, usize)>,
}

impl ReplaceStats {
    /// Total number of run edits.
    pub fn total(&self) -> usize {
        self.changed.iter().map(|(_, n)| n).sum()
    }
}

/// Apply `replacements` in order to every text run of the document.
///
/// Runs inside hyperlinks and table cells (nested tables included) are
/// visited; opaque inline markup is left alone.
pub fn replace_text(doc: &mut Document, replacements: &[Replacement]) -> ReplaceStats {
    let mut counts = vec![0usize; replacements.len()];
    let mut runs_visited = 0;

    doc.for_each_paragraph_mut(&mut |p| {
        for run in p.runs_mut() {
            runs_visited += 1;
            for (i, replacement) in replacements.iter().enumerate() {
                if let Some(new_text) = replacement.apply(&run.text) {
                    run.text = new_text;
                    counts[i] += 1;
                }
            }
        }
    });

    let changed = replacements
        .iter()
        .zip(counts)
        .map(|(r, n)| (r.describe(), n))
        .collect::<Vec<_>>();
    for (description, n) in &changed {
        log::info!("Replaced {} in {} run(s)", description, n);
    }

    ReplaceStats {
        runs_visited,
        changed,
    }
}

/// Serializable replacement rule, as stored in rule files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplacementRule {
    /// Plain substring replacement
    Literal {
        /// Text to find
        from: String,
        /// Replacement text
        to: String,
    },
    /// Remove a term and its trailing ®
    Trademark {
        /// Term to remove
        term: String,
    },
    /// Regular expression replacement
    Regex {
        /// Pattern
        pattern: String,
        /// Replacement text
        #[serde(default)]
        to: String,
    },
}

impl ReplacementRule {
    /// Compile the rule.
    pub fn compile(&self) -> Result<Replacement> {
        match self {
            ReplacementRule::Literal { from, to } => Ok(Replacement::literal(from, to)),
            ReplacementRule::Trademark { term } => Replacement::scrub_trademark(term),
            ReplacementRule::Regex { pattern, to } => Replacement::regex(pattern, to),
        }
    }
}

/// Rules applied when no rule file is given: rebrand the supplier and drop the PicoKine mark.
pub fn default_rules() -> Vec<ReplacementRule> {
    vec![
        ReplacementRule::Literal {
            from: "Boster".to_string(),
            to: "Innovative Research, Inc.".to_string(),
        },
        ReplacementRule::Trademark {
            term: "PicoKine".to_string(),
        },
    ]
}

/// Compile a list of rules.
pub fn compile_rules(rules: &[ReplacementRule]) -> Result<Vec<Replacement>> {
    rules.iter().map(ReplacementRule::compile).collect()
}

/// Parse and compile rules from a JSON array.
pub fn load_rules(json: &str) -> Result<Vec<Replacement>> {
    let rules: Vec<ReplacementRule> = serde_json::from_str(json)?;
    compile_rules(&rules)
}

/// Load rules from a JSON file.
pub fn load_rules_file<P: AsRef<Path>>(path: P) -> Result<Vec<Replacement>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    load_rules(&std::fs::read_to_string(path)?)
}
