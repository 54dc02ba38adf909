//! Extraction options and section vocabulary.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::classify::KeywordVocabulary;
use crate::error::{Error, Result};

/// How heading text is compared against section names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Trimmed text equals a candidate, ignoring case
    #[default]
    Exact,
    /// Trimmed text contains a candidate, ignoring case
    Contains,
}

/// Parameters of the heading-like test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingHeuristic {
    /// Upper-case text must be shorter than this many characters
    pub max_chars: usize,
    /// Treat heading/title paragraph styles as headings
    pub use_styles: bool,
    /// Treat short upper-case text as a heading
    pub use_text_shape: bool,
}

impl Default for HeadingHeuristic {
    fn default() -> Self {
        Self {
            max_chars: 50,
            use_styles: true,
            use_text_shape: true,
        }
    }
}

/// A named section and the heading texts that introduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Canonical section name, also used as a heading candidate
    pub name: String,

    /// Alternative heading texts
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Keywords that end the section when a block starts with them
    #[serde(default)]
    pub terminators: Vec<String>,
}

impl SectionSpec {
    /// Create a section spec matched by its name only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synonyms: Vec::new(),
            terminators: Vec::new(),
        }
    }

    /// Add alternative heading texts.
    pub fn with_synonyms<S: Into<String>>(mut self, synonyms: impl IntoIterator<Item = S>) -> Self {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Add terminator keywords.
    pub fn with_terminators<S: Into<String>>(
        mut self,
        terminators: impl IntoIterator<Item = S>,
    ) -> Self {
        self.terminators
            .extend(terminators.into_iter().map(Into::into));
        self
    }

    /// Name followed by synonyms.
    pub fn candidates(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.synonyms.iter().map(String::as_str))
            .collect()
    }

    /// The kit contents section, ended by the sections that usually follow it.
    pub fn reagents_provided() -> Self {
        Self::new("Reagents Provided")
            .with_synonyms([
                "Kit Components",
                "Reagents and Materials Provided",
                "Materials Provided",
                "Kit Components/Materials Provided",
            ])
            .with_terminators(["MATERIALS REQUIRED", "STORAGE", "SAMPLE COLLECTION"])
    }
}

/// Datasheet sections looked up by default.
pub fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("Intended Use"),
        SectionSpec::new("Background"),
        SectionSpec::new("Principle of the Assay"),
        SectionSpec::new("Overview"),
        SectionSpec::new("Technical Details"),
        SectionSpec::new("Preparations Before Assay"),
        SectionSpec::reagents_provided(),
        SectionSpec::new("Materials Required")
            .with_synonyms(["Materials Required but Not Provided", "Other Supplies Required"]),
        SectionSpec::new("Storage"),
        SectionSpec::new("Reagent Preparation"),
        SectionSpec::new("Sample Preparation").with_synonyms(["Sample Preparation and Storage"]),
        SectionSpec::new("Sample Collection Notes"),
        SectionSpec::new("Sample Dilution Guideline"),
        SectionSpec::new("Assay Procedure").with_synonyms(["Assay Protocol"]),
        SectionSpec::new("Data Analysis"),
        SectionSpec::new("Procedural Notes"),
    ]
}

/// Options for section extraction and table classification.
///
/// Loadable from a JSON profile; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Sections to extract, in report order
    pub sections: Vec<SectionSpec>,

    /// Terminators applied to every section
    pub terminators: Vec<String>,

    /// Table classification keywords
    pub vocabulary: KeywordVocabulary,

    /// Heading-like test parameters
    pub heading: HeadingHeuristic,

    /// Heading text comparison
    pub match_mode: MatchMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            terminators: Vec::new(),
            vocabulary: KeywordVocabulary::default(),
            heading: HeadingHeuristic::default(),
            match_mode: MatchMode::Exact,
        }
    }
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the section list.
    pub fn with_sections(mut self, sections: Vec<SectionSpec>) -> Self {
        self.sections = sections;
        self
    }

    /// Add a section.
    pub fn with_section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    /// Set global terminators.
    pub fn with_terminators<S: Into<String>>(
        mut self,
        terminators: impl IntoIterator<Item = S>,
    ) -> Self {
        self.terminators = terminators.into_iter().map(Into::into).collect();
        self
    }

    /// Set the classification vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: KeywordVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Set the match mode.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    /// Set the heading length limit.
    pub fn with_max_heading_chars(mut self, max_chars: usize) -> Self {
        self.heading.max_chars = max_chars;
        self
    }

    /// Parse options from a JSON profile.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON profile file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
