//! Plain text rendering for DOCX documents.

use crate::error::Result;
use crate::model::Document;

use super::{CleanupPipeline, RenderOptions};

/// Convert a document to plain text.
///
/// One line per paragraph; table rows become lines of tab-separated cells.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();
    if options.include_frontmatter {
        output.push_str(&doc.metadata.to_yaml_frontmatter());
    }
    output.push_str(&doc.plain_text());

    if let Some(ref cleanup_options) = options.cleanup {
        let pipeline = CleanupPipeline::new(cleanup_options.clone())?;
        output = pipeline.process(&output);
    }

    Ok(output.trim().to_string())
}
