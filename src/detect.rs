//! DOCX format detection and validation.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// Flavour of WordprocessingML package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocxVariant {
    /// Plain document (`.docx`)
    Document,
    /// Macro-enabled document (`.docm`)
    MacroEnabled,
    /// Template (`.dotx` / `.dotm`)
    Template,
}

/// DOCX format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Package flavour
    pub variant: DocxVariant,
    /// Zip entry name of the main document part (e.g. "word/document.xml")
    pub main_part: String,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.variant {
            DocxVariant::Document => "DOCX",
            DocxVariant::MacroEnabled => "DOCM",
            DocxVariant::Template => "DOTX",
        };
        write!(f, "{} ({})", name, self.main_part)
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Default location of the main part.
pub(crate) const DEFAULT_MAIN_PART: &str = "word/document.xml";

const CONTENT_TYPES: &str = "[Content_Types].xml";

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use kitdoc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("datasheet.docx").unwrap();
/// println!("Main part: {}", format.main_part);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let data = std::fs::read(path)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from the complete package bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a WordprocessingML package
/// * `Err(Error::UnknownFormat)` if the data is not a zip package
/// * `Err(Error::MissingPart)` if the package has no main document part
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !has_zip_magic(data) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let content_types = match archive.by_name(CONTENT_TYPES) {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry.read_to_string(&mut xml)?;
            Some(xml)
        }
        Err(_) => None,
    };

    if let Some(xml) = content_types {
        if let Some(format) = main_part_from_content_types(&xml)? {
            return Ok(format);
        }
    }

    if archive.by_name(DEFAULT_MAIN_PART).is_ok() {
        return Ok(DocxFormat {
            variant: DocxVariant::Document,
            main_part: DEFAULT_MAIN_PART.to_string(),
        });
    }

    Err(Error::MissingPart(DEFAULT_MAIN_PART.to_string()))
}

/// Find the main document override in `[Content_Types].xml`.
fn main_part_from_content_types(xml: &str) -> Result<Option<DocxFormat>> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Override" => {
                let content_type = match e.try_get_attribute("ContentType")? {
                    Some(attr) => attr.unescape_value()?.into_owned(),
                    None => continue,
                };
                let Some(variant) = variant_for_content_type(&content_type) else {
                    continue;
                };
                if let Some(attr) = e.try_get_attribute("PartName")? {
                    let part = attr.unescape_value()?;
                    return Ok(Some(DocxFormat {
                        variant,
                        main_part: part.trim_start_matches('/').to_string(),
                    }));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn variant_for_content_type(content_type: &str) -> Option<DocxVariant> {
    match content_type {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml" => {
            Some(DocxVariant::Document)
        }
        "application/vnd.ms-word.document.macroEnabled.main+xml" => {
            Some(DocxVariant::MacroEnabled)
        }
        "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml"
        | "application/vnd.ms-word.template.macroEnabledTemplate.main+xml" => {
            Some(DocxVariant::Template)
        }
        _ => None,
    }
}

/// Check for the zip header.
pub fn has_zip_magic(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
