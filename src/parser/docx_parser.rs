//! DOCX package reader using zip and quick-xml.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::detect::{detect_format_from_bytes, DocxFormat};
use crate::error::{Error, Result};
use crate::model::Document;

use super::body::{apply_styles, parse_document_xml};
use super::options::{ErrorMode, ParseOptions};
use super::parts::{parse_core_properties, parse_styles};

const STYLES_PART: &str = "word/styles.xml";
const CORE_PART: &str = "docProps/core.xml";

/// DOCX document parser.
pub struct DocxParser {
    data: Vec<u8>,
    format: DocxFormat,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a DOCX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", data.len(), path.display());
        Self::from_bytes_with_options(data, options)
    }

    /// Parse a DOCX from bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a DOCX from bytes with custom options.
    pub fn from_bytes_with_options(data: impl Into<Vec<u8>>, options: ParseOptions) -> Result<Self> {
        let data = data.into();
        let format = detect_format_from_bytes(&data)?;
        Ok(Self {
            data,
            format,
            options,
        })
    }

    /// Parse a DOCX from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a DOCX from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Detected package format.
    pub fn format(&self) -> &DocxFormat {
        &self.format
    }

    /// Parse the package and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))?;

        let main = read_entry(&mut archive, &self.format.main_part)?
            .ok_or_else(|| Error::MissingPart(self.format.main_part.clone()))?;
        let parsed = parse_document_xml(&main)?;

        let mut document = Document::from_blocks(parsed.blocks);

        if self.options.read_styles {
            document.styles = self.read_part(&mut archive, STYLES_PART, parse_styles)?;
            apply_styles(&mut document.blocks, &document.styles);
        }
        if self.options.read_metadata {
            document.metadata = self.read_part(&mut archive, CORE_PART, parse_core_properties)?;
        }

        let mut source = parsed.source;
        source.bytes = self.data.clone();
        source.main_part = self.format.main_part.clone();
        document.source = Some(source);

        log::info!(
            "Parsed {} blocks ({} tables, {} styles)",
            document.block_count(),
            document.tables().count(),
            document.styles.len()
        );

        Ok(document)
    }

    /// Read an optional part; parse failures follow the error mode.
    fn read_part<T: Default>(
        &self,
        archive: &mut ZipArchive<Cursor<&[u8]>>,
        name: &str,
        parse: fn(&str) -> Result<T>,
    ) -> Result<T> {
        let Some(xml) = read_entry(archive, name)? else {
            log::debug!("Package has no {}", name);
            return Ok(T::default());
        };
        match parse(&xml) {
            Ok(value) => Ok(value),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping unreadable {}: {}", name, e);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }
}

/// Read a zip entry as UTF-8 text; `None` if absent.
pub(crate) fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(Some(xml))
}
