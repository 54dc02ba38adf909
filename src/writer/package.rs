//! DOCX package assembly.

use std::io::{Cursor, Write};

use chrono::Utc;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::detect::DEFAULT_MAIN_PART;
use crate::error::Result;
use crate::model::{Document, Metadata};

use super::document_xml::document_xml;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Serialize a document to DOCX bytes.
///
/// Documents read from a package reuse every entry of that package except
/// the main part, which is regenerated from the blocks.
pub(crate) fn package_bytes(doc: &Document) -> Result<Vec<u8>> {
    let body = document_xml(doc);
    match &doc.source {
        Some(source) if !source.bytes.is_empty() => {
            rewrite_package(&source.bytes, &source.main_part, &body)
        }
        _ => new_package(&doc.metadata, &body),
    }
}

fn rewrite_package(original: &[u8], main_part: &str, body: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(original))?;
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.name() == main_part {
            drop(entry);
            zip.start_file(main_part, deflated())?;
            zip.write_all(body.as_bytes())?;
        } else {
            zip.raw_copy_file(entry)?;
        }
    }

    Ok(zip.finish()?.into_inner())
}

fn new_package(metadata: &Metadata, body: &str) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: [(&str, String); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        (DEFAULT_MAIN_PART, body.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", styles_xml()),
        ("docProps/core.xml", core_xml(metadata)),
    ];
    for (name, content) in parts {
        zip.start_file(name, deflated())?;
        zip.write_all(content.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

/// Minimal style sheet: Normal, Title, three heading levels and a bordered table style.
fn styles_xml() -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style>"#,
    ));
    for (level, size) in [(1u8, 32u8), (2, 28), (3, 24)] {
        xml.push_str(&format!(
            concat!(
                r#"<w:style w:type="paragraph" w:styleId="Heading{0}"><w:name w:val="heading {0}"/>"#,
                r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
                r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="{1}"/></w:pPr>"#,
                r#"<w:rPr><w:b/><w:sz w:val="{2}"/></w:rPr></w:style>"#
            ),
            level,
            level - 1,
            size
        ));
    }
    xml.push_str(concat!(
        r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders>"#,
        r#"<w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"<w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
        r#"</w:tblBorders></w:tblPr></w:style></w:styles>"#
    ));
    xml
}

fn core_xml(metadata: &Metadata) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));

    let fields = [
        ("dc:title", &metadata.title),
        ("dc:subject", &metadata.subject),
        ("dc:creator", &metadata.author),
        ("cp:keywords", &metadata.keywords),
        ("dc:description", &metadata.description),
        ("cp:lastModifiedBy", &metadata.last_modified_by),
    ];
    for (tag, value) in fields {
        if let Some(value) = value {
            xml.push_str(&format!("<{0}>{1}</{0}>", tag, escape(value.as_str())));
        }
    }

    let now = Utc::now();
    let created = metadata.created.unwrap_or(now);
    let modified = metadata.modified.unwrap_or(now);
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        created.format("%Y-%m-%dT%H:%M:%SZ")
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        modified.format("%Y-%m-%dT%H:%M:%SZ")
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}
