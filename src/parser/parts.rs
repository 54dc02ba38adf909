//! Auxiliary package parts: style sheet and core properties.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;
use crate::model::{Metadata, StyleInfo, StyleSheet};

/// Parse paragraph styles from `word/styles.xml`.
pub(crate) fn parse_styles(xml: &str) -> Result<StyleSheet> {
    let mut reader = Reader::from_str(xml);
    let mut sheet = StyleSheet::default();

    // (style id, info) of the style being read
    let mut current: Option<(String, StyleInfo)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:style" => {
                let kind = e
                    .try_get_attribute("w:type")?
                    .map(|a| a.unescape_value().map(|v| v.into_owned()))
                    .transpose()?;
                let id = e
                    .try_get_attribute("w:styleId")?
                    .map(|a| a.unescape_value().map(|v| v.into_owned()))
                    .transpose()?;
                current = match (kind.as_deref(), id) {
                    (None | Some("paragraph"), Some(id)) => Some((id, StyleInfo::default())),
                    _ => None,
                };
            }
            Event::Empty(e) | Event::Start(e) => {
                let Some((_, info)) = current.as_mut() else {
                    continue;
                };
                match e.name().as_ref() {
                    b"w:name" => {
                        if let Some(attr) = e.try_get_attribute("w:val")? {
                            info.name = attr.unescape_value()?.into_owned();
                        }
                    }
                    b"w:outlineLvl" => {
                        if let Some(attr) = e.try_get_attribute("w:val")? {
                            info.outline_level = attr.unescape_value()?.parse().ok();
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:style" => {
                if let Some((id, info)) = current.take() {
                    sheet.insert(id, info);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(sheet)
}

/// Parse `docProps/core.xml`.
pub(crate) fn parse_core_properties(xml: &str) -> Result<Metadata> {
    let mut reader = Reader::from_str(xml);
    let mut metadata = Metadata::default();
    let mut field: Option<Vec<u8>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => field = Some(e.local_name().as_ref().to_vec()),
            Event::End(_) => field = None,
            Event::Text(t) => {
                let Some(name) = field.as_deref() else {
                    continue;
                };
                let value = t.unescape()?.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match name {
                    b"title" => metadata.title = Some(value),
                    b"creator" => metadata.author = Some(value),
                    b"subject" => metadata.subject = Some(value),
                    b"keywords" => metadata.keywords = Some(value),
                    b"description" => metadata.description = Some(value),
                    b"lastModifiedBy" => metadata.last_modified_by = Some(value),
                    b"created" => metadata.created = parse_w3c_date(&value),
                    b"modified" => metadata.modified = parse_w3c_date(&value),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(metadata)
}

/// Parse a W3CDTF timestamp (e.g. "2023-04-05T10:20:30Z").
fn parse_w3c_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
