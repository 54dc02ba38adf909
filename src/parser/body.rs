//! WordprocessingML body parsing.
//!
//! Every element is first captured as a raw XML string and then parsed on
//! its own. Anything the model does not understand (drawings, fields,
//! content controls, bookmarks) survives as opaque XML in its original place.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::model::{
    Block, InlineContent, PackageSource, Paragraph, ParagraphStyle, StyleSheet, Table, TableCell,
    TableRow, TextRun,
};

/// `w:noBreakHyphen` in run text.
pub(crate) const NON_BREAKING_HYPHEN: char = '\u{2011}';

/// `w:softHyphen` in run text.
pub(crate) const SOFT_HYPHEN: char = '\u{00AD}';

/// Result of parsing the main document part.
pub(crate) struct ParsedBody {
    pub blocks: Vec<Block>,
    pub source: PackageSource,
}

/// Parse `word/document.xml` into blocks plus the raw parts needed to write it back.
pub(crate) fn parse_document_xml(xml: &str) -> Result<ParsedBody> {
    let mut reader = Reader::from_str(xml);
    let mut source = PackageSource::default();

    // Root element
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:document" => {
                source.root_tag = write_start_tag(&e)?;
                break;
            }
            Event::Eof => return Err(Error::Malformed("no w:document element".to_string())),
            _ => {}
        }
    }

    // Everything before the body (e.g. w:background)
    let mut prelude = String::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:body" => break,
            Event::Empty(e) if e.name().as_ref() == b"w:body" => {
                source.prelude = prelude;
                return Ok(ParsedBody {
                    blocks: Vec::new(),
                    source,
                });
            }
            Event::Start(e) => prelude.push_str(&capture(&mut reader, e)?),
            Event::Empty(e) => prelude.push_str(&write_empty_tag(&e)?),
            Event::End(_) | Event::Eof => {
                return Err(Error::Malformed("no w:body element".to_string()))
            }
            _ => {}
        }
    }
    source.prelude = prelude;

    let mut blocks = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                let raw = capture(&mut reader, e)?;
                push_body_element(&name, raw, &mut blocks, &mut source)?;
            }
            Event::Empty(e) => {
                let name = e.name().as_ref().to_vec();
                let raw = write_empty_tag(&e)?;
                push_body_element(&name, raw, &mut blocks, &mut source)?;
            }
            Event::End(e) if e.name().as_ref() == b"w:body" => break,
            Event::Eof => return Err(Error::Malformed("unterminated w:body".to_string())),
            _ => {}
        }
    }

    Ok(ParsedBody { blocks, source })
}

fn push_body_element(
    name: &[u8],
    raw: String,
    blocks: &mut Vec<Block>,
    source: &mut PackageSource,
) -> Result<()> {
    match name {
        b"w:p" => blocks.push(Block::Paragraph(parse_paragraph(&raw)?)),
        b"w:tbl" => blocks.push(Block::Table(parse_table(&raw)?)),
        b"w:sectPr" => source.section_xml = Some(raw),
        other => {
            let name = String::from_utf8_lossy(other).into_owned();
            log::debug!("Keeping <{}> at block {} as raw XML", name, blocks.len());
            blocks.push(Block::Opaque { name, xml: raw });
        }
    }
    Ok(())
}

/// Parse a captured `w:p` element.
pub(crate) fn parse_paragraph(raw: &str) -> Result<Paragraph> {
    let mut paragraph = Paragraph::new();
    for child in children(raw)? {
        match child.name.as_str() {
            "w:pPr" => {
                let (style_id, outline) = paragraph_properties(&child.xml)?;
                paragraph.style = ParagraphStyle {
                    style_id,
                    style_name: None,
                    heading_level: outline,
                    properties_xml: Some(child.xml),
                };
            }
            "w:r" => paragraph.content.extend(parse_run(&child.xml)?),
            "w:hyperlink" => paragraph.content.push(parse_hyperlink(&child.xml)?),
            _ => paragraph.content.push(InlineContent::Opaque { xml: child.xml }),
        }
    }
    Ok(paragraph)
}

/// Style id and outline level from a `w:pPr` element.
fn paragraph_properties(raw: &str) -> Result<(Option<String>, Option<u8>)> {
    let mut reader = Reader::from_str(raw);
    let mut style_id = None;
    let mut outline = None;
    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) => match e.name().as_ref() {
                b"w:pStyle" => style_id = attribute(&e, "w:val")?,
                b"w:outlineLvl" => {
                    outline = attribute(&e, "w:val")?
                        .and_then(|v| v.parse::<u8>().ok())
                        .filter(|l| *l < 9)
                        .map(|l| l + 1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((style_id, outline))
}

/// Parse a `w:r` into inline content.
///
/// Text, tabs, line breaks and hyphen marks become text runs. Any other child
/// (drawings, field characters, page breaks, symbols) splits the run and is
/// kept as its own opaque run carrying the same `w:rPr`. A run without any
/// text stays a single opaque item with its original XML.
fn parse_run(raw: &str) -> Result<Vec<InlineContent>> {
    let mut properties: Option<String> = None;
    let mut items = Vec::new();
    let mut text = String::new();
    let mut has_text = false;

    for child in children(raw)? {
        match child.name.as_str() {
            "w:rPr" => properties = Some(child.xml),
            "w:t" => {
                has_text = true;
                text.push_str(&element_text(&child.xml)?);
            }
            "w:tab" => text.push('\t'),
            "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push(NON_BREAKING_HYPHEN),
            "w:softHyphen" => text.push(SOFT_HYPHEN),
            "w:lastRenderedPageBreak" => {}
            "w:br" if is_line_break(&child.xml)? => text.push('\n'),
            _ => {
                if !text.is_empty() {
                    has_text = true;
                    items.push(text_run(std::mem::take(&mut text), &properties));
                }
                let mut xml = String::from("<w:r>");
                xml.push_str(properties.as_deref().unwrap_or(""));
                xml.push_str(&child.xml);
                xml.push_str("</w:r>");
                items.push(InlineContent::Opaque { xml });
            }
        }
    }

    has_text |= !text.is_empty();
    if !has_text {
        return Ok(vec![InlineContent::Opaque {
            xml: raw.to_string(),
        }]);
    }
    if !text.is_empty() || items.is_empty() {
        items.push(text_run(text, &properties));
    }
    Ok(items)
}

fn text_run(text: String, properties: &Option<String>) -> InlineContent {
    InlineContent::Text(TextRun {
        text,
        properties_xml: properties.clone(),
    })
}

/// Whether a `w:br` is a plain line break rather than a page or column break.
fn is_line_break(raw: &str) -> Result<bool> {
    let mut reader = Reader::from_str(raw);
    let kind = match reader.read_event()? {
        Event::Empty(e) | Event::Start(e) => attribute(&e, "w:type")?,
        _ => None,
    };
    Ok(matches!(kind.as_deref(), None | Some("textWrapping")))
}

/// Parse a `w:hyperlink`. Links holding anything but plain runs stay opaque.
fn parse_hyperlink(raw: &str) -> Result<InlineContent> {
    let mut reader = Reader::from_str(raw);
    let mut attributes = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                for attr in e.attributes() {
                    let attr = attr?;
                    attributes.push((
                        String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                        attr.unescape_value()?.into_owned(),
                    ));
                }
                break;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut runs = Vec::new();
    for child in children(raw)? {
        let items = match child.name.as_str() {
            "w:r" => parse_run(&child.xml)?,
            _ => Vec::new(),
        };
        if items.is_empty() {
            return Ok(InlineContent::Opaque {
                xml: raw.to_string(),
            });
        }
        for item in items {
            match item {
                InlineContent::Text(run) => runs.push(run),
                _ => {
                    return Ok(InlineContent::Opaque {
                        xml: raw.to_string(),
                    })
                }
            }
        }
    }

    Ok(InlineContent::Hyperlink { attributes, runs })
}

/// Parse a captured `w:tbl` element.
///
/// Children the model does not interpret are kept as raw XML next to the
/// row or cell they precede.
pub(crate) fn parse_table(raw: &str) -> Result<Table> {
    let mut table = Table::new();
    let mut pending = String::new();
    for child in children(raw)? {
        match child.name.as_str() {
            "w:tblPr" => table.properties_xml = Some(child.xml),
            "w:tblGrid" => table.grid_xml = Some(child.xml),
            "w:tr" => {
                let mut row = parse_row(&child.xml)?;
                row.leading_xml = take_pending(&mut pending);
                table.add_row(row);
            }
            other => {
                log::debug!("Keeping <{}> inside table as raw XML", other);
                pending.push_str(&child.xml);
            }
        }
    }
    table.trailing_xml = take_pending(&mut pending);
    Ok(table)
}

fn parse_row(raw: &str) -> Result<TableRow> {
    let mut row = TableRow::default();
    let mut pending = String::new();
    for child in children(raw)? {
        match child.name.as_str() {
            "w:tblPrEx" => row.exceptions_xml = Some(child.xml),
            "w:trPr" => row.properties_xml = Some(child.xml),
            "w:tc" => {
                let mut cell = parse_cell(&child.xml)?;
                cell.leading_xml = take_pending(&mut pending);
                row.cells.push(cell);
            }
            other => {
                log::debug!("Keeping <{}> inside table row as raw XML", other);
                pending.push_str(&child.xml);
            }
        }
    }
    row.trailing_xml = take_pending(&mut pending);
    Ok(row)
}

fn parse_cell(raw: &str) -> Result<TableCell> {
    let mut cell = TableCell::default();
    for child in children(raw)? {
        match child.name.as_str() {
            "w:tcPr" => cell.properties_xml = Some(child.xml),
            "w:p" => cell.content.push(Block::Paragraph(parse_paragraph(&child.xml)?)),
            "w:tbl" => cell.content.push(Block::Table(parse_table(&child.xml)?)),
            _ => cell.content.push(Block::Opaque {
                name: child.name,
                xml: child.xml,
            }),
        }
    }
    Ok(cell)
}

fn take_pending(pending: &mut String) -> Option<String> {
    if pending.is_empty() {
        None
    } else {
        Some(std::mem::take(pending))
    }
}

/// Fill style names and heading levels from the style sheet.
pub(crate) fn apply_styles(blocks: &mut [Block], styles: &StyleSheet) {
    for block in blocks {
        block.for_each_paragraph_mut(&mut |p| {
            let Some(id) = p.style.style_id.as_deref() else {
                return;
            };
            if let Some(info) = styles.get(id) {
                p.style.style_name = Some(info.name.clone());
                if p.style.heading_level.is_none() {
                    p.style.heading_level = info.heading_level();
                }
            }
        });
    }
}

/// A direct child element with its raw XML.
struct Child {
    name: String,
    xml: String,
}

/// Direct children of the root element in `raw`.
fn children(raw: &str) -> Result<Vec<Child>> {
    let mut reader = Reader::from_str(raw);
    let mut out = Vec::new();

    // Skip to the root start tag
    loop {
        match reader.read_event()? {
            Event::Start(_) => break,
            Event::Empty(_) | Event::Eof => return Ok(out),
            _ => {}
        }
    }

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let xml = capture(&mut reader, e)?;
                out.push(Child { name, xml });
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let xml = write_empty_tag(&e)?;
                out.push(Child { name, xml });
            }
            Event::End(_) | Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

/// Unescaped text content of a simple element such as `w:t`.
fn element_text(raw: &str) -> Result<String> {
    let mut reader = Reader::from_str(raw);
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match e.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

enum Depth {
    Open,
    Close,
    Same,
}

/// Copy the element opened by `start` (already consumed) up to its end tag.
pub(crate) fn capture(reader: &mut Reader<&[u8]>, start: BytesStart<'_>) -> Result<String> {
    let name = start.name().as_ref().to_vec();
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(start))?;

    let mut depth = 0usize;
    loop {
        let event = reader.read_event()?;
        let step = match &event {
            Event::Start(e) if e.name().as_ref() == name.as_slice() => Depth::Open,
            Event::End(e) if e.name().as_ref() == name.as_slice() => Depth::Close,
            Event::Eof => {
                return Err(Error::Malformed(format!(
                    "unterminated <{}>",
                    String::from_utf8_lossy(&name)
                )))
            }
            _ => Depth::Same,
        };
        writer.write_event(event)?;
        match step {
            Depth::Open => depth += 1,
            Depth::Close if depth == 0 => break,
            Depth::Close => depth -= 1,
            Depth::Same => {}
        }
    }

    into_string(writer.into_inner())
}

fn write_start_tag(e: &BytesStart<'_>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(e.borrow()))?;
    into_string(writer.into_inner())
}

fn write_empty_tag(e: &BytesStart<'_>) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Empty(e.borrow()))?;
    into_string(writer.into_inner())
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}</w:body></w:document>"#,
            NS, body
        )
    }

    #[test]
    fn test_parse_paragraphs_and_table() {
        let xml = document(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>REAGENTS PROVIDED</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#
        ));

        let parsed = parse_document_xml(&xml).unwrap();
        assert_eq!(parsed.blocks.len(), 2);

        let heading = parsed.blocks[0].as_paragraph().unwrap();
        assert_eq!(heading.plain_text(), "REAGENTS PROVIDED");
        assert_eq!(heading.style.style_id.as_deref(), Some("Heading1"));

        let table = parsed.blocks[1].as_table().unwrap();
        assert_eq!(table.rows_text(), vec![vec!["A", "B"]]);
        assert!(table.properties_xml.is_some());

        assert!(parsed.source.root_tag.starts_with("<w:document"));
        assert!(parsed.source.section_xml.unwrap().contains("w:pgSz"));
    }

    #[test]
    fn test_run_text_tabs_and_breaks() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Kit </w:t><w:tab/><w:t>A &amp; B</w:t><w:br/><w:t>end</w:t></w:r></w:p>"#,
        )
        .unwrap();

        assert_eq!(p.plain_text(), "Kit \tA & B\nend");
        let run = p.runs().next().unwrap();
        assert_eq!(run.properties_xml.as_deref(), Some("<w:rPr><w:b/></w:rPr>"));
    }

    #[test]
    fn test_drawing_run_is_opaque() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:drawing><wp:inline/></w:drawing></w:r><w:r><w:t>caption</w:t></w:r></w:p>"#,
        )
        .unwrap();

        assert!(matches!(p.content[0], InlineContent::Opaque { .. }));
        assert_eq!(p.plain_text(), "caption");
    }

    #[test]
    fn test_page_break_run_is_opaque() {
        let p = parse_paragraph(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#).unwrap();
        assert!(matches!(p.content[0], InlineContent::Opaque { .. }));
    }

    #[test]
    fn test_hyphen_marks_stay_in_text() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:t>Human IL</w:t><w:noBreakHyphen/><w:t>6 ELISA Kit by Boster</w:t></w:r></w:p>"#,
        )
        .unwrap();

        assert_eq!(p.content.len(), 1);
        assert_eq!(p.plain_text(), "Human IL\u{2011}6 ELISA Kit by Boster");

        let p = parse_paragraph(r#"<w:p><w:r><w:t>Immuno</w:t><w:softHyphen/><w:t>assay</w:t></w:r></w:p>"#)
            .unwrap();
        assert_eq!(p.plain_text(), "Immuno\u{00AD}assay");
    }

    #[test]
    fn test_run_split_around_symbol() {
        let p = parse_paragraph(concat!(
            r#"<w:p><w:r><w:rPr><w:i/></w:rPr><w:t>Boster</w:t>"#,
            r#"<w:sym w:font="Symbol" w:char="F0D2"/><w:t xml:space="preserve"> PicoKine</w:t></w:r></w:p>"#
        ))
        .unwrap();

        assert_eq!(p.content.len(), 3);
        assert_eq!(p.plain_text(), "Boster PicoKine");
        match &p.content[1] {
            InlineContent::Opaque { xml } => assert_eq!(
                xml,
                r#"<w:r><w:rPr><w:i/></w:rPr><w:sym w:font="Symbol" w:char="F0D2"/></w:r>"#
            ),
            other => panic!("expected opaque run, got {:?}", other),
        }
        let runs: Vec<_> = p.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].properties_xml.as_deref(), Some("<w:rPr><w:i/></w:rPr>"));
    }

    #[test]
    fn test_body_content_controls_and_bookmarks_kept() {
        let xml = document(concat!(
            r#"<w:sdt><w:sdtContent><w:p><w:r><w:t>Contents</w:t></w:r></w:p></w:sdtContent></w:sdt>"#,
            r#"<w:bookmarkStart w:id="0" w:name="intro"/>"#,
            r#"<w:p><w:r><w:t>INTENDED USE</w:t></w:r></w:p>"#,
            r#"<w:bookmarkEnd w:id="0"/>"#
        ));

        let parsed = parse_document_xml(&xml).unwrap();
        let kinds: Vec<_> = parsed.blocks.iter().map(Block::kind).collect();
        assert_eq!(kinds, vec!["opaque", "opaque", "paragraph", "opaque"]);
        match &parsed.blocks[0] {
            Block::Opaque { name, xml } => {
                assert_eq!(name, "w:sdt");
                assert!(xml.contains("Contents"));
            }
            other => panic!("expected opaque block, got {:?}", other),
        }
    }

    #[test]
    fn test_table_keeps_uninterpreted_children() {
        let t = parse_table(concat!(
            r#"<w:tbl><w:bookmarkStart w:id="1" w:name="t"/><w:tr><w:tblPrEx><w:jc w:val="center"/></w:tblPrEx>"#,
            r#"<w:customXml w:element="x"/><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p>"#,
            r#"<w:sdt><w:sdtContent><w:p/></w:sdtContent></w:sdt></w:tc></w:tr><w:bookmarkEnd w:id="1"/></w:tbl>"#
        ))
        .unwrap();

        let row = &t.rows[0];
        assert_eq!(row.leading_xml.as_deref(), Some(r#"<w:bookmarkStart w:id="1" w:name="t"/>"#));
        assert!(row.exceptions_xml.as_deref().unwrap().contains("w:jc"));
        assert_eq!(row.cells[0].leading_xml.as_deref(), Some(r#"<w:customXml w:element="x"/>"#));
        assert!(row.cells[0].content[1].is_opaque());
        assert_eq!(t.rows_text(), vec![vec!["A"]]);
        assert_eq!(t.trailing_xml.as_deref(), Some(r#"<w:bookmarkEnd w:id="1"/>"#));
    }

    #[test]
    fn test_hyperlink_runs() {
        let p = parse_paragraph(
            r#"<w:p><w:hyperlink r:id="rId7" w:history="1"><w:r><w:t>Boster Bio</w:t></w:r></w:hyperlink></w:p>"#,
        )
        .unwrap();

        match &p.content[0] {
            InlineContent::Hyperlink { attributes, runs } => {
                assert_eq!(attributes[0], ("r:id".to_string(), "rId7".to_string()));
                assert_eq!(runs[0].text, "Boster Bio");
            }
            other => panic!("expected hyperlink, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_table_in_cell() {
        let t = parse_table(concat!(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>outer</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p/></w:tc></w:tr></w:tbl>"#
        ))
        .unwrap();

        let cell = &t.rows[0].cells[0];
        assert_eq!(cell.content.len(), 3);
        assert!(cell.content[1].is_table());
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn test_outline_level_in_paragraph_properties() {
        let p = parse_paragraph(
            r#"<w:p><w:pPr><w:outlineLvl w:val="1"/></w:pPr><w:r><w:t>Overview</w:t></w:r></w:p>"#,
        )
        .unwrap();
        assert_eq!(p.heading_level(), Some(2));
    }

    #[test]
    fn test_apply_styles() {
        let mut blocks = vec![Block::Paragraph(Paragraph::styled("Storage", "Heading2"))];
        let mut sheet = StyleSheet::default();
        sheet.insert(
            "Heading2",
            crate::model::StyleInfo {
                name: "heading 2".to_string(),
                outline_level: Some(1),
            },
        );

        apply_styles(&mut blocks, &sheet);
        let p = blocks[0].as_paragraph().unwrap();
        assert_eq!(p.style.style_name.as_deref(), Some("heading 2"));
        assert_eq!(p.heading_level(), Some(2));
    }

    #[test]
    fn test_missing_body_is_malformed() {
        let xml = format!("<w:document {}></w:document>", NS);
        assert!(matches!(
            parse_document_xml(&xml),
            Err(Error::Malformed(_))
        ));
    }
}
