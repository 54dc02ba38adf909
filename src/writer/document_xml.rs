//! WordprocessingML generation for `word/document.xml`.

use quick_xml::escape::escape;

use crate::model::{Block, Document, InlineContent, Paragraph, Table, TableCell, TextRun};
use crate::parser::{NON_BREAKING_HYPHEN, SOFT_HYPHEN};

const DEFAULT_ROOT: &str = concat!(
    r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
);

const DEFAULT_SECTION: &str = concat!(
    r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
    r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>"#,
    r#"</w:sectPr>"#
);

/// Usable text width of a Letter page with 1" margins, in twips.
const TEXT_WIDTH_TWIPS: usize = 9360;

const BORDER_EDGES: [&str; 6] = ["top", "left", "bottom", "right", "insideH", "insideV"];

/// Serialize the document body to a complete `document.xml`.
pub(crate) fn document_xml(doc: &Document) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");

    match &doc.source {
        Some(source) if !source.root_tag.is_empty() => {
            out.push_str(&source.root_tag);
            out.push_str(&source.prelude);
        }
        _ => out.push_str(DEFAULT_ROOT),
    }

    out.push_str("<w:body>");
    for block in &doc.blocks {
        write_block(&mut out, block);
    }
    match doc.source.as_ref().and_then(|s| s.section_xml.as_deref()) {
        Some(section) => out.push_str(section),
        None => out.push_str(DEFAULT_SECTION),
    }
    out.push_str("</w:body></w:document>");
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(p) => write_paragraph(out, p),
        Block::Table(t) => write_table(out, t),
        Block::Opaque { xml, .. } => out.push_str(xml),
    }
}

fn write_paragraph(out: &mut String, p: &Paragraph) {
    out.push_str("<w:p>");
    if let Some(ref raw) = p.style.properties_xml {
        out.push_str(raw);
    } else if let Some(ref id) = p.style.style_id {
        out.push_str("<w:pPr><w:pStyle w:val=\"");
        out.push_str(&escape(id.as_str()));
        out.push_str("\"/></w:pPr>");
    }

    for item in &p.content {
        match item {
            InlineContent::Text(run) => write_run(out, run),
            InlineContent::Hyperlink { attributes, runs } => {
                out.push_str("<w:hyperlink");
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }
                out.push('>');
                for run in runs {
                    write_run(out, run);
                }
                out.push_str("</w:hyperlink>");
            }
            InlineContent::Opaque { xml } => out.push_str(xml),
        }
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &TextRun) {
    out.push_str("<w:r>");
    if let Some(ref raw) = run.properties_xml {
        out.push_str(raw);
    }

    let mut segment = String::new();
    for ch in run.text.chars() {
        match ch {
            '\t' | '\n' | NON_BREAKING_HYPHEN | SOFT_HYPHEN => {
                flush_text(out, &mut segment);
                out.push_str(match ch {
                    '\t' => "<w:tab/>",
                    '\n' => "<w:br/>",
                    NON_BREAKING_HYPHEN => "<w:noBreakHyphen/>",
                    _ => "<w:softHyphen/>",
                });
            }
            _ => segment.push(ch),
        }
    }
    flush_text(out, &mut segment);
    out.push_str("</w:r>");
}

fn flush_text(out: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    out.push_str("<w:t xml:space=\"preserve\">");
    out.push_str(&escape(segment.as_str()));
    out.push_str("</w:t>");
    segment.clear();
}

fn write_table(out: &mut String, table: &Table) {
    let columns = table.column_count().max(1);
    let col_width = TEXT_WIDTH_TWIPS / columns;

    out.push_str("<w:tbl>");
    match table.properties_xml {
        Some(ref raw) => out.push_str(raw),
        None => write_default_table_properties(out),
    }
    match table.grid_xml {
        Some(ref raw) => out.push_str(raw),
        None => {
            out.push_str("<w:tblGrid>");
            for _ in 0..columns {
                out.push_str(&format!("<w:gridCol w:w=\"{}\"/>", col_width));
            }
            out.push_str("</w:tblGrid>");
        }
    }

    for row in &table.rows {
        push_raw(out, &row.leading_xml);
        out.push_str("<w:tr>");
        push_raw(out, &row.exceptions_xml);
        push_raw(out, &row.properties_xml);
        for cell in &row.cells {
            write_cell(out, cell, col_width);
        }
        push_raw(out, &row.trailing_xml);
        out.push_str("</w:tr>");
    }
    push_raw(out, &table.trailing_xml);
    out.push_str("</w:tbl>");
}

fn write_default_table_properties(out: &mut String) {
    out.push_str("<w:tblPr><w:tblStyle w:val=\"TableGrid\"/><w:tblW w:w=\"0\" w:type=\"auto\"/>");
    out.push_str("<w:tblBorders>");
    for edge in BORDER_EDGES {
        out.push_str(&format!(
            "<w:{} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
            edge
        ));
    }
    out.push_str("</w:tblBorders><w:tblLook w:val=\"04A0\"/></w:tblPr>");
}

fn push_raw(out: &mut String, raw: &Option<String>) {
    if let Some(raw) = raw {
        out.push_str(raw);
    }
}

fn write_cell(out: &mut String, cell: &TableCell, col_width: usize) {
    push_raw(out, &cell.leading_xml);
    out.push_str("<w:tc>");
    match cell.properties_xml {
        Some(ref raw) => out.push_str(raw),
        None => out.push_str(&format!(
            "<w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/></w:tcPr>",
            col_width
        )),
    }
    for block in &cell.content {
        write_block(out, block);
    }
    // A cell must end with a paragraph; content controls are assumed to hold one
    let needs_paragraph = match cell.content.iter().rev().find(|b| !b.is_opaque()) {
        Some(Block::Table(_)) => true,
        Some(_) => false,
        None => cell.content.is_empty(),
    };
    if needs_paragraph {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}
