//! Markdown rendering for DOCX documents.

use crate::error::Result;
use crate::extract::is_heading_text;
use crate::model::{Block, Document, InlineContent, Paragraph, Table, TableCell, TextRun};

use super::{CleanupPipeline, RenderOptions, RenderResult, RenderStats, TableFallback};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Convert a document to Markdown with statistics.
pub fn to_markdown_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    MarkdownRenderer::new(options.clone()).render_with_stats(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: RenderStats,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: RenderStats::new(),
        }
    }

    /// Render a document to Markdown.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.render_internal(doc)
    }

    /// Render a document to Markdown with statistics.
    pub fn render_with_stats(mut self, doc: &Document) -> Result<RenderResult> {
        let content = self.render_internal(doc)?;
        self.stats.count_text(&content);
        Ok(RenderResult::new(content, doc.metadata.clone(), self.stats))
    }

    fn render_internal(&mut self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&doc.metadata.to_yaml_frontmatter());
        }

        for block in &doc.blocks {
            self.render_block(&mut output, block);
        }

        if let Some(ref cleanup_options) = self.options.cleanup {
            let pipeline = CleanupPipeline::new(cleanup_options.clone())?;
            output = pipeline.process(&output);
        }

        Ok(output.trim().to_string())
    }

    fn render_block(&mut self, output: &mut String, block: &Block) {
        match block {
            Block::Paragraph(p) => self.render_paragraph(output, p),
            Block::Table(t) => self.render_table(output, t),
            Block::Opaque { .. } => {}
        }
    }

    fn heading_level(&self, para: &Paragraph) -> Option<u8> {
        if para.is_heading() {
            return Some(para.heading_level().unwrap_or(1));
        }
        let heuristic = self.options.heading.as_ref()?;
        if heuristic.use_text_shape && is_heading_text(&para.plain_text(), heuristic.max_chars) {
            Some(2)
        } else {
            None
        }
    }

    fn render_paragraph(&mut self, output: &mut String, para: &Paragraph) {
        if para.is_empty() {
            return;
        }

        if let Some(level) = self.heading_level(para) {
            self.stats.heading_count += 1;
            let level = level.min(self.options.max_heading_level);
            output.push_str(&"#".repeat(level as usize));
            output.push(' ');
            output.push_str(self.inline_text(para).trim());
            output.push_str("\n\n");
            return;
        }

        self.stats.paragraph_count += 1;
        output.push_str(self.inline_text(para).trim());
        output.push_str("\n\n");
    }

    fn inline_text(&self, para: &Paragraph) -> String {
        let mut text = String::new();
        for item in &para.content {
            match item {
                InlineContent::Text(run) => text.push_str(&self.render_run(run)),
                InlineContent::Hyperlink { runs, .. } => {
                    for run in runs {
                        text.push_str(&self.render_run(run));
                    }
                }
                InlineContent::Opaque { .. } => {}
            }
        }
        text.replace('\n', "  \n")
    }

    fn render_run(&self, run: &TextRun) -> String {
        let text = if self.options.escape_special_chars {
            escape_markdown(&run.text)
        } else {
            run.text.clone()
        };
        if text.trim().is_empty() {
            return text;
        }

        let rpr = run.properties_xml.as_deref().unwrap_or("");
        let mut result = text;
        if has_toggle(rpr, "w:i") {
            result = format!("*{}*", result);
        }
        if has_toggle(rpr, "w:b") {
            result = format!("**{}**", result);
        }
        if has_toggle(rpr, "w:strike") {
            result = format!("~~{}~~", result);
        }
        result
    }

    fn render_table(&mut self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }
        self.stats.table_count += 1;

        match self.options.table_fallback {
            TableFallback::Markdown => self.render_table_markdown(output, table),
            TableFallback::Html => {
                self.render_table_html(output, table);
                output.push('\n');
            }
        }
    }

    fn render_table_markdown(&self, output: &mut String, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            return;
        }

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for c in 0..col_count {
                let content = row.cells.get(c).map(cell_markdown).unwrap_or_default();
                output.push_str(&format!(" {} |", content));
            }
            output.push('\n');

            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(col_count));
                output.push('\n');
            }
        }

        output.push('\n');
    }

    fn render_table_html(&mut self, output: &mut String, table: &Table) {
        output.push_str("<table>\n");
        for (i, row) in table.rows.iter().enumerate() {
            let tag = if i == 0 { "th" } else { "td" };
            output.push_str("<tr>");
            for cell in &row.cells {
                output.push_str(&format!("<{}>", tag));
                self.render_cell_html(output, cell);
                output.push_str(&format!("</{}>", tag));
            }
            output.push_str("</tr>\n");
        }
        output.push_str("</table>\n");
    }

    fn render_cell_html(&mut self, output: &mut String, cell: &TableCell) {
        let mut first = true;
        for block in &cell.content {
            match block {
                Block::Paragraph(p) => {
                    if p.is_empty() {
                        continue;
                    }
                    if !first {
                        output.push_str("<br>");
                    }
                    output.push_str(&escape_html(p.plain_text().trim()));
                    first = false;
                }
                Block::Table(nested) => {
                    self.stats.table_count += 1;
                    self.render_table_html(output, nested);
                    first = true;
                }
                Block::Opaque { .. } => {}
            }
        }
    }
}

/// Whether a run property toggle (e.g. `w:b`) is switched on in raw `w:rPr` XML.
fn has_toggle(rpr: &str, name: &str) -> bool {
    let empty = format!("<{}/>", name);
    let on = [
        format!("<{} w:val=\"1\"/>", name),
        format!("<{} w:val=\"true\"/>", name),
        format!("<{} w:val=\"on\"/>", name),
    ];
    rpr.contains(&empty) || on.iter().any(|tag| rpr.contains(tag.as_str()))
}

/// Markdown content of a table cell on a single line.
fn cell_markdown(cell: &TableCell) -> String {
    cell.plain_text()
        .lines()
        .map(|line| escape_markdown(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Escape special Markdown characters.
///
/// Only characters that could be misinterpreted as Markdown syntax are
/// escaped, keeping datasheet values such as `<2 pg/ml` readable.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableRow;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link] a|b"), "\\[link\\] a\\|b");
    }

    #[test]
    fn test_render_heading_styles() {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::heading("Assay Procedure", 2));
        doc.add_paragraph(Paragraph::with_text("REAGENTS PROVIDED"));
        doc.add_paragraph(Paragraph::with_text("Wash the plate."));

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert!(result.contains("## Assay Procedure\n\n"));
        assert!(result.contains("## REAGENTS PROVIDED\n\n"));
        assert!(result.ends_with("Wash the plate."));

        let styled_only = RenderOptions::new().without_heading_heuristic();
        let result = to_markdown(&doc, &styled_only).unwrap();
        assert!(result.contains("\n\nREAGENTS PROVIDED\n\n"));
    }

    #[test]
    fn test_render_run_formatting() {
        let mut p = Paragraph::new();
        p.add_run(TextRun::bold("Note:"));
        p.add_text(" keep at 4°C");
        let doc = Document::from_blocks(vec![p.into()]);

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(result, "**Note:** keep at 4°C");
    }

    #[test]
    fn test_render_table_markdown() {
        let mut table = Table::from_rows(vec![vec!["Component", "Qty"], vec!["Plate", "1"]]);
        table.add_row(TableRow::from_strings(["Buffer"]));
        let doc = Document::from_blocks(vec![table.into()]);

        let result = to_markdown(&doc, &RenderOptions::new()).unwrap();
        assert_eq!(
            result,
            "| Component | Qty |\n| --- | --- |\n| Plate | 1 |\n| Buffer |  |"
        );
    }

    #[test]
    fn test_render_table_html_nested() {
        let nested = Table::from_rows(vec![vec!["0.5 ng"]]);
        let mut table = Table::from_rows(vec![vec!["Standard"]]);
        table.add_row(TableRow::new(vec![TableCell::new(vec![Block::Table(nested)])]));
        let doc = Document::from_blocks(vec![table.into()]);

        let options = RenderOptions::new().with_table_fallback(TableFallback::Html);
        let result = to_markdown_with_stats(&doc, &options).unwrap();
        assert!(result.content.starts_with("<table>\n<tr><th>Standard</th></tr>"));
        assert!(result.content.contains("<td><table>\n<tr><th>0.5 ng</th></tr>\n</table>\n</td>"));
        assert_eq!(result.stats.table_count, 2);
    }

    #[test]
    fn test_render_with_frontmatter() {
        let mut doc = Document::new();
        doc.metadata.title = Some("IL-6 Kit".to_string());
        doc.add_paragraph(Paragraph::with_text("Body"));

        let options = RenderOptions::new().with_frontmatter(true);
        let result = to_markdown_with_stats(&doc, &options).unwrap();
        assert!(result.content.starts_with("---\n"));
        assert!(result.content.contains("title:"));
        assert_eq!(result.stats.paragraph_count, 1);
    }
}
