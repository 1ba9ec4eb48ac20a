use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use super::ExtractorError;

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Raw text of the document body, one entry per paragraph. Table cells are read
/// row by row, left to right.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractorError> {
    let docx = read_docx(bytes).map_err(|e| ExtractorError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => paragraphs.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => table_paragraphs(table, &mut paragraphs),
            _ => {}
        }
    }

    Ok(paragraphs.join(PARAGRAPH_SEPARATOR))
}

fn table_paragraphs(table: &Table, out: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => out.push(paragraph_text(paragraph)),
                    TableCellContent::Table(nested) => table_paragraphs(nested, out),
                    _ => {}
                }
            }
        }
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}
