//! Renders generated report text into a Word artifact.
//!
//! The markdown blocks from [`super::markdown`] map onto docx paragraphs
//! under a fixed document title, with 맑은 고딕 body styling matching the
//! report template the tool replaces.

use std::fs;
use std::path::Path;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Run, RunFonts, Start, Table, TableCell, TableRow,
};

use super::markdown::{parse, Block, Span};
use crate::core::errors::ApiError;

const DOCUMENT_TITLE: &str = "장애보고서";
const BODY_FONT: &str = "맑은 고딕";

/// docx sizes are half-points: 22 = 11pt body, 32 = 16pt level-1 heading.
const TITLE_SIZE: usize = 36;
const BODY_SIZE: usize = 22;
const BOLD_LINE_SIZE: usize = 24;

const BULLET_NUMBERING: usize = 1;
const DECIMAL_NUMBERING: usize = 2;

pub fn render_to_path(report_text: &str, path: &Path) -> Result<(), ApiError> {
    let file = fs::File::create(path)
        .map_err(|e| ApiError::internal(format!("Failed to create report file: {}", e)))?;

    build_document(report_text)
        .build()
        .pack(file)
        .map_err(|e| ApiError::internal(format!("Failed to write report document: {}", e)))?;

    Ok(())
}

fn build_document(report_text: &str) -> Docx {
    let mut docx = Docx::new()
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("•"),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
        .add_abstract_numbering(AbstractNumbering::new(DECIMAL_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("decimal"),
            LevelText::new("%1."),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(DECIMAL_NUMBERING, DECIMAL_NUMBERING));

    docx = docx.add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(body_run(DOCUMENT_TITLE, true).size(TITLE_SIZE)),
    );

    for block in parse(report_text) {
        docx = match block {
            Block::Heading { level, text } => docx.add_paragraph(
                Paragraph::new().add_run(body_run(&text, true).size(heading_size(level))),
            ),
            Block::Bullet(spans) => docx.add_paragraph(
                span_paragraph(&spans)
                    .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0)),
            ),
            Block::Numbered(spans) => docx.add_paragraph(
                span_paragraph(&spans)
                    .numbering(NumberingId::new(DECIMAL_NUMBERING), IndentLevel::new(0)),
            ),
            Block::BoldLine(text) => docx.add_paragraph(
                Paragraph::new().add_run(body_run(&text, true).size(BOLD_LINE_SIZE)),
            ),
            Block::Paragraph(spans) => docx.add_paragraph(span_paragraph(&spans)),
            Block::Table { headers, rows } => docx.add_table(build_table(&headers, &rows)),
            Block::Blank => docx.add_paragraph(Paragraph::new()),
        };
    }

    docx
}

fn heading_size(level: u8) -> usize {
    match level {
        1 => 32,
        2 => 28,
        3 => 26,
        _ => 24,
    }
}

fn body_run(text: &str, bold: bool) -> Run {
    let mut run = Run::new()
        .add_text(text)
        .size(BODY_SIZE)
        .fonts(RunFonts::new().east_asia(BODY_FONT));
    if bold {
        run = run.bold();
    }
    run
}

fn span_paragraph(spans: &[Span]) -> Paragraph {
    let mut paragraph = Paragraph::new();
    for span in spans {
        paragraph = paragraph.add_run(body_run(&span.text, span.bold));
    }
    paragraph
}

fn build_table(headers: &[String], rows: &[Vec<String>]) -> Table {
    let header_row = TableRow::new(
        headers
            .iter()
            .map(|cell| {
                TableCell::new()
                    .add_paragraph(Paragraph::new().add_run(body_run(cell, true)))
            })
            .collect(),
    );

    let mut table_rows = vec![header_row];
    for row in rows {
        table_rows.push(TableRow::new(
            row.iter()
                .map(|cell| {
                    TableCell::new()
                        .add_paragraph(Paragraph::new().add_run(body_run(cell, false)))
                })
                .collect(),
        ));
    }

    Table::new(table_rows)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn document_xml(path: &Path) -> String {
        let file = fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn rendered_artifact_is_a_docx_with_title_and_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");

        let report = "# 장애 개요\n장애 원인은 **설정 오류**였다\n- 원복 조치 완료";
        render_to_path(report, &path).unwrap();

        let xml = document_xml(&path);
        assert!(xml.contains(DOCUMENT_TITLE));
        assert!(xml.contains("장애 개요"));
        assert!(xml.contains("설정 오류"));
        assert!(xml.contains("원복 조치 완료"));
    }

    #[test]
    fn tables_render_with_header_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.docx");

        let report = "| 항목 | 내용 |\n|---|---|\n| 장애원인 | 설정 오류 |";
        render_to_path(report, &path).unwrap();

        let xml = document_xml(&path);
        assert!(xml.contains("<w:tbl>"));
        assert!(xml.contains("항목"));
        assert!(xml.contains("장애원인"));
    }
}
