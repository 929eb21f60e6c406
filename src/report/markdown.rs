//! Line-oriented parser for the markdown subset the report generator is
//! prompted to emit: headings 1-4, bullet and numbered list items, full-bold
//! lines, pipe tables, and inline `**bold**` spans. Anything else becomes a
//! plain paragraph with inline bold preserved.

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    fn plain(text: &str) -> Self {
        Span {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Span {
            text: text.to_string(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(Vec<Span>),
    Numbered(Vec<Span>),
    BoldLine(String),
    Paragraph(Vec<Span>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Blank,
}

pub fn parse(text: &str) -> Vec<Block> {
    let numbered = Regex::new(r"^\d+\.\s+").unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if line.is_empty() {
            blocks.push(Block::Blank);
            i += 1;
            continue;
        }

        if line.starts_with('|') {
            let mut j = i;
            while j < lines.len() && !lines[j].trim().is_empty() && lines[j].contains('|') {
                j += 1;
            }
            // needs at least header, separator, and one data row
            if j - i >= 3 {
                if let Some((headers, rows)) = parse_table(&lines[i..j]) {
                    blocks.push(Block::Table { headers, rows });
                    i = j;
                    continue;
                }
            }
            blocks.push(Block::Paragraph(parse_spans(line)));
            i += 1;
            continue;
        }

        if let Some(rest) = line.strip_prefix("#### ") {
            blocks.push(Block::Heading {
                level: 4,
                text: rest.to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("### ") {
            blocks.push(Block::Heading {
                level: 3,
                text: rest.to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("## ") {
            blocks.push(Block::Heading {
                level: 2,
                text: rest.to_string(),
            });
        } else if let Some(rest) = line.strip_prefix("# ") {
            blocks.push(Block::Heading {
                level: 1,
                text: rest.to_string(),
            });
        } else if numbered.is_match(line) {
            let content = numbered.replace(line, "");
            blocks.push(Block::Numbered(parse_spans(&content)));
        } else if line.starts_with("- ") || line.starts_with("* ") {
            blocks.push(Block::Bullet(parse_spans(&line[2..])));
        } else if line.starts_with("**") && line.ends_with("**") && line.matches("**").count() == 2
        {
            blocks.push(Block::BoldLine(line[2..line.len() - 2].to_string()));
        } else {
            blocks.push(Block::Paragraph(parse_spans(line)));
        }

        i += 1;
    }

    blocks
}

/// Split a line into plain and `**bold**` spans.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let pattern = Regex::new(r"\*\*.*?\*\*").unwrap();
    let mut spans = Vec::new();
    let mut last = 0;

    for m in pattern.find_iter(text) {
        if m.start() > last {
            spans.push(Span::plain(&text[last..m.start()]));
        }
        let inner = &text[m.start() + 2..m.end() - 2];
        if inner.is_empty() {
            // "****" carries no content; keep it verbatim
            spans.push(Span::plain(m.as_str()));
        } else {
            spans.push(Span::bold(inner));
        }
        last = m.end();
    }

    if last < text.len() {
        spans.push(Span::plain(&text[last..]));
    }

    if spans.is_empty() {
        spans.push(Span::plain(""));
    }

    spans
}

fn parse_table(lines: &[&str]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let headers = split_row(lines[0]);
    if headers.is_empty() {
        return None;
    }

    // lines[1] is the separator row
    let mut rows = Vec::new();
    for line in &lines[2..] {
        let cells = split_row(line);
        if cells.len() == headers.len() {
            rows.push(cells);
        }
    }

    if rows.is_empty() {
        return None;
    }

    Some((headers, rows))
}

fn split_row(line: &str) -> Vec<String> {
    let mut inner = line.trim();
    if let Some(stripped) = inner.strip_prefix('|') {
        inner = stripped;
    }
    if let Some(stripped) = inner.strip_suffix('|') {
        inner = stripped;
    }
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_prefixes_map_to_levels() {
        let blocks = parse("# A\n## B\n### C\n#### D");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "A".to_string()
                },
                Block::Heading {
                    level: 2,
                    text: "B".to_string()
                },
                Block::Heading {
                    level: 3,
                    text: "C".to_string()
                },
                Block::Heading {
                    level: 4,
                    text: "D".to_string()
                },
            ]
        );
    }

    #[test]
    fn full_bold_line_is_one_bold_block() {
        let blocks = parse("**bold**");
        assert_eq!(blocks, vec![Block::BoldLine("bold".to_string())]);
    }

    #[test]
    fn list_items_parse_with_inline_bold() {
        let blocks = parse("- item\n* other\n1. first\n12. twelfth");
        assert_eq!(blocks[0], Block::Bullet(vec![Span::plain("item")]));
        assert_eq!(blocks[1], Block::Bullet(vec![Span::plain("other")]));
        assert_eq!(blocks[2], Block::Numbered(vec![Span::plain("first")]));
        assert_eq!(blocks[3], Block::Numbered(vec![Span::plain("twelfth")]));

        let bold_item = parse("- **조치사항** 완료");
        assert_eq!(
            bold_item[0],
            Block::Bullet(vec![Span::bold("조치사항"), Span::plain(" 완료")])
        );
    }

    #[test]
    fn inline_bold_splits_into_spans() {
        let spans = parse_spans("장애 원인은 **설정 오류**였다");
        assert_eq!(
            spans,
            vec![
                Span::plain("장애 원인은 "),
                Span::bold("설정 오류"),
                Span::plain("였다"),
            ]
        );
    }

    #[test]
    fn pipe_table_parses_headers_and_rows() {
        let text = "| 항목 | 내용 |\n|------|------|\n| 장애원인 | 설정 오류 |\n| 조치사항 | 원복 |";
        let blocks = parse(text);
        assert_eq!(
            blocks,
            vec![Block::Table {
                headers: vec!["항목".to_string(), "내용".to_string()],
                rows: vec![
                    vec!["장애원인".to_string(), "설정 오류".to_string()],
                    vec!["조치사항".to_string(), "원복".to_string()],
                ],
            }]
        );
    }

    #[test]
    fn short_pipe_runs_fall_back_to_paragraphs() {
        let blocks = parse("| lonely |\nplain text");
        assert_eq!(blocks[0], Block::Paragraph(vec![Span::plain("| lonely |")]));
        assert_eq!(blocks[1], Block::Paragraph(vec![Span::plain("plain text")]));
    }

    #[test]
    fn unrecognized_lines_become_paragraphs_and_blanks_survive() {
        let blocks = parse("없는 형식의 줄\n\n다음 문단");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(vec![Span::plain("없는 형식의 줄")]),
                Block::Blank,
                Block::Paragraph(vec![Span::plain("다음 문단")]),
            ]
        );
    }
}
