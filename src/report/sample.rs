//! Sample-document text extraction.
//!
//! The report generator is shown the section layout of a reference report.
//! Only visible paragraph text matters here, so the reader pulls the `w:t`
//! runs straight out of the package's document part.

use std::fs;
use std::io::Read;
use std::path::Path;

use regex::Regex;

use crate::core::errors::ApiError;

/// Extract the non-empty paragraph text of a `.docx` file, one line per
/// paragraph.
pub fn read_sample_text(path: &Path) -> Result<String, ApiError> {
    let file = fs::File::open(path)
        .map_err(|e| ApiError::internal(format!("Failed to open sample document: {}", e)))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ApiError::internal(format!("Failed to read sample document: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ApiError::internal(format!("Sample document has no body part: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(ApiError::internal)?;

    Ok(extract_paragraph_text(&xml))
}

fn extract_paragraph_text(document_xml: &str) -> String {
    let text_run = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap();

    let mut paragraphs = Vec::new();
    for chunk in document_xml.split("</w:p>") {
        let mut text = String::new();
        for capture in text_run.captures_iter(chunk) {
            text.push_str(&unescape(&capture[1]));
        }
        if !text.trim().is_empty() {
            paragraphs.push(text);
        }
    }

    paragraphs.join("\n")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::render::render_to_path;

    #[test]
    fn paragraph_text_is_extracted_in_order() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>장애분석보고서</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">1. 장애 </w:t></w:r><w:r><w:t>개요</w:t></w:r></w:p>
            <w:p><w:r><w:t>   </w:t></w:r></w:p>
            <w:p><w:r><w:t>2. 조치 &amp; 경과</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = extract_paragraph_text(xml);
        assert_eq!(text, "장애분석보고서\n1. 장애 개요\n2. 조치 & 경과");
    }

    #[test]
    fn round_trips_through_a_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        render_to_path("# 장애 개요\n본문 내용", &path).unwrap();

        let text = read_sample_text(&path).unwrap();
        assert!(text.contains("장애 개요"));
        assert!(text.contains("본문 내용"));
    }

    #[test]
    fn missing_file_reports_the_cause() {
        let err = read_sample_text(Path::new("no-such-sample.docx")).unwrap_err();
        assert!(err.to_string().contains("sample document"));
    }
}
