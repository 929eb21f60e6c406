//! Grounding-context composition.
//!
//! Renders retrieved incident documents into the fixed labelled template
//! the answer generator is prompted against. Pure and deterministic: the
//! rendered block count always equals the document count, and an empty
//! input composes to the empty string.

use crate::search::types::IncidentDocument;

pub fn compose_context(documents: &[IncidentDocument]) -> String {
    let blocks: Vec<String> = documents
        .iter()
        .enumerate()
        .map(|(i, doc)| render_block(i, doc))
        .collect();

    blocks.join("\n\n")
}

fn render_block(index: usize, doc: &IncidentDocument) -> String {
    format!(
        "문서 {}:\n\
         장애 ID: {}\n\
         도메인: {}\n\
         서비스명: {}\n\
         서비스 등급: {}\n\
         장애 범위: {}\n\
         제목: {}\n\
         공지사항: {}\n\
         장애 원인: {}\n\
         복구 방법: {}\n\
         개선 계획: {}\n\
         원인 유형: {}\n\
         처리 유형: {}\n\
         장애 등급: {}\n\
         담당 부서: {}",
        index + 1,
        doc.incident_id,
        doc.domain_name,
        doc.service_name,
        doc.service_grade,
        doc.error_range,
        doc.subject,
        doc.notice_text,
        doc.incident_cause,
        doc.incident_repair,
        doc.incident_plan,
        doc.cause_type,
        doc.done_type,
        doc.incident_grade,
        doc.owner_depart,
    )
}
