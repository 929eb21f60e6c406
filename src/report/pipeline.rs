//! Report pipeline: sample format, narrative generation, rendering,
//! publishing.

use std::path::PathBuf;

use serde::Serialize;

use super::generator::ReportGenerator;
use super::render::render_to_path;
use super::sample::read_sample_text;
use crate::records::EmailRecord;
use crate::storage::blob::{BlobPublisher, PublishOutcome};

/// What one report run produced: the generated narrative plus the
/// publishing outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report: String,
    #[serde(flatten)]
    pub publish: PublishOutcome,
}

#[derive(Clone)]
pub struct ReportService {
    generator: ReportGenerator,
    publisher: BlobPublisher,
    sample_path: PathBuf,
}

impl ReportService {
    pub fn new(
        generator: ReportGenerator,
        publisher: BlobPublisher,
        sample_path: PathBuf,
    ) -> Self {
        Self {
            generator,
            publisher,
            sample_path,
        }
    }

    pub async fn produce(&self, record: &EmailRecord) -> ReportOutcome {
        // an unreadable sample degrades to its error text as the exemplar,
        // leaving the generator to fall back to its own layout
        let sample_format = read_sample_text(&self.sample_path)
            .unwrap_or_else(|err| format!("샘플 문서를 읽을 수 없습니다: {}", err));

        let report = self.generator.generate(&record.body_text, &sample_format).await;

        let artifact_path = std::env::temp_dir().join(format!(
            "trouble-chaser-report-{}.docx",
            uuid::Uuid::new_v4()
        ));

        if let Err(err) = render_to_path(&report, &artifact_path) {
            return ReportOutcome {
                report,
                publish: PublishOutcome {
                    success: false,
                    url: None,
                    error: Some(format!("보고서 생성 실패: {}", err)),
                },
            };
        }

        let target_name = format!("iap-report-{}.docx", record.id);
        let publish = self.publisher.publish_file(&artifact_path, &target_name).await;

        let _ = std::fs::remove_file(&artifact_path);

        ReportOutcome { report, publish }
    }
}
