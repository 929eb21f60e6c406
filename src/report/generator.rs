use std::sync::Arc;

use crate::llm::{ChatMessage, ChatProvider, ChatRequest};

const REPORT_TEMPERATURE: f64 = 0.3;
const REPORT_MAX_TOKENS: i32 = 2000;

const REPORT_SYSTEM_PROMPT: &str = "당신은 IT 장애보고서 작성 전문가입니다. 주어진 정보를 바탕으로 정확하고 전문적인 장애보고서를 작성해주세요. 표 형식의 정보는 마크다운 표 형식으로 작성해주세요.";

/// Turns a stored incident email body into a report narrative following
/// the sample document's section layout. A generation failure comes back
/// as descriptive text naming the cause; this never errors.
#[derive(Clone)]
pub struct ReportGenerator {
    provider: Arc<dyn ChatProvider>,
}

impl ReportGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, body_text: &str, sample_format: &str) -> String {
        let prompt = format!(
            "다음 샘플 장애보고서의 형식을 참고하여, 주어진 본문 내용을 바탕으로 전문적인 장애보고서를 작성해주세요.\n\n\
             샘플 장애보고서 형식:\n{}\n\n\
             본문 내용:\n{}\n\n\
             위의 본문 내용을 분석하여 샘플 형식에 맞는 전문적인 장애보고서를 작성해주세요.\n\
             - 장애 발생 시간, 원인, 영향도, 조치사항 등을 명확히 구분하여 작성\n\
             - 기술적인 내용은 정확하고 이해하기 쉽게 설명\n\
             - 보고서 형식은 샘플과 동일하게 유지\n\
             - 표 형식의 정보는 다음과 같이 마크다운 표 형식으로 작성:\n\
               | 항목 | 내용 |\n\
               |------|------|\n\
               | 장애발생일시 | 2024-XX-XX XX:XX |\n\
               | 장애해결일시 | 2024-XX-XX XX:XX |\n\
               | 영향도 | 상/중/하 |\n\
               | 장애원인 | 구체적 원인 |\n\
               | 조치사항 | 구체적 조치 내용 |",
            sample_format, body_text
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(REPORT_SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ])
        .with_temperature(REPORT_TEMPERATURE)
        .with_max_tokens(REPORT_MAX_TOKENS);

        match self.provider.chat(request).await {
            Ok(content) => content,
            Err(err) => {
                tracing::error!("report generation failed: {}", err);
                format!("LLM 보고서 생성 중 오류가 발생했습니다: {}", err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::ApiError;

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, ApiError> {
            Err(ApiError::Internal("quota exceeded".to_string()))
        }
    }

    struct EchoingProvider;

    #[async_trait]
    impl ChatProvider for EchoingProvider {
        fn name(&self) -> &str {
            "echoing"
        }

        async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
            Ok(request.messages[1].content.clone())
        }
    }

    #[tokio::test]
    async fn failure_returns_descriptive_text_naming_the_cause() {
        let generator = ReportGenerator::new(Arc::new(FailingProvider));
        let report = generator.generate("본문", "샘플 형식").await;
        assert!(report.contains("LLM 보고서 생성 중 오류가 발생했습니다"));
        assert!(report.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn prompt_carries_sample_format_and_body() {
        let generator = ReportGenerator::new(Arc::new(EchoingProvider));
        let report = generator
            .generate("ㅇ 대상서비스 : KOS-오더", "1. 장애 개요\n2. 조치 경과")
            .await;
        assert!(report.contains("샘플 장애보고서 형식:\n1. 장애 개요\n2. 조치 경과"));
        assert!(report.contains("본문 내용:\nㅇ 대상서비스 : KOS-오더"));
    }
}
