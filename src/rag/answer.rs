use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, ChatProvider, ChatRequest};

/// Returned whenever generation fails or produces nothing usable.
pub const APOLOGY: &str = "죄송합니다. 응답을 생성하는 중 오류가 발생했습니다.";

const ANSWER_TEMPERATURE: f64 = 0.3;
const ANSWER_MAX_TOKENS: i32 = 1000;

/// Question types behind the quick-question buttons; each selects its own
/// system persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Repair,
    Cause,
    History,
    Similar,
    Default,
}

impl Default for QueryType {
    fn default() -> Self {
        QueryType::Default
    }
}

const REPAIR_PROMPT: &str = "당신은 IT서비스 트러블슈팅 전문가입니다.
사용자의 서비스와 현상에 해당되는 대표 복구방법(incident_repair)을 아래와 같은 형식으로 Top3로 요약해서 답변해주세요.
Case1 : ~~현 영향도
* 원인 : ~~한 원인
* 현상 : ~~한 현상
* 조치방법 : ~~해서 복구
장애현상은 공지사항의 '현상'을 참고하고 없으면 '영향도'를 참고해서주세요
답변은 한국어로 작성하며, 만약 제공된 문서에서 관련 정보를 찾을 수 없다면, 그렇게 명시해주세요.";

const CAUSE_PROMPT: &str = "당신은 장애 원인 분석 전문가입니다.
사용자의 질문에 대해 입력받은 서비스명은 상관없이 장애현상에 대한 대표적인 장애 원인을 간결하게 설명하세요.
장애현상은 공지사항의 '현상'을 참고하고 없으면 '영향도'를 참고해서주세요
답변은 한국어로 작성하며, 원인별로 분류하여 설명해주세요.
장애 ID, 서비스명, 원인 유형 등의 구체적인 정보를 포함해주세요.
만약 제공된 문서에서 관련 정보를 찾을 수 없다면, 그렇게 명시해주세요.";

const HISTORY_PROMPT: &str = "당신은 과거 장애 이력 분석 전문가입니다.
유사한 과거 장애 사례를 찾아 원인 및 대응 방법을 표 형식으로 요약하세요.
장애현상은 공지사항의 '현상'을 참고하고 없으면 '영향도'를 참고해서주세요
답변은 한국어로 작성하며, 다음과 같은 표 형식을 사용해주세요:
| 장애 ID | 서비스명 | 장애 원인 | 복구 방법 | 처리 유형 | 담당 부서 |
장애 ID, 서비스명, 원인, 복구방법 등의 구체적인 정보를 포함해주세요.
만약 제공된 문서에서 관련 정보를 찾을 수 없다면, 그렇게 명시해주세요.";

const SIMILAR_PROMPT: &str = "당신은 유사 사례 추천 전문가입니다.
다른 서비스에서 유사한 장애 현상이 어떤 원인이었고 어떻게 처리됐는지 설명하세요.
답변은 한국어로 작성하며, 서비스별로 분류하여 설명해주세요.
장애현상은 공지사항의 '현상'을 참고하고 없으면 '영향도'를 참고해서주세요
장애 ID, 서비스명, 원인, 복구방법 등의 구체적인 정보를 포함해주세요.
만약 제공된 문서에서 관련 정보를 찾을 수 없다면, 그렇게 명시해주세요.";

const DEFAULT_PROMPT: &str = "당신은 IT 시스템 장애 전문가입니다.
사용자의 질문에 대해 제공된 장애 이력 문서를 기반으로 정확하고 유용한 답변을 제공해주세요.
답변은 한국어로 작성하며, 구체적인 해결방안이나 원인을 명시해주세요.
장애현상은 공지사항의 '현상'을 참고하고 없으면 '영향도'를 참고해서주세요
장애 ID, 서비스명, 원인, 복구방법 등의 구체적인 정보를 포함해주세요.
만약 제공된 문서에서 관련 정보를 찾을 수 없다면, 그렇게 명시해주세요.";

impl QueryType {
    pub fn system_prompt(self) -> &'static str {
        match self {
            QueryType::Repair => REPAIR_PROMPT,
            QueryType::Cause => CAUSE_PROMPT,
            QueryType::History => HISTORY_PROMPT,
            QueryType::Similar => SIMILAR_PROMPT,
            QueryType::Default => DEFAULT_PROMPT,
        }
    }
}

/// Produces the grounded answer for one query. Generation failures and
/// empty completions both collapse to the fixed apology text; the caller
/// always gets a non-empty string.
#[derive(Clone)]
pub struct AnswerGenerator {
    provider: Arc<dyn ChatProvider>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(&self, query: &str, context: &str, query_type: QueryType) -> String {
        let user_prompt = format!(
            "다음 장애 이력 문서들을 참고하여 질문에 답변해주세요:\n\n{}\n\n질문: {}\n\n답변:",
            context, query
        );

        let request = ChatRequest::new(vec![
            ChatMessage::system(query_type.system_prompt()),
            ChatMessage::user(user_prompt),
        ])
        .with_temperature(ANSWER_TEMPERATURE)
        .with_max_tokens(ANSWER_MAX_TOKENS);

        match self.provider.chat(request).await {
            Ok(content) if !content.trim().is_empty() => content,
            Ok(_) => {
                tracing::warn!("answer generation returned an empty completion");
                APOLOGY.to_string()
            }
            Err(err) => {
                tracing::error!("answer generation failed: {}", err);
                APOLOGY.to_string()
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
            Err(ApiError::Internal("deployment unreachable".to_string()))
        }
    }

    struct CannedProvider(String);

    #[async_trait]
    impl ChatProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, ApiError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn failure_returns_exactly_the_apology_text() {
        let generator = AnswerGenerator::new(Arc::new(FailingProvider));
        let answer = generator
            .generate("마이페이지 장애원인 알려줘", "문서 1: ...", QueryType::Default)
            .await;
        assert_eq!(answer, APOLOGY);
    }

    #[tokio::test]
    async fn empty_completion_never_surfaces() {
        let generator = AnswerGenerator::new(Arc::new(CannedProvider("   ".to_string())));
        let answer = generator.generate("질문", "", QueryType::Cause).await;
        assert!(!answer.is_empty());
        assert_eq!(answer, APOLOGY);
    }

    #[tokio::test]
    async fn successful_completion_passes_through() {
        let generator =
            AnswerGenerator::new(Arc::new(CannedProvider("원인은 설정 오류입니다.".to_string())));
        let answer = generator.generate("질문", "문서 1:", QueryType::Repair).await;
        assert_eq!(answer, "원인은 설정 오류입니다.");
    }
}
