//! Query pipeline: retrieval, context composition, answer generation.

use serde::Serialize;

use super::answer::{AnswerGenerator, QueryType};
use super::context::compose_context;
use crate::search::retriever::DocumentRetriever;
use crate::search::types::{Retrieval, SearchMode};

/// Everything one chat interaction produced.
#[derive(Debug, Clone, Serialize)]
pub struct ChatOutcome {
    pub answer: String,
    pub retrieval: Retrieval,
}

/// One chat turn, run to completion: retrieve, compose, generate.
#[derive(Clone)]
pub struct ChatService {
    retriever: DocumentRetriever,
    generator: AnswerGenerator,
}

impl ChatService {
    pub fn new(retriever: DocumentRetriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    pub async fn respond(
        &self,
        query: &str,
        mode: SearchMode,
        top_k: usize,
        query_type: QueryType,
    ) -> ChatOutcome {
        let retrieval = self.retriever.retrieve(query, mode, top_k).await;

        if retrieval.documents.is_empty() {
            return ChatOutcome {
                answer: "관련 문서를 찾을 수 없습니다.".to_string(),
                retrieval,
            };
        }

        let context = compose_context(&retrieval.documents);
        let answer = self.generator.generate(query, &context, query_type).await;

        ChatOutcome { answer, retrieval }
    }
}
