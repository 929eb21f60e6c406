use std::sync::Arc;

use super::client::SearchApi;
use super::types::{Retrieval, SearchMode, SearchRequest};

/// Result-count bound accepted from the interaction layer.
pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 10;

/// Retrieves incident documents for one query, applying the degradation
/// policy: semantic failures fall back to keyword search with a warning,
/// keyword failures yield an empty result with an error notice. The caller
/// never sees an `Err`.
#[derive(Clone)]
pub struct DocumentRetriever {
    api: Arc<dyn SearchApi>,
}

impl DocumentRetriever {
    pub fn new(api: Arc<dyn SearchApi>) -> Self {
        Self { api }
    }

    pub async fn retrieve(&self, query: &str, mode: SearchMode, top_k: usize) -> Retrieval {
        let top = top_k.clamp(MIN_TOP_K, MAX_TOP_K);

        match mode {
            SearchMode::Keyword => self.keyword(query, top, None).await,
            SearchMode::Semantic => {
                let request = SearchRequest {
                    query: query.to_string(),
                    top,
                    mode: SearchMode::Semantic,
                };
                match self.api.search(&request).await {
                    Ok(documents) => Retrieval {
                        documents,
                        notice: None,
                    },
                    Err(err) => {
                        tracing::warn!("semantic search failed, falling back to keyword: {}", err);
                        let warning =
                            format!("시맨틱 검색 실패, 일반 검색으로 대체: {}", err);
                        self.keyword(query, top, Some(warning)).await
                    }
                }
            }
        }
    }

    async fn keyword(&self, query: &str, top: usize, warning: Option<String>) -> Retrieval {
        let request = SearchRequest {
            query: query.to_string(),
            top,
            mode: SearchMode::Keyword,
        };

        match self.api.search(&request).await {
            Ok(documents) => Retrieval {
                documents,
                notice: warning,
            },
            Err(err) => {
                tracing::error!("keyword search failed: {}", err);
                Retrieval {
                    documents: Vec::new(),
                    notice: Some(format!("검색 실패: {}", err)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::ApiError;
    use crate::search::types::IncidentDocument;

    /// Test backend: keyword queries return canned documents, semantic
    /// queries optionally fail, and every request is recorded.
    struct FakeSearch {
        semantic_fails: bool,
        documents: Vec<IncidentDocument>,
        requests: Mutex<Vec<SearchRequest>>,
    }

    impl FakeSearch {
        fn new(semantic_fails: bool, documents: Vec<IncidentDocument>) -> Self {
            Self {
                semantic_fails,
                documents,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchApi for FakeSearch {
        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<Vec<IncidentDocument>, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if request.mode == SearchMode::Semantic && self.semantic_fails {
                return Err(ApiError::Internal("reranker unavailable".to_string()));
            }
            Ok(self
                .documents
                .iter()
                .take(request.top)
                .cloned()
                .collect())
        }
    }

    fn docs(n: usize) -> Vec<IncidentDocument> {
        (0..n)
            .map(|i| IncidentDocument {
                incident_id: format!("INM{:08}", i),
                service_name: "마이페이지".to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn returns_at_most_k_documents() {
        let retriever = DocumentRetriever::new(Arc::new(FakeSearch::new(false, docs(10))));
        for k in 1..=10usize {
            let retrieval = retriever
                .retrieve("마이페이지 접속불가", SearchMode::Keyword, k)
                .await;
            assert!(retrieval.documents.len() <= k);
        }
    }

    #[tokio::test]
    async fn clamps_out_of_range_bounds() {
        let api = Arc::new(FakeSearch::new(false, docs(20)));
        let retriever = DocumentRetriever::new(api.clone());

        retriever.retrieve("q", SearchMode::Keyword, 0).await;
        retriever.retrieve("q", SearchMode::Keyword, 99).await;

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[0].top, MIN_TOP_K);
        assert_eq!(requests[1].top, MAX_TOP_K);
    }

    #[tokio::test]
    async fn semantic_failure_falls_back_to_keyword_with_warning() {
        let api = Arc::new(FakeSearch::new(true, docs(4)));
        let retriever = DocumentRetriever::new(api.clone());

        let fallback = retriever
            .retrieve("마이페이지 접속불가", SearchMode::Semantic, 3)
            .await;
        let keyword = retriever
            .retrieve("마이페이지 접속불가", SearchMode::Keyword, 3)
            .await;

        assert!(fallback.notice.as_deref().unwrap().contains("시맨틱 검색 실패"));
        assert_eq!(
            fallback
                .documents
                .iter()
                .map(|d| d.incident_id.clone())
                .collect::<Vec<_>>(),
            keyword
                .documents
                .iter()
                .map(|d| d.incident_id.clone())
                .collect::<Vec<_>>()
        );

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[0].mode, SearchMode::Semantic);
        assert_eq!(requests[1].mode, SearchMode::Keyword);
    }

    #[tokio::test]
    async fn keyword_failure_yields_empty_result_with_error_notice() {
        struct AlwaysFails;

        #[async_trait]
        impl SearchApi for AlwaysFails {
            async fn search(
                &self,
                _request: &SearchRequest,
            ) -> Result<Vec<IncidentDocument>, ApiError> {
                Err(ApiError::Internal("index offline".to_string()))
            }
        }

        let retriever = DocumentRetriever::new(Arc::new(AlwaysFails));
        let retrieval = retriever.retrieve("q", SearchMode::Semantic, 5).await;

        assert!(retrieval.documents.is_empty());
        assert!(retrieval.notice.as_deref().unwrap().contains("검색 실패"));
    }
}
