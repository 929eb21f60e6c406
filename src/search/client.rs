use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::types::{IncidentDocument, SearchMode, SearchRequest};
use crate::core::errors::ApiError;

const API_VERSION: &str = "2023-11-01";

/// Semantic configuration defined on the incident index.
const SEMANTIC_CONFIGURATION: &str = "iap-incident-meaning";

/// Fields projected back for display.
const SELECT_FIELDS: &str = "incident_id,domain_name,service_name,service_grade,\
error_range,error_time,subject,notice_text,error_date,incident_cause,\
incident_repair,incident_plan,cause_type,done_type,incident_grade,owner_depart";

/// Searchable-field allowlist for keyword mode.
const SEARCH_FIELDS: &str = "subject,notice_text,error_date,incident_cause,\
incident_repair,incident_plan,domain_name,service_name,cause_type,done_type,\
owner_depart";

#[async_trait]
pub trait SearchApi: Send + Sync {
    /// run one search against the index, already shaped by mode
    async fn search(&self, request: &SearchRequest) -> Result<Vec<IncidentDocument>, ApiError>;
}

/// REST client for an Azure AI Search index.
#[derive(Clone)]
pub struct AzureSearchClient {
    endpoint: String,
    api_key: String,
    index: String,
    client: Client,
}

impl AzureSearchClient {
    pub fn new(endpoint: String, api_key: String, index: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            index,
            client: Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, API_VERSION
        )
    }

    fn request_body(request: &SearchRequest) -> Value {
        let mut body = json!({
            "search": request.query,
            "top": request.top,
            "count": true,
            "select": SELECT_FIELDS,
        });

        if let Some(obj) = body.as_object_mut() {
            match request.mode {
                SearchMode::Keyword => {
                    obj.insert("searchFields".to_string(), json!(SEARCH_FIELDS));
                }
                SearchMode::Semantic => {
                    obj.insert("queryType".to_string(), json!("semantic"));
                    obj.insert(
                        "semanticConfiguration".to_string(),
                        json!(SEMANTIC_CONFIGURATION),
                    );
                }
            }
        }

        body
    }
}

#[async_trait]
impl SearchApi for AzureSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<IncidentDocument>, ApiError> {
        let body = Self::request_body(request);

        let res = self
            .client
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "search request failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let items = payload
            .get("value")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut documents = Vec::with_capacity(items.len());
        for item in items {
            let doc: IncidentDocument =
                serde_json::from_value(item).map_err(ApiError::internal)?;
            documents.push(doc);
        }

        Ok(documents)
    }
}
