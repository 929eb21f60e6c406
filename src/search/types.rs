use serde::{Deserialize, Serialize};

/// Search mode selected by the user for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Keyword,
    Semantic,
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Semantic
    }
}

/// One incident-history document as projected out of the search index.
///
/// The index may omit any field; display fields decay to the empty string
/// at this boundary so downstream rendering never deals with missing keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentDocument {
    #[serde(default)]
    pub incident_id: String,
    #[serde(default)]
    pub domain_name: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_grade: String,
    #[serde(default)]
    pub error_range: String,
    #[serde(default)]
    pub error_time: String,
    #[serde(default)]
    pub error_date: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub notice_text: String,
    #[serde(default)]
    pub incident_cause: String,
    #[serde(default)]
    pub incident_repair: String,
    #[serde(default)]
    pub incident_plan: String,
    #[serde(default)]
    pub cause_type: String,
    #[serde(default)]
    pub done_type: String,
    #[serde(default)]
    pub incident_grade: String,
    #[serde(default)]
    pub owner_depart: String,
    #[serde(default, rename = "@search.score")]
    pub score: f64,
    #[serde(
        default,
        rename = "@search.rerankerScore",
        skip_serializing_if = "Option::is_none"
    )]
    pub reranker_score: Option<f64>,
}

/// One retrieval request against the index.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub top: usize,
    pub mode: SearchMode,
}

/// Retrieval outcome surfaced to the interaction layer.
///
/// The retriever never fails; a degraded run carries its explanation in
/// `notice` alongside whatever documents it could produce.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Retrieval {
    pub documents: Vec<IncidentDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}
