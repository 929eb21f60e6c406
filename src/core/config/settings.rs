use std::env;
use std::path::PathBuf;

use super::paths::AppPaths;

/// Environment-sourced service settings, read once at startup.
///
/// Every value is optional at load time; each workflow declares which
/// settings it requires and reports the missing names instead of failing
/// the whole process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub search_endpoint: Option<String>,
    pub search_api_key: Option<String>,
    pub search_index: Option<String>,

    pub openai_endpoint: Option<String>,
    pub openai_key: Option<String>,
    pub chat_model: String,
    pub openai_api_version: String,

    pub storage_conn_str: Option<String>,
    pub storage_account_name: Option<String>,
    pub word_container_name: Option<String>,

    pub eml_db_path: PathBuf,
    pub sample_docx_path: PathBuf,
}

impl Settings {
    pub fn from_env(paths: &AppPaths) -> Self {
        Settings {
            search_endpoint: non_empty(env::var("SEARCH_ENDPOINT").ok()),
            search_api_key: non_empty(env::var("SEARCH_API_KEY").ok()),
            search_index: non_empty(env::var("INDEX_NAME").ok()),

            openai_endpoint: non_empty(env::var("OPENAI_ENDPOINT").ok()),
            openai_key: non_empty(env::var("OPENAI_KEY").ok()),
            chat_model: env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_version: env::var("OPENAI_API_VERSION")
                .unwrap_or_else(|_| "2024-02-01".to_string()),

            storage_conn_str: non_empty(env::var("STORAGE_CONN_STR").ok()),
            storage_account_name: non_empty(env::var("STORAGE_ACCOUNT_NAME").ok()),
            word_container_name: non_empty(env::var("WORD_CONTAINER_NAME").ok()),

            eml_db_path: env::var("EML_DB_NAME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| paths.default_db_path.clone()),
            sample_docx_path: env::var("SAMPLE_DOCX_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/docx/iap-report-sample1.docx")),
        }
    }

    /// Settings the chat workflow cannot run without.
    pub fn chat_missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        push_missing(&mut missing, "OPENAI_ENDPOINT", &self.openai_endpoint);
        push_missing(&mut missing, "OPENAI_KEY", &self.openai_key);
        push_missing(&mut missing, "SEARCH_ENDPOINT", &self.search_endpoint);
        push_missing(&mut missing, "SEARCH_API_KEY", &self.search_api_key);
        push_missing(&mut missing, "INDEX_NAME", &self.search_index);
        missing
    }

    /// Settings the report workflow cannot run without.
    pub fn report_missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        push_missing(&mut missing, "OPENAI_ENDPOINT", &self.openai_endpoint);
        push_missing(&mut missing, "OPENAI_KEY", &self.openai_key);
        push_missing(&mut missing, "STORAGE_CONN_STR", &self.storage_conn_str);
        push_missing(
            &mut missing,
            "STORAGE_ACCOUNT_NAME",
            &self.storage_account_name,
        );
        push_missing(
            &mut missing,
            "WORD_CONTAINER_NAME",
            &self.word_container_name,
        );
        missing
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn push_missing(missing: &mut Vec<String>, name: &str, value: &Option<String>) {
    if value.is_none() {
        missing.push(name.to_string());
    }
}
