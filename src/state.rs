use std::sync::Arc;

use crate::core::config::{AppPaths, Settings};
use crate::history::ConversationStore;
use crate::llm::AzureOpenAiProvider;
use crate::rag::{AnswerGenerator, ChatService};
use crate::records::EmailRecordStore;
use crate::report::{ReportGenerator, ReportService};
use crate::search::{AzureSearchClient, DocumentRetriever};
use crate::storage::BlobPublisher;

/// Global application state shared across all routes.
///
/// Service clients are constructed once here and reused read-only; a
/// workflow whose settings are incomplete simply stays `None` and its
/// routes answer with the missing-settings list instead.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub conversations: ConversationStore,
    pub chat: Option<ChatService>,
    pub records: Option<EmailRecordStore>,
    pub report: Option<ReportService>,
}

impl AppState {
    pub async fn initialize() -> Arc<Self> {
        let paths = Arc::new(AppPaths::new());
        let settings = Settings::from_env(&paths);

        let chat_provider = match (&settings.openai_endpoint, &settings.openai_key) {
            (Some(endpoint), Some(key)) => Some(Arc::new(AzureOpenAiProvider::new(
                endpoint.clone(),
                key.clone(),
                settings.chat_model.clone(),
                settings.openai_api_version.clone(),
            ))),
            _ => None,
        };

        let chat = match (
            &chat_provider,
            &settings.search_endpoint,
            &settings.search_api_key,
            &settings.search_index,
        ) {
            (Some(provider), Some(endpoint), Some(key), Some(index)) => {
                let search = Arc::new(AzureSearchClient::new(
                    endpoint.clone(),
                    key.clone(),
                    index.clone(),
                ));
                Some(ChatService::new(
                    DocumentRetriever::new(search),
                    AnswerGenerator::new(provider.clone()),
                ))
            }
            _ => {
                tracing::warn!(
                    "chat workflow disabled, missing settings: {:?}",
                    settings.chat_missing()
                );
                None
            }
        };

        let records = match EmailRecordStore::new(&settings.eml_db_path).await {
            Ok(store) => Some(store),
            Err(err) => {
                tracing::warn!("eml record store unavailable: {}", err);
                None
            }
        };

        let report = match (
            &chat_provider,
            &settings.storage_conn_str,
            &settings.word_container_name,
        ) {
            (Some(provider), Some(conn_str), Some(container)) => {
                let publisher = BlobPublisher::new(
                    conn_str.clone(),
                    settings.storage_account_name.clone(),
                    container.clone(),
                );
                Some(ReportService::new(
                    ReportGenerator::new(provider.clone()),
                    publisher,
                    settings.sample_docx_path.clone(),
                ))
            }
            _ => {
                tracing::warn!(
                    "report workflow disabled, missing settings: {:?}",
                    settings.report_missing()
                );
                None
            }
        };

        Arc::new(AppState {
            paths,
            settings,
            conversations: ConversationStore::new(),
            chat,
            records,
            report,
        })
    }
}
