use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::history::{ConversationMessage, QuickQuestion};
use crate::rag::{ChatService, QueryType};
use crate::search::SearchMode;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = state.conversations.create_session();
    Json(json!({"session_id": session_id}))
}

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.conversations.end_session(&session_id) {
        return Err(ApiError::NotFound("세션을 찾을 수 없습니다.".to_string()));
    }
    Ok(Json(json!({"success": true})))
}

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = state.conversations.messages(&session_id)?;
    Ok(Json(json!({"messages": messages})))
}

/// Queue a quick question for the next interaction cycle. A previously
/// queued one is replaced.
pub async fn enqueue_command(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<QuickQuestion>,
) -> Result<impl IntoResponse, ApiError> {
    let command = payload.into_command();
    if command.query.is_empty() {
        return Err(ApiError::BadRequest("질문이 비어있습니다.".to_string()));
    }
    let query = command.query.clone();
    state.conversations.enqueue(&session_id, command)?;
    Ok(Json(json!({"queued": true, "query": query})))
}

/// One interaction cycle: the queued quick question (if any) is processed
/// first, then the typed query.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<ChatApiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .chat
        .as_ref()
        .ok_or_else(|| ApiError::ConfigMissing(state.settings.chat_missing()))?;

    if !(1..=10).contains(&payload.top_k) {
        return Err(ApiError::BadRequest(
            "검색 결과 수는 1에서 10 사이여야 합니다.".to_string(),
        ));
    }

    // make sure the session exists before touching the queue
    state.conversations.messages(&session_id)?;

    let typed_query = payload
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    let pending = state.conversations.take_pending(&session_id);
    if pending.is_none() && typed_query.is_none() {
        return Err(ApiError::BadRequest("질문이 비어있습니다.".to_string()));
    }

    let mut turns: Vec<Value> = Vec::new();

    if let Some(command) = pending {
        turns.push(
            run_turn(
                &state,
                service,
                &session_id,
                &command.query,
                command.query_type,
                &payload,
            )
            .await?,
        );
    }

    if let Some(query) = typed_query {
        turns.push(
            run_turn(
                &state,
                service,
                &session_id,
                &query,
                QueryType::Default,
                &payload,
            )
            .await?,
        );
    }

    Ok(Json(json!({"turns": turns})))
}

async fn run_turn(
    state: &Arc<AppState>,
    service: &ChatService,
    session_id: &str,
    query: &str,
    query_type: QueryType,
    payload: &ChatApiRequest,
) -> Result<Value, ApiError> {
    state
        .conversations
        .append(session_id, ConversationMessage::user(query))?;

    let outcome = service
        .respond(query, payload.mode, payload.top_k, query_type)
        .await;

    state
        .conversations
        .append(session_id, ConversationMessage::assistant(&outcome.answer))?;

    Ok(json!({
        "query": query,
        "query_type": query_type,
        "answer": outcome.answer,
        "documents": outcome.retrieval.documents,
        "notice": outcome.retrieval.notice,
    }))
}
