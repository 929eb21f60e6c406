use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "initialized": true
    }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let chat_missing = state.settings.chat_missing();
    let report_missing = state.settings.report_missing();

    Json(json!({
        "chat": {
            "ready": state.chat.is_some(),
            "missing_settings": chat_missing,
        },
        "report": {
            "ready": state.report.is_some(),
            "missing_settings": report_missing,
            "database_connected": state.records.is_some(),
        }
    }))
}
