use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::records::EmailRecordStore;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub record_id: i64,
}

fn record_store(state: &AppState) -> Result<&EmailRecordStore, ApiError> {
    state
        .records
        .as_ref()
        .ok_or_else(|| ApiError::Internal("데이터베이스 연결에 실패했습니다.".to_string()))
}

pub async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let records = record_store(&state)?.list().await?;
    Ok(Json(json!({"records": records})))
}

pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(record_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let record = record_store(&state)?
        .get(record_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("레코드를 찾을 수 없습니다.".to_string()))?;
    Ok(Json(json!({"record": record})))
}

/// Run the report pipeline for one stored email record.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .report
        .as_ref()
        .ok_or_else(|| ApiError::ConfigMissing(state.settings.report_missing()))?;

    let record = record_store(&state)?
        .get(payload.record_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("레코드를 찾을 수 없습니다.".to_string()))?;

    let outcome = service.produce(&record).await;
    Ok(Json(outcome))
}
