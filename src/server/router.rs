use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, health, reports};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// This function sets up:
/// - CORS middleware
/// - Health check endpoints
/// - Chat workflow endpoints (sessions, commands, chat)
/// - Report workflow endpoints (records, reports)
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/status", get(health::get_status))
        .route("/api/sessions", post(chat::create_session))
        .route(
            "/api/sessions/:session_id",
            axum::routing::delete(chat::end_session),
        )
        .route(
            "/api/sessions/:session_id/messages",
            get(chat::get_messages),
        )
        .route(
            "/api/sessions/:session_id/commands",
            post(chat::enqueue_command),
        )
        .route("/api/sessions/:session_id/chat", post(chat::chat))
        .route("/api/records", get(reports::list_records))
        .route("/api/records/:record_id", get(reports::get_record))
        .route("/api/reports", post(reports::create_report))
        .with_state(state)
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer() -> CorsLayer {
    let allow_origin = AllowOrigin::list(
        default_local_origins()
            .into_iter()
            .filter_map(|origin| HeaderValue::from_str(&origin).ok())
            .collect::<Vec<_>>(),
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
        "http://127.0.0.1:8000".to_string(),
    ]
}
