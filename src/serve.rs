//! Read-only HTTP API over the stored events document.
//!
//! The scraper and this server share nothing but the events file: the
//! scraper replaces it atomically, the server reads it fresh on every
//! request. A missing or corrupt file degrades to an empty list rather
//! than an error, which is the contract the calendar front end relies on.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::store::EventStore;

/// Shared state: just the store handle. Requests hit the file directly so
/// a scrape landing mid-flight is visible without a restart.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: EventStore,
}

/// Failures surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Something the degrade-to-empty read path could not absorb. Clients
    /// get a fixed message; the detail goes to the log.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self::Internal(detail) = self;
        error!(error = %detail, "Request failed");
        let body = serde_json::json!({"error": "Internal server error"});
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Build the complete router for the events API.
///
/// - `GET /` -- minimal HTML index
/// - `GET /health` -- liveness probe
/// - `GET /api/events` -- the stored events array
///
/// CORS allows any origin so the calendar front end can be hosted
/// anywhere.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/events", get(get_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Wembley Events API</title></head>
<body>
  <h1>Wembley Events API</h1>
  <ul>
    <li><a href="/api/events">/api/events</a></li>
    <li><a href="/health">/health</a></li>
  </ul>
</body>
</html>"#,
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Serve the stored events array verbatim.
///
/// Read failures already degrade to an empty list inside
/// [`EventStore::load`]; the error branch here only fires if the loaded
/// events cannot be re-serialized.
async fn get_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let events = state.store.load().await;
    let body = serde_json::to_value(&events).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(body))
}
