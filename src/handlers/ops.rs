//! Liveness endpoint. The relay holds no database or broker connections,
//! so there is nothing deeper to probe than "the process answers".

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::state::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
