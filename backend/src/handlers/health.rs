//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint handler; 503 when the database is unreachable
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status, db_status) = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::error!("Health check failed - DB query error: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    let body = HealthResponse {
        status: if status.is_success() { "ok" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
        environment: state.config.environment.clone(),
        timestamp: Utc::now(),
    };
    (status, Json(body))
}
