//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use super::blocking;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    analyses: Option<usize>,
}

/// Liveness plus a readability check of the record store
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let records = state.records.clone();
    let loaded = blocking(move || Ok(records.load()?)).await;
    let (status, analyses) = match loaded {
        Ok(records) => ("healthy", Some(records.len())),
        Err(e) => {
            tracing::warn!("Health check: {:?}", e);
            ("degraded", None)
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        analyses,
    })
}
