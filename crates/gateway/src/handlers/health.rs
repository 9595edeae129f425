//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub docs: usize,
    pub chunks: usize,
    pub chunk_source: String,
    pub version: &'static str,
}

/// Liveness check with corpus size
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config.observability.service_name.clone(),
        docs: state.corpus.document_count(),
        chunks: state.corpus.chunk_count(),
        chunk_source: state.corpus.source().to_string(),
        version: drishti_common::VERSION,
    })
}
