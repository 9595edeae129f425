//! Query handler

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::AppState;
use drishti_common::errors::{AppError, Result};
use drishti_context::QueryAnswer;

/// Query request
#[derive(Debug, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(min = 1))]
    pub query: String,

    /// Number of chunks to retrieve
    #[serde(default = "default_top_k")]
    #[validate(range(min = 1, max = 100))]
    pub top_k: usize,

    /// Ask the generative service instead of summarizing locally
    #[serde(default)]
    pub use_gemini: bool,
}

fn default_top_k() -> usize { 3 }

impl QueryRequest {
    /// Parse a body as JSON regardless of its content type
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| AppError::InvalidFormat {
            message: format!("request body is not valid JSON: {}", e),
        })?;

        let has_query = value
            .get("query")
            .and_then(Value::as_str)
            .is_some_and(|q| !q.trim().is_empty());
        if !has_query {
            return Err(AppError::MissingField {
                field: "query".to_string(),
            });
        }

        let request: QueryRequest = serde_json::from_value(value).map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: None,
        })?;

        request.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: None,
        })?;

        Ok(request)
    }
}

/// Answer a query over the loaded corpus
pub async fn query(State(state): State<AppState>, body: Bytes) -> Result<Json<QueryAnswer>> {
    let request = QueryRequest::from_body(&body)?;

    tracing::debug!(query = %request.query, top_k = request.top_k, use_gemini = request.use_gemini, "Received query");

    let answer = state
        .orchestrator
        .answer(&request.query, state.corpus.chunks(), request.top_k, request.use_gemini)
        .await?;

    Ok(Json(answer))
}
