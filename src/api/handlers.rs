// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the document index failed to load
    pub status: String,
    pub version: String,
    pub index_loaded: bool,
    pub chunk_count: usize,
    pub model: String,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let retriever = state.orchestrator.retriever();
    let index_loaded = retriever.is_available();

    Json(HealthResponse {
        status: if index_loaded { "ok" } else { "degraded" }.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        index_loaded,
        chunk_count: retriever.chunk_count(),
        model: state.orchestrator.model_name().to_string(),
    })
}
