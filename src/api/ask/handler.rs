// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask API endpoint handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use tracing::{debug, warn};

use super::request::AskRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::streaming::sse_response;

/// POST /ask - Answer a question as a server-sent event stream
///
/// # Request
/// - `query`: Question text (required, non-blank)
///
/// # Response
/// `text/event-stream`, one `data: <fragment>\n\n` frame per fragment. When the
/// documents were searched, the first fragment is the search-results envelope.
///
/// # Errors
/// - 400 Bad Request: malformed JSON or empty query (no stream opened)
///
/// Failures after the stream has started arrive as a final
/// `An error occurred: ...` fragment.
pub async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected ask body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    if let Err(message) = request.validate() {
        warn!("Ask validation failed: {}", message);
        return Err(ApiError::ValidationError {
            field: "query".to_string(),
            message,
        });
    }

    debug!("Opening answer stream for {:?}", request.query);
    let fragments = state.orchestrator.ask_stream(request.query);
    Ok(sse_response(fragments))
}
