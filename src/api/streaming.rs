// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;

/// One SSE frame per fragment; the fragment goes out verbatim, embedded
/// newlines included, so clients must read up to the blank-line terminator.
pub fn format_sse(fragment: &str) -> String {
    format!("data: {}\n\n", fragment)
}

/// `text/event-stream` response over a fragment stream. The body ends when
/// the stream does; dropping the body drops the stream.
pub fn sse_response<S>(fragments: S) -> Response
where
    S: Stream<Item = String> + Send + 'static,
{
    let body = Body::from_stream(fragments.map(|f| Ok::<_, Infallible>(format_sse(&f))));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}
