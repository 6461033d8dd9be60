// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod ask;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod streaming;

pub use ask::{ask_handler, AskRequest};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
pub use streaming::{format_sse, sse_response};
