// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors from the chat-completion provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured; raised on first use, never at startup
    #[error("No API key configured for the chat model provider")]
    MissingApiKey,

    /// Transport-level failure reaching the provider
    #[error("Provider connection failed: {0}")]
    Http(String),

    /// Provider answered with a non-success status
    #[error("Provider API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Streaming body broke off or carried an error event
    #[error("Completion stream failed: {0}")]
    Stream(String),
}

impl LlmError {
    /// Whether the provider rejected our credential
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::MissingApiKey)
            || matches!(self, LlmError::Api { status, .. } if *status == 401 || *status == 403)
    }
}
