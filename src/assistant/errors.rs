// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Failure taxonomy of a single ask request
//!
//! Once the stream is open every failure is delivered to the client as one
//! human-readable fragment built by [`AskError::to_fragment`].

use thiserror::Error;

use crate::llm::LlmError;
use crate::rag::RagError;

/// Prefix of the single error fragment ending a failed stream
pub const ERROR_FRAGMENT_PREFIX: &str = "An error occurred: ";

#[derive(Error, Debug)]
pub enum AskError {
    /// Rejected before any stream is opened
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Index not loaded or search failed
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(#[from] RagError),

    /// Missing credential, provider error or unusable tool-call arguments
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Decision call or a stream wait exceeded the model timeout
    #[error("Model timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Failure after fragments were already delivered
    #[error("Stream interrupted: {0}")]
    PartialStreamFailure(String),
}

impl From<LlmError> for AskError {
    fn from(err: LlmError) -> Self {
        AskError::ModelUnavailable(err.to_string())
    }
}

impl AskError {
    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AskError::InvalidRequest(msg) => msg.clone(),
            AskError::RetrievalUnavailable(err) => err.user_message(),
            AskError::ModelUnavailable(msg) => {
                format!("The language model is unavailable ({})", msg)
            }
            AskError::Timeout { seconds } => {
                format!("The language model did not respond within {} seconds", seconds)
            }
            AskError::PartialStreamFailure(msg) => {
                format!("The answer was interrupted: {}", msg)
            }
        }
    }

    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            AskError::InvalidRequest(_) => "INVALID_REQUEST",
            AskError::RetrievalUnavailable(_) => "RETRIEVAL_UNAVAILABLE",
            AskError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AskError::Timeout { .. } => "MODEL_TIMEOUT",
            AskError::PartialStreamFailure(_) => "PARTIAL_STREAM_FAILURE",
        }
    }

    /// The fragment sent to the client in place of further output
    pub fn to_fragment(&self) -> String {
        format!("{}{}", ERROR_FRAGMENT_PREFIX, self.user_message())
    }

    /// Reclassify a failure that happened after `sent` fragments went out
    pub fn after_fragments(self, sent: usize) -> Self {
        match self {
            AskError::PartialStreamFailure(_) => self,
            other if sent > 0 => AskError::PartialStreamFailure(other.user_message()),
            other => other,
        }
    }
}
