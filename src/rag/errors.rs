// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for document retrieval
//!
//! Both variants surface to the client as a retrieval-unavailable condition:
//! - the index never loaded at startup
//! - a search against a loaded index failed (embedding endpoint down, bad query vector)

use thiserror::Error;

use crate::vector::VectorError;

/// Errors that can occur while searching the document index
#[derive(Error, Debug)]
pub enum RagError {
    /// Index failed to load at startup; every search fails with this
    #[error("Document index is not loaded: {0}")]
    IndexNotLoaded(String),

    /// Search call against the loaded index failed
    #[error("Document search failed: {0}")]
    SearchFailed(#[from] VectorError),
}

impl RagError {
    /// Get user-friendly error message for the answer stream
    pub fn user_message(&self) -> String {
        match self {
            RagError::IndexNotLoaded(_) => {
                "Document search is unavailable: the document index could not be loaded"
                    .to_string()
            }
            RagError::SearchFailed(VectorError::Embedding(_)) => {
                "Document search is unavailable: the embedding service did not respond"
                    .to_string()
            }
            RagError::SearchFailed(_) => "Document search failed".to_string(),
        }
    }

    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            RagError::IndexNotLoaded(_) => "INDEX_NOT_LOADED",
            RagError::SearchFailed(inner) => inner.error_code(),
        }
    }
}
