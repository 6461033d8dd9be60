// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for loading and querying the document vector index

use thiserror::Error;

/// Errors raised by the vector index and the query embedder
#[derive(Error, Debug)]
pub enum VectorError {
    /// Index file could not be read
    #[error("Failed to read vector index at {path}: {source}")]
    IndexRead {
        path: String,
        source: std::io::Error,
    },

    /// Index file is not valid index JSON
    #[error("Failed to parse vector index at {path}: {reason}")]
    IndexParse { path: String, reason: String },

    /// An entry's vector does not match the declared index dimension
    #[error("Dimension mismatch in entry {entry}: expected {expected}D, got {actual}D")]
    DimensionMismatch {
        entry: usize,
        expected: usize,
        actual: usize,
    },

    /// An entry carries NaN or infinite components
    #[error("Entry {entry} contains non-finite vector values")]
    NonFiniteVector { entry: usize },

    /// Query embedding has the wrong dimension for this index
    #[error("Query dimension mismatch: index is {expected}D, query embedding is {actual}D")]
    QueryDimensionMismatch { expected: usize, actual: usize },

    /// The embedding endpoint failed or returned an unusable response
    #[error("Embedding request failed: {0}")]
    Embedding(String),

    /// Index file could not be written
    #[error("Failed to write vector index at {path}: {source}")]
    IndexWrite {
        path: String,
        source: std::io::Error,
    },

    /// No text to index
    #[error("No document text to index")]
    EmptyCorpus,
}

impl VectorError {
    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            VectorError::IndexRead { .. } => "INDEX_READ_FAILED",
            VectorError::IndexParse { .. } => "INDEX_PARSE_ERROR",
            VectorError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            VectorError::NonFiniteVector { .. } => "NON_FINITE_VECTOR",
            VectorError::QueryDimensionMismatch { .. } => "QUERY_DIMENSION_MISMATCH",
            VectorError::Embedding(_) => "EMBEDDING_FAILED",
            VectorError::IndexWrite { .. } => "INDEX_WRITE_FAILED",
            VectorError::EmptyCorpus => "EMPTY_CORPUS",
        }
    }

    /// Whether the error happened while loading the index (as opposed to searching it)
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            VectorError::IndexRead { .. }
                | VectorError::IndexParse { .. }
                | VectorError::DimensionMismatch { .. }
                | VectorError::NonFiniteVector { .. }
        )
    }
}
