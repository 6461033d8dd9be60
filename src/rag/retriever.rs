// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval gate and relevance scoring
//!
//! Every search returns both the context handed back to the model and the full
//! scored result list for the client. Results are returned by value so each
//! request owns its own copy; nothing is remembered between calls.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::RagError;
use crate::vector::{Chunk, VectorIndex};

/// Distance below which a chunk counts as relevant (lower = more similar)
pub const RELEVANCE_THRESHOLD: f32 = 1.1;

/// Number of nearest chunks requested per search
pub const TOP_K: usize = 5;

/// Context returned to the model when nothing passes the threshold
pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant document found.";

/// Separator between relevant chunk contents in the model context
const CONTEXT_SEPARATOR: &str = "\n\n";

const PREVIEW_CHARS: usize = 100;

/// A retrieved chunk as reported to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub content: String,
    /// Index distance of the chunk
    pub score: f32,
    /// Always `score < RELEVANCE_THRESHOLD`
    pub relevant: bool,
}

impl SearchResult {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            content: chunk.content.clone(),
            score: chunk.distance,
            relevant: is_relevant(chunk.distance),
        }
    }
}

/// Pure relevance predicate; a distance exactly at the threshold is not relevant
pub fn is_relevant(distance: f32) -> bool {
    distance < RELEVANCE_THRESHOLD
}

/// Output of one search call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Text fed back to the model as the tool result
    pub context: String,
    /// Every retrieved chunk in retrieval order, relevant or not
    pub results: Vec<SearchResult>,
}

impl SearchOutcome {
    /// Score chunks and build the model context from the relevant ones
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let results: Vec<SearchResult> = chunks.iter().map(SearchResult::from_chunk).collect();

        let relevant: Vec<&str> = results
            .iter()
            .filter(|r| r.relevant)
            .map(|r| r.content.as_str())
            .collect();

        let context = if relevant.is_empty() {
            NO_RELEVANT_DOCUMENTS.to_string()
        } else {
            relevant.join(CONTEXT_SEPARATOR)
        };

        Self { context, results }
    }

    pub fn relevant_count(&self) -> usize {
        self.results.iter().filter(|r| r.relevant).count()
    }
}

/// Searches the document index, or reports why it cannot
pub struct DocumentRetriever {
    index: Result<Arc<dyn VectorIndex>, String>,
}

impl DocumentRetriever {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index: Ok(index) }
    }

    /// Retriever for an index that failed to load; every search fails
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            index: Err(reason.into()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.index.is_ok()
    }

    pub fn chunk_count(&self) -> usize {
        self.index.as_ref().map(|i| i.len()).unwrap_or(0)
    }

    /// Fetch the top chunks for `query` and gate them on the relevance threshold
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, RagError> {
        let index = self
            .index
            .as_ref()
            .map_err(|reason| RagError::IndexNotLoaded(reason.clone()))?;

        info!("Document search: {:?}", query);
        let chunks = index.similarity_search_with_score(query, TOP_K).await?;

        for chunk in &chunks {
            debug!(
                "distance {:.4} | {}...",
                chunk.distance,
                preview(&chunk.content)
            );
        }

        let outcome = SearchOutcome::from_chunks(&chunks);
        if outcome.relevant_count() == 0 {
            warn!(
                "No chunk under distance {} for {:?} ({} retrieved)",
                RELEVANCE_THRESHOLD,
                query,
                chunks.len()
            );
        } else {
            info!(
                "Relevant chunks: {}/{}",
                outcome.relevant_count(),
                chunks.len()
            );
        }

        Ok(outcome)
    }
}

fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}
