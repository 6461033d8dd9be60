// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// RAG (Retrieval-Augmented Generation) module
// Relevance gating of index results and model context assembly

pub mod errors;
pub mod retriever;

pub use errors::RagError;
pub use retriever::{
    is_relevant, DocumentRetriever, SearchOutcome, SearchResult, NO_RELEVANT_DOCUMENTS,
    RELEVANCE_THRESHOLD, TOP_K,
};
