// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read-only document index loaded at startup
//!
//! The index is a JSON artifact produced offline from the source documents:
//!
//! ```json
//! {
//!   "model": "BAAI/bge-m3",
//!   "dimension": 1024,
//!   "entries": [{"content": "chunk text", "vector": [0.01, ...]}]
//! }
//! ```
//!
//! Search embeds the query and ranks every entry by squared L2 distance
//! (exhaustive flat scan), ascending.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::embedder::Embedder;
use super::embeddings::Embedding;
use super::errors::VectorError;

/// A retrieved span of document text and its distance to the query
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    /// Lower is more similar
    pub distance: f32,
}

/// Similarity search over embedded document chunks
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `k` chunks nearest to `query`, closest first
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>, VectorError>;

    /// Number of chunks held by the index
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk layout of the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    #[serde(default)]
    pub model: Option<String>,
    pub dimension: usize,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub content: String,
    pub vector: Vec<f32>,
}

/// Exhaustive L2 index held fully in memory
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<(String, Embedding)>,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for FlatIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatIndex")
            .field("dimension", &self.dimension)
            .field("entries", &self.entries.len())
            .field("embedder", &self.embedder.model_name())
            .finish()
    }
}

impl FlatIndex {
    /// Build from an already-parsed index file, validating every vector
    pub fn from_file(file: IndexFile, embedder: Arc<dyn Embedder>) -> Result<Self, VectorError> {
        if let Some(model) = &file.model {
            if model != embedder.model_name() {
                warn!(
                    "Index was built with embedding model '{}' but queries use '{}'",
                    model,
                    embedder.model_name()
                );
            }
        }

        let mut entries = Vec::with_capacity(file.entries.len());
        for (i, entry) in file.entries.into_iter().enumerate() {
            if entry.vector.len() != file.dimension {
                return Err(VectorError::DimensionMismatch {
                    entry: i,
                    expected: file.dimension,
                    actual: entry.vector.len(),
                });
            }
            let embedding = Embedding::new(entry.vector);
            if !embedding.is_finite() {
                return Err(VectorError::NonFiniteVector { entry: i });
            }
            entries.push((entry.content, embedding));
        }

        Ok(Self {
            dimension: file.dimension,
            entries,
            embedder,
        })
    }

    /// Load the index JSON from disk
    pub async fn load(path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self, VectorError> {
        let shown = path.display().to_string();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| VectorError::IndexRead {
                path: shown.clone(),
                source,
            })?;

        let file: IndexFile =
            serde_json::from_str(&raw).map_err(|e| VectorError::IndexParse {
                path: shown.clone(),
                reason: e.to_string(),
            })?;

        let index = Self::from_file(file, embedder)?;
        info!(
            "Loaded vector index from {}: {} chunks, {}D",
            shown,
            index.entries.len(),
            index.dimension
        );
        Ok(index)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Rank all entries against an already-embedded query
    pub fn search_vector(&self, query: &[f32], k: usize) -> Result<Vec<Chunk>, VectorError> {
        if query.len() != self.dimension {
            return Err(VectorError::QueryDimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<Chunk> = self
            .entries
            .iter()
            .map(|(content, embedding)| Chunk {
                content: content.clone(),
                distance: embedding.squared_l2_distance(query),
            })
            .collect();

        // Stable sort keeps file order among equal distances
        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }
}

#[async_trait]
impl VectorIndex for FlatIndex {
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>, VectorError> {
        let query_vector = self.embedder.embed(query).await?;
        self.search_vector(&query_vector, k)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
