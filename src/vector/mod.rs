// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod builder;
pub mod chunker;
pub mod embedder;
pub mod embeddings;
pub mod errors;
pub mod index;

pub use builder::{build_index, collect_text_files, read_documents, write_index, SourceDocument};
pub use chunker::{split_text, ChunkerConfig};
pub use embedder::{Embedder, HttpEmbedder};
pub use embeddings::Embedding;
pub use errors::VectorError;
pub use index::{Chunk, FlatIndex, IndexEntry, IndexFile, VectorIndex};
