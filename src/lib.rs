// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod assistant;
pub mod config;
pub mod llm;
pub mod rag;
pub mod vector;
pub mod version;

// Re-export main types
pub use api::{create_app, AppState};
pub use assistant::{AskError, AssistantConfig, Orchestrator};
pub use config::RagConfig;
pub use llm::{ChatModel, OpenAiCompatibleClient};
pub use rag::{DocumentRetriever, SearchResult};
pub use vector::{Embedder, FlatIndex, HttpEmbedder, VectorIndex};
