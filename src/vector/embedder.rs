// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query embedding via an OpenAI-compatible `/embeddings` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::errors::VectorError;

/// Turns query text into a vector in the same space as the index entries
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError>;

    /// Name of the embedding model, checked against the index metadata at load time
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Embedder backed by a remote OpenAI-compatible embeddings API
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model_name: String,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        model_name: &str,
        timeout: Duration,
    ) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Embedding client configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|k| !k.is_empty()),
            model_name: model_name.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, VectorError> {
        let request = EmbeddingRequest {
            model: &self.model_name,
            input: text,
        };

        let mut builder = self
            .client
            .post(format!("{}/embeddings", self.endpoint))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!("HTTP {}: {}", status, body)));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| VectorError::Embedding("response contained no embedding".to_string()))?;

        debug!("Embedded query ({} chars) into {}D vector", text.len(), vector.len());
        Ok(vector)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
