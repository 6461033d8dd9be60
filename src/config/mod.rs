// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration loaded from the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::assistant::{AssistantConfig, DEFAULT_SYSTEM_PROMPT};

pub const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-m3";
pub const DEFAULT_INDEX_PATH: &str = "./vector_db/index.json";

/// Chat model provider settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// OpenAI-compatible API root, e.g. `https://openrouter.ai/api/v1`
    pub base_url: String,
    /// Bearer credential; absence only fails the first completion call
    pub api_key: Option<String>,
    pub model: String,
    /// Connect timeout and per-wait model timeout
    pub timeout_secs: u64,
}

/// Query embedding endpoint settings
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Must match the model the index was built with
    pub model: String,
}

/// Configuration for the documentation assistant node
#[derive(Debug, Clone)]
pub struct RagConfig {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    /// JSON vector index built offline
    pub index_path: PathBuf,
    pub system_prompt: String,
    pub host: String,
    pub port: u16,
    /// Directory served for `/` and other static paths
    pub static_dir: PathBuf,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl RagConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let llm_base_url =
            non_empty_var("LLM_BASE_URL").unwrap_or_else(|| defaults.llm.base_url.clone());
        let llm_api_key = non_empty_var("OPENROUTER_API_KEY");

        Self {
            llm: LlmConfig {
                base_url: llm_base_url.clone(),
                api_key: llm_api_key.clone(),
                model: non_empty_var("LLM_MODEL").unwrap_or(defaults.llm.model),
                timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.llm.timeout_secs),
            },
            embedding: EmbeddingConfig {
                // Embeddings go through the chat provider unless pointed elsewhere
                base_url: non_empty_var("EMBEDDING_BASE_URL").unwrap_or(llm_base_url),
                api_key: non_empty_var("EMBEDDING_API_KEY").or(llm_api_key),
                model: non_empty_var("EMBEDDING_MODEL").unwrap_or(defaults.embedding.model),
            },
            index_path: non_empty_var("VECTOR_INDEX_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.index_path),
            system_prompt: non_empty_var("SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            host: non_empty_var("API_HOST").unwrap_or(defaults.host),
            port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            static_dir: non_empty_var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.llm.timeout_secs == 0 {
            return Err("Model timeout must be greater than 0".to_string());
        }
        if self.llm.model.trim().is_empty() {
            return Err("LLM model name must not be empty".to_string());
        }
        for (name, url) in [
            ("LLM_BASE_URL", &self.llm.base_url),
            ("EMBEDDING_BASE_URL", &self.embedding.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }
        if self.system_prompt.trim().is_empty() {
            return Err("System prompt must not be empty".to_string());
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.llm.api_key.is_some()
    }

    /// Socket address string for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            system_prompt: self.system_prompt.clone(),
            model_timeout: Duration::from_secs(self.llm.timeout_secs),
            ..AssistantConfig::default()
        }
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                base_url: DEFAULT_LLM_BASE_URL.to_string(),
                api_key: None,
                model: DEFAULT_LLM_MODEL.to_string(),
                timeout_secs: 60,
            },
            embedding: EmbeddingConfig {
                base_url: DEFAULT_LLM_BASE_URL.to_string(),
                api_key: None,
                model: DEFAULT_EMBEDDING_MODEL.to_string(),
            },
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("."),
        }
    }
}
