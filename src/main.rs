// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use docs_rag_node::{
    api::{start_server, AppState},
    assistant::Orchestrator,
    config::RagConfig,
    llm::OpenAiCompatibleClient,
    rag::DocumentRetriever,
    vector::{FlatIndex, HttpEmbedder},
    version,
};
use std::{env, path::PathBuf, sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// Documentation assistant: streams answers grounded in a local document index
#[derive(Parser, Debug)]
#[command(name = "docs-rag-node", version, about)]
struct Args {
    /// Listen address
    #[arg(long, env = "API_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(long, env = "API_PORT")]
    port: Option<u16>,

    /// Path of the JSON vector index
    #[arg(long, env = "VECTOR_INDEX_PATH")]
    index_path: Option<PathBuf>,

    /// Directory served for the web client
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenv::dotenv();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));

    let mut config = RagConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(index_path) = args.index_path {
        config.index_path = index_path;
    }
    if let Some(static_dir) = args.static_dir {
        config.static_dir = static_dir;
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    // Never log the key itself
    let key_len = config.llm.api_key.as_ref().map(|k| k.len()).unwrap_or(0);
    info!(
        "API key present: {} (length {})",
        config.has_api_key(),
        key_len
    );
    if !config.has_api_key() {
        warn!("OPENROUTER_API_KEY is not set; every ask will fail until it is configured");
    }

    let embedder = Arc::new(
        HttpEmbedder::new(
            &config.embedding.base_url,
            config.embedding.api_key.clone(),
            &config.embedding.model,
            Duration::from_secs(config.llm.timeout_secs),
        )
        .context("Failed to create embedding client")?,
    );

    let retriever = match FlatIndex::load(&config.index_path, embedder).await {
        Ok(index) => DocumentRetriever::new(Arc::new(index)),
        Err(e) => {
            error!("[{}] Document index could not be loaded: {}", e.error_code(), e);
            DocumentRetriever::unavailable(e.to_string())
        }
    };

    let model = OpenAiCompatibleClient::new(&config.llm).context("Failed to create chat model client")?;

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(model),
        Arc::new(retriever),
        config.assistant_config(),
    ));

    let state = AppState::new(orchestrator, config.static_dir.clone());
    start_server(state, &config.listen_addr())
        .await
        .with_context(|| format!("API server failed on {}", config.listen_addr()))?;

    Ok(())
}
