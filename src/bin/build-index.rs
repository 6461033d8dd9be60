// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use docs_rag_node::{
    config::{RagConfig, DEFAULT_INDEX_PATH},
    vector::{
        build_index, collect_text_files, read_documents, write_index, ChunkerConfig, HttpEmbedder,
    },
};
use std::{path::PathBuf, time::Duration};
use tracing::info;

/// Build the JSON vector index from text and markdown documents
#[derive(Parser, Debug)]
#[command(name = "build-index", version, about)]
struct Args {
    /// Files or directories to index (.txt, .md)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output index path
    #[arg(long, env = "VECTOR_INDEX_PATH", default_value = DEFAULT_INDEX_PATH)]
    output: PathBuf,

    /// Maximum chunk length in characters
    #[arg(long, default_value_t = docs_rag_node::vector::chunker::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters of overlap between consecutive chunks
    #[arg(long, default_value_t = docs_rag_node::vector::chunker::DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let chunker = ChunkerConfig {
        chunk_size: args.chunk_size,
        chunk_overlap: args.chunk_overlap,
    };
    chunker
        .validate()
        .map_err(|e| anyhow!("Invalid chunking options: {}", e))?;

    let config = RagConfig::from_env();
    let embedder = HttpEmbedder::new(
        &config.embedding.base_url,
        config.embedding.api_key.clone(),
        &config.embedding.model,
        Duration::from_secs(config.llm.timeout_secs),
    )
    .context("Failed to create embedding client")?;

    let files = collect_text_files(&args.inputs)?;
    if files.is_empty() {
        return Err(anyhow!("No .txt or .md files found in the given inputs"));
    }
    info!("Indexing {} files", files.len());

    let documents = read_documents(&files).await?;
    let index = build_index(&documents, &embedder, &chunker).await?;
    write_index(&args.output, &index).await?;

    info!(
        "Index ready: {} chunks from {} files",
        index.entries.len(),
        files.len()
    );
    Ok(())
}
