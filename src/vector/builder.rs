// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Offline index construction: chunk documents, embed chunks, write JSON

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::chunker::{split_text, ChunkerConfig};
use super::embedder::Embedder;
use super::errors::VectorError;
use super::index::{IndexEntry, IndexFile};

/// Source file extensions picked up when indexing a directory
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// A source document: where it came from and its full text
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
}

/// Expand files and directories into a sorted list of text files
pub fn collect_text_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, VectorError> {
    let mut files = Vec::new();
    for input in inputs {
        collect_into(input, &mut files)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_into(path: &Path, files: &mut Vec<PathBuf>) -> Result<(), VectorError> {
    let read_error = |source| VectorError::IndexRead {
        path: path.display().to_string(),
        source,
    };

    if path.is_dir() {
        for entry in std::fs::read_dir(path).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            collect_into(&entry.path(), files)?;
        }
    } else if path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
    {
        files.push(path.to_path_buf());
    } else {
        debug!("Skipping non-text file {}", path.display());
    }
    Ok(())
}

pub async fn read_documents(files: &[PathBuf]) -> Result<Vec<SourceDocument>, VectorError> {
    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        let text = tokio::fs::read_to_string(file)
            .await
            .map_err(|source| VectorError::IndexRead {
                path: file.display().to_string(),
                source,
            })?;
        documents.push(SourceDocument {
            source: file.display().to_string(),
            text,
        });
    }
    Ok(documents)
}

/// Chunk and embed every document, in input order
pub async fn build_index(
    documents: &[SourceDocument],
    embedder: &dyn Embedder,
    chunker: &ChunkerConfig,
) -> Result<IndexFile, VectorError> {
    let mut entries = Vec::new();
    let mut dimension: Option<usize> = None;

    for document in documents {
        let chunks = split_text(&document.text, chunker);
        info!("{}: {} chunks", document.source, chunks.len());

        for content in chunks {
            let vector = embedder.embed(&content).await?;
            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(VectorError::DimensionMismatch {
                    entry: entries.len(),
                    expected,
                    actual: vector.len(),
                });
            }
            if !vector.iter().all(|v| v.is_finite()) {
                return Err(VectorError::NonFiniteVector {
                    entry: entries.len(),
                });
            }
            entries.push(IndexEntry { content, vector });
        }
    }

    let dimension = dimension.ok_or(VectorError::EmptyCorpus)?;
    Ok(IndexFile {
        model: Some(embedder.model_name().to_string()),
        dimension,
        entries,
    })
}

pub async fn write_index(path: &Path, file: &IndexFile) -> Result<(), VectorError> {
    let write_error = |source| VectorError::IndexWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let json = serde_json::to_vec(file).map_err(|e| VectorError::IndexParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tokio::fs::write(path, json).await.map_err(write_error)?;

    info!(
        "Wrote {} entries ({}D) to {}",
        file.entries.len(),
        file.dimension,
        path.display()
    );
    Ok(())
}
