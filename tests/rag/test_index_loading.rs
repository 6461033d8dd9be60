// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Index file loading and flat L2 search through the retriever

use crate::common::FixedEmbedder;
use docs_rag_node::rag::{DocumentRetriever, RagError, NO_RELEVANT_DOCUMENTS};
use docs_rag_node::vector::{FlatIndex, IndexEntry, IndexFile, VectorError, VectorIndex};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const FEES_QUERY: &str = "What are the account fees?";
const WEATHER_QUERY: &str = "Will it rain tomorrow?";

fn embedder() -> Arc<FixedEmbedder> {
    Arc::new(FixedEmbedder::new(&[
        (FEES_QUERY, vec![0.0, 0.0]),
        (WEATHER_QUERY, vec![5.0, 5.0]),
    ]))
}

fn write_index(file: &IndexFile) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(serde_json::to_string(file).unwrap().as_bytes())
        .unwrap();
    tmp.flush().unwrap();
    tmp
}

fn fees_index() -> IndexFile {
    IndexFile {
        model: Some("BAAI/bge-m3".to_string()),
        dimension: 2,
        entries: vec![
            IndexEntry {
                content: "Account maintenance costs 5 € per month.".to_string(),
                vector: vec![0.6, 0.2],
            },
            IndexEntry {
                content: "Branch opening hours are 9 to 17.".to_string(),
                vector: vec![1.2, 0.3],
            },
        ],
    }
}

#[tokio::test]
async fn test_load_and_search_index_file() {
    let tmp = write_index(&fees_index());
    let index = FlatIndex::load(tmp.path(), embedder()).await.unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.dimension(), 2);

    let chunks = index.similarity_search_with_score(FEES_QUERY, 5).await.unwrap();
    assert_eq!(chunks.len(), 2);
    assert!((chunks[0].distance - 0.4).abs() < 1e-4);
    assert!((chunks[1].distance - 1.53).abs() < 1e-4);
}

#[tokio::test]
async fn test_retriever_gates_loaded_index() {
    let tmp = write_index(&fees_index());
    let index = FlatIndex::load(tmp.path(), embedder()).await.unwrap();
    let retriever = DocumentRetriever::new(Arc::new(index));

    let outcome = retriever.search(FEES_QUERY).await.unwrap();
    assert_eq!(outcome.context, "Account maintenance costs 5 € per month.");
    assert_eq!(outcome.results.len(), 2);
    assert!(outcome.results[0].relevant);
    assert!(!outcome.results[1].relevant);

    let outcome = retriever.search(WEATHER_QUERY).await.unwrap();
    assert_eq!(outcome.context, NO_RELEVANT_DOCUMENTS);
    assert!(outcome.results.iter().all(|r| !r.relevant));
}

#[tokio::test]
async fn test_embedding_failure_surfaces_as_search_error() {
    let tmp = write_index(&fees_index());
    let index = FlatIndex::load(tmp.path(), embedder()).await.unwrap();
    let retriever = DocumentRetriever::new(Arc::new(index));

    let err = retriever.search("unknown text").await.unwrap_err();
    assert!(matches!(err, RagError::SearchFailed(VectorError::Embedding(_))));
    assert_eq!(err.error_code(), "EMBEDDING_FAILED");
}

#[tokio::test]
async fn test_malformed_index_file() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(b"{\"dimension\": 2, \"entries\": [").unwrap();
    tmp.flush().unwrap();

    let err = FlatIndex::load(tmp.path(), embedder()).await.unwrap_err();
    assert_eq!(err.error_code(), "INDEX_PARSE_ERROR");
    assert!(err.is_load_error());
}

#[tokio::test]
async fn test_wrong_dimension_entry_rejected() {
    let mut file = fees_index();
    file.entries[0].vector = vec![0.1];
    let tmp = write_index(&file);

    let err = FlatIndex::load(tmp.path(), embedder()).await.unwrap_err();
    assert!(matches!(err, VectorError::DimensionMismatch { entry: 0, .. }));
}

#[tokio::test]
async fn test_empty_index_yields_sentinel() {
    let tmp = write_index(&IndexFile {
        model: None,
        dimension: 2,
        entries: Vec::new(),
    });
    let index = FlatIndex::load(tmp.path(), embedder()).await.unwrap();
    assert!(index.is_empty());

    let retriever = DocumentRetriever::new(Arc::new(index));
    let outcome = retriever.search(FEES_QUERY).await.unwrap();
    assert_eq!(outcome.context, NO_RELEVANT_DOCUMENTS);
    assert!(outcome.results.is_empty());
}
