// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Relevance gate properties over arbitrary distance lists

use crate::common::static_retriever;
use docs_rag_node::rag::{is_relevant, NO_RELEVANT_DOCUMENTS, RELEVANCE_THRESHOLD, TOP_K};

#[tokio::test]
async fn test_relevant_flag_always_matches_threshold() {
    let distances = [0.0, 0.3, 1.0999, 1.1, 1.1001, 2.5, f32::MAX];
    for window in distances.chunks(TOP_K) {
        let chunks: Vec<(String, f32)> = window
            .iter()
            .enumerate()
            .map(|(i, d)| (format!("chunk {}", i), *d))
            .collect();
        let refs: Vec<(&str, f32)> = chunks.iter().map(|(c, d)| (c.as_str(), *d)).collect();

        let outcome = static_retriever(&refs).search("q").await.unwrap();
        for result in &outcome.results {
            assert_eq!(result.relevant, result.score < RELEVANCE_THRESHOLD);
            assert_eq!(result.relevant, is_relevant(result.score));
        }
    }
}

#[tokio::test]
async fn test_threshold_exactly_is_excluded_from_context() {
    let outcome = static_retriever(&[("edge", 1.1)]).search("q").await.unwrap();
    assert_eq!(outcome.context, NO_RELEVANT_DOCUMENTS);
    assert_eq!(outcome.results.len(), 1);
    assert!(!outcome.results[0].relevant);
}

#[tokio::test]
async fn test_all_irrelevant_reports_every_result() {
    let chunks = [("a", 1.2), ("b", 1.3), ("c", 1.4), ("d", 1.5), ("e", 1.6)];
    let outcome = static_retriever(&chunks).search("q").await.unwrap();
    assert_eq!(outcome.context, NO_RELEVANT_DOCUMENTS);
    assert_eq!(outcome.results.len(), TOP_K);
    assert!(outcome.results.iter().all(|r| !r.relevant));
}

#[tokio::test]
async fn test_results_keep_retrieval_order() {
    let chunks = [("x", 0.9), ("y", 0.1), ("z", 1.7)];
    let outcome = static_retriever(&chunks).search("q").await.unwrap();
    let contents: Vec<&str> = outcome.results.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["x", "y", "z"]);
    assert_eq!(outcome.context, "x\n\ny");
}
