// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Request isolation and client-disconnect cancellation

use crate::common::{orchestrator, AnswerMode, Decision, QueryEchoIndex, ScriptedModel};
use docs_rag_node::assistant::parse_envelope;
use docs_rag_node::rag::DocumentRetriever;
use futures::StreamExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_never_share_results() {
    let model = Arc::new(
        ScriptedModel::new(Decision::SearchUserQuery, &[])
            .with_mode(AnswerMode::EchoToolMessages),
    );
    let retriever = DocumentRetriever::new(Arc::new(QueryEchoIndex {
        delay: Duration::from_millis(20),
    }));
    let orch = orchestrator(model, retriever);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orch = Arc::clone(&orch);
            tokio::spawn(async move {
                let query = format!("topic {}", i);
                let fragments: Vec<String> = orch.ask_stream(query.clone()).collect().await;
                (query, fragments)
            })
        })
        .collect();

    for handle in handles {
        let (query, fragments) = handle.await.unwrap();
        let expected = format!("doc about {}", query);

        let results = parse_envelope(&fragments[0]).expect("envelope first");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, expected);
        assert_eq!(fragments[1..], [expected]);
    }
}

#[tokio::test]
async fn test_client_disconnect_closes_model_stream() {
    let model = Arc::new(
        ScriptedModel::new(Decision::Answer, &["first"]).with_mode(AnswerMode::StallAfterDeltas),
    );
    let dropped = model.stream_dropped();
    let orch = orchestrator(model, DocumentRetriever::unavailable("unused"));

    let mut stream = orch.ask_stream("hello".to_string());
    assert_eq!(stream.next().await.as_deref(), Some("first"));
    assert!(!dropped.load(Ordering::SeqCst));

    drop(stream);

    let mut released = false;
    for _ in 0..100 {
        if dropped.load(Ordering::SeqCst) {
            released = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(released, "model stream still open after client disconnect");
}

#[tokio::test]
async fn test_slow_consumer_receives_everything_in_order() {
    let deltas: Vec<String> = (0..100).map(|i| format!("t{} ", i)).collect();
    let refs: Vec<&str> = deltas.iter().map(String::as_str).collect();
    let model = Arc::new(
        ScriptedModel::new(Decision::Answer, &refs).with_delta_delay(Duration::from_micros(50)),
    );
    let orch = orchestrator(model, DocumentRetriever::unavailable("unused"));

    let mut stream = orch.ask_stream("count".to_string());
    let mut received = Vec::new();
    while let Some(fragment) = stream.next().await {
        tokio::time::sleep(Duration::from_micros(100)).await;
        received.push(fragment);
    }
    assert_eq!(received, deltas);
}
