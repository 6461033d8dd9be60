// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Decide / retrieve / answer pipeline against a scripted model

use crate::common::{
    collect_fragments, orchestrator, orchestrator_with_config, search_call, static_retriever,
    AnswerMode, Decision, QueryEchoIndex, ScriptedModel,
};
use docs_rag_node::assistant::{parse_envelope, AssistantConfig, SEARCH_RESULTS_START};
use docs_rag_node::llm::Role;
use docs_rag_node::rag::{DocumentRetriever, NO_RELEVANT_DOCUMENTS};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_greeting_streams_without_envelope() {
    let model = Arc::new(ScriptedModel::new(
        Decision::Answer,
        &["Hello", "! How can I help?"],
    ));
    let orch = orchestrator(Arc::clone(&model), static_retriever(&[("unused", 0.1)]));

    let fragments = collect_fragments(&orch, "hello").await;
    assert_eq!(fragments, vec!["Hello", "! How can I help?"]);
    assert!(fragments.iter().all(|f| !f.starts_with(SEARCH_RESULTS_START)));

    // Decision offers exactly the search tool over [system, user]
    let decisions = model.decision_calls.lock().unwrap().clone();
    assert_eq!(decisions.len(), 1);
    let (messages, tools) = &decisions[0];
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "search_documents");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content.as_deref(), Some("hello"));

    // Direct answer streams the same conversation
    assert_eq!(model.last_stream_messages(), *messages);
}

#[tokio::test]
async fn test_technical_query_reports_all_results_and_feeds_relevant_only() {
    let model = Arc::new(
        ScriptedModel::new(
            Decision::Tools(vec![search_call("call_1", "minimum balance")]),
            &[],
        )
        .with_mode(AnswerMode::EchoToolMessages),
    );
    let retriever = static_retriever(&[
        ("Minimum balance is 100 €.", 0.4),
        ("Unrelated card terms.", 1.5),
    ]);
    let orch = orchestrator(Arc::clone(&model), retriever);

    let fragments = collect_fragments(&orch, "What is the minimum balance?").await;
    assert_eq!(fragments.len(), 2);

    let results = parse_envelope(&fragments[0]).expect("first fragment is the envelope");
    assert_eq!(results.len(), 2);
    assert!(results[0].relevant);
    assert!(!results[1].relevant);
    assert!((results[0].score - 0.4).abs() < 1e-6);
    assert_eq!(fragments[1], "Minimum balance is 100 €.");

    let messages = model.last_stream_messages();
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::Tool]
    );
    assert_eq!(messages[2].tool_calls.len(), 1);
    assert_eq!(messages[3].tool_call_id.as_deref(), Some("call_1"));
    assert_eq!(
        messages[3].content.as_deref(),
        Some("Minimum balance is 100 €.")
    );
}

#[tokio::test]
async fn test_multiple_tool_calls_single_envelope_with_last_results() {
    let model = Arc::new(
        ScriptedModel::new(
            Decision::Tools(vec![
                search_call("call_a", "first topic"),
                search_call("call_b", "second topic"),
            ]),
            &["Both ", "answered."],
        ),
    );
    let retriever = DocumentRetriever::new(Arc::new(QueryEchoIndex {
        delay: Duration::from_millis(0),
    }));
    let orch = orchestrator(Arc::clone(&model), retriever);

    let fragments = collect_fragments(&orch, "Compare both topics").await;

    let envelopes: Vec<&String> = fragments
        .iter()
        .filter(|f| f.starts_with(SEARCH_RESULTS_START))
        .collect();
    assert_eq!(envelopes.len(), 1);
    assert!(fragments[0].starts_with(SEARCH_RESULTS_START));
    assert_eq!(&fragments[1..], &["Both ", "answered."]);

    let results = parse_envelope(&fragments[0]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "doc about second topic");

    // Both tool results reach the model, paired by id, in call order
    let tool_messages: Vec<_> = model
        .last_stream_messages()
        .into_iter()
        .filter(|m| m.role == Role::Tool)
        .collect();
    assert_eq!(tool_messages.len(), 2);
    assert_eq!(tool_messages[0].tool_call_id.as_deref(), Some("call_a"));
    assert_eq!(
        tool_messages[0].content.as_deref(),
        Some("doc about first topic")
    );
    assert_eq!(tool_messages[1].tool_call_id.as_deref(), Some("call_b"));
}

#[tokio::test]
async fn test_no_relevant_documents_passes_sentinel_to_model() {
    let model = Arc::new(
        ScriptedModel::new(Decision::Tools(vec![search_call("call_1", "weather")]), &[])
            .with_mode(AnswerMode::EchoToolMessages),
    );
    let orch = orchestrator(
        Arc::clone(&model),
        static_retriever(&[("Card limits", 1.3), ("Loan rates", 1.8)]),
    );

    let fragments = collect_fragments(&orch, "Will it rain?").await;
    let results = parse_envelope(&fragments[0]).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.relevant));
    assert_eq!(fragments[1], NO_RELEVANT_DOCUMENTS);
}

#[tokio::test]
async fn test_empty_deltas_are_not_forwarded() {
    let model = Arc::new(ScriptedModel::new(Decision::Answer, &["", "a", "", "b", ""]));
    let orch = orchestrator(model, static_retriever(&[]));

    let fragments = collect_fragments(&orch, "thanks").await;
    assert_eq!(fragments, vec!["a", "b"]);
}

#[tokio::test]
async fn test_configured_system_prompt_is_used() {
    let model = Arc::new(ScriptedModel::new(Decision::Answer, &["ok"]));
    let config = AssistantConfig {
        system_prompt: "Always search before answering.".to_string(),
        ..AssistantConfig::default()
    };
    let orch = orchestrator_with_config(Arc::clone(&model), static_retriever(&[]), config);

    collect_fragments(&orch, "hi").await;
    let decisions = model.decision_calls.lock().unwrap();
    assert_eq!(
        decisions[0].0[0].content.as_deref(),
        Some("Always search before answering.")
    );
}

#[tokio::test]
async fn test_fresh_conversation_per_request() {
    let model = Arc::new(ScriptedModel::new(Decision::Answer, &["ok"]));
    let orch = orchestrator(Arc::clone(&model), static_retriever(&[]));

    collect_fragments(&orch, "first").await;
    collect_fragments(&orch, "second").await;

    let decisions = model.decision_calls.lock().unwrap();
    assert_eq!(decisions.len(), 2);
    assert_eq!(decisions[1].0.len(), 2);
    assert_eq!(decisions[1].0[1].content.as_deref(), Some("second"));
}
