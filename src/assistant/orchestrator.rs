// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-request ask pipeline: decide, retrieve, answer
//!
//! Each call to [`Orchestrator::ask_stream`] owns a fresh conversation and runs
//! as one producer task writing fragments into a bounded channel. Dropping the
//! returned stream closes the channel, which aborts the task at its next await
//! point and drops any in-flight search or model stream.

use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use super::envelope::format_envelope;
use super::errors::AskError;
use super::prompt::DEFAULT_SYSTEM_PROMPT;
use super::tools::{parse_search_arguments, search_documents_tool};
use crate::llm::{ChatMessage, ChatModel};
use crate::rag::{DocumentRetriever, SearchResult};

const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub system_prompt: String,
    /// Bounds the decision call and every wait on the answer stream
    pub model_timeout: Duration,
    pub channel_capacity: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Sending half of one request's fragment channel
struct FragmentSink {
    tx: mpsc::Sender<String>,
    sent: usize,
}

impl FragmentSink {
    fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx, sent: 0 }
    }

    /// Returns false once the consumer is gone
    async fn send(&mut self, fragment: String) -> bool {
        if self.tx.send(fragment).await.is_err() {
            debug!("Fragment receiver dropped after {} fragments", self.sent);
            return false;
        }
        self.sent += 1;
        true
    }
}

pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    retriever: Arc<DocumentRetriever>,
    config: AssistantConfig,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        retriever: Arc<DocumentRetriever>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            model,
            retriever,
            config,
        }
    }

    pub fn retriever(&self) -> &DocumentRetriever {
        &self.retriever
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Answer `query` as a finite stream of text fragments.
    ///
    /// If the model searches, exactly one search-results envelope (carrying the
    /// last search's results) precedes all answer text. Failures end the stream
    /// with a single `"An error occurred: ..."` fragment.
    pub fn ask_stream(self: &Arc<Self>, query: String) -> ReceiverStream<String> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let this = Arc::clone(self);

        tokio::spawn(async move {
            let mut sink = FragmentSink::new(tx.clone());
            tokio::select! {
                _ = tx.closed() => {
                    info!("Client disconnected, request abandoned");
                }
                _ = this.respond(&query, &mut sink) => {}
            }
        });

        ReceiverStream::new(rx)
    }

    async fn respond(&self, query: &str, sink: &mut FragmentSink) {
        info!("Ask: {:?}", query);
        if let Err(err) = self.run(query, sink).await {
            let err = err.after_fragments(sink.sent);
            error!("[{}] {}", err.error_code(), err);
            sink.send(err.to_fragment()).await;
        }
    }

    async fn run(&self, query: &str, sink: &mut FragmentSink) -> Result<(), AskError> {
        let mut messages = vec![
            ChatMessage::system(&self.config.system_prompt),
            ChatMessage::user(query),
        ];
        let tools = [search_documents_tool()];

        let decision = self
            .with_timeout(self.model.complete(&messages, &tools))
            .await??;

        if !decision.has_tool_calls() {
            info!("No tool call, answering directly");
            return self.stream_answer(&messages, sink).await;
        }

        info!("Model requested {} tool call(s)", decision.tool_calls.len());
        messages.push(ChatMessage::assistant_tool_calls(
            decision.content,
            decision.tool_calls.clone(),
        ));

        let mut last_results: Vec<SearchResult> = Vec::new();
        for call in &decision.tool_calls {
            let search_query = parse_search_arguments(call)?;
            let outcome = self.retriever.search(&search_query).await?;
            messages.push(ChatMessage::tool(call.id.clone(), outcome.context));
            last_results = outcome.results;
        }

        if !sink.send(format_envelope(&last_results)).await {
            return Ok(());
        }

        self.stream_answer(&messages, sink).await
    }

    /// Stream the model's answer to `messages`, forwarding non-empty deltas
    async fn stream_answer(
        &self,
        messages: &[ChatMessage],
        sink: &mut FragmentSink,
    ) -> Result<(), AskError> {
        let mut stream = self
            .with_timeout(self.model.complete_stream(messages))
            .await??;

        let mut deltas = 0usize;
        while let Some(item) = self.with_timeout(stream.next()).await? {
            let delta = item?;
            if delta.is_empty() {
                continue;
            }
            if !sink.send(delta).await {
                return Ok(());
            }
            deltas += 1;
        }

        debug!("Answer stream finished after {} deltas", deltas);
        Ok(())
    }

    async fn with_timeout<T>(&self, fut: impl Future<Output = T>) -> Result<T, AskError> {
        tokio::time::timeout(self.config.model_timeout, fut)
            .await
            .map_err(|_| AskError::Timeout {
                seconds: self.config.model_timeout.as_secs(),
            })
    }
}
