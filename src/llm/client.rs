// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat model client trait definition

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::errors::LlmError;
use super::types::{ChatMessage, Completion, ToolDefinition};

/// Content deltas of a streaming completion, in arrival order.
/// Dropping the stream closes the underlying connection.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Trait for chat-completion providers
///
/// Implementations must be cheap to share across concurrent requests; all
/// per-request state lives in the `messages` slice.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Single non-streaming completion, optionally offering tools
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Completion, LlmError>;

    /// Streaming completion without tools
    async fn complete_stream(&self, messages: &[ChatMessage]) -> Result<TokenStream, LlmError>;

    /// Model identifier for logging and health output
    fn model_name(&self) -> &str;
}
