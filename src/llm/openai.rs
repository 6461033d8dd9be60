// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat model client for OpenAI-compatible APIs (OpenRouter by default)

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::client::{ChatModel, TokenStream};
use super::errors::LlmError;
use super::types::{ChatMessage, Completion, ToolCall, ToolDefinition};
use crate::config::LlmConfig;

// --- OpenAI-compatible response types ---

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    error: Option<ProviderErrorBody>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ProviderErrorBody>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<Value>,
}

impl ProviderErrorBody {
    fn into_error(self) -> LlmError {
        let status = self
            .code
            .as_ref()
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(500);
        LlmError::Api {
            status,
            message: self.message,
        }
    }
}

/// Incremental decoder for the provider's `text/event-stream` body.
///
/// Bytes may split lines (and UTF-8 sequences) at any point, so input is
/// buffered until a full line is available.
#[derive(Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// Feed raw bytes, returning every non-empty content delta now complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<String, LlmError>> {
        if self.done {
            return Vec::new();
        }
        self.buffer.extend_from_slice(bytes);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw);
            let line = text.trim_end_matches(|c| c == '\r' || c == '\n');

            if let Some(item) = self.decode_line(line) {
                out.push(item);
            }
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        out
    }

    /// Decode a final line left without a trailing newline when the body ends
    pub fn finish(&mut self) -> Vec<Result<String, LlmError>> {
        if self.done || self.buffer.is_empty() {
            return Vec::new();
        }
        let raw = std::mem::take(&mut self.buffer);
        let text = String::from_utf8_lossy(&raw);
        let line = text.trim_end_matches('\r');
        self.decode_line(line).into_iter().collect()
    }

    fn decode_line(&mut self, line: &str) -> Option<Result<String, LlmError>> {
        // Comments (": OPENROUTER PROCESSING") and blank separators carry no data
        let data = line.strip_prefix("data:")?.trim_start();
        if data == "[DONE]" {
            self.done = true;
            return None;
        }

        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => {
                if let Some(error) = chunk.error {
                    return Some(Err(LlmError::Stream(error.message)));
                }
                let content = chunk.choices.into_iter().next()?.delta.content?;
                if content.is_empty() {
                    None
                } else {
                    Some(Ok(content))
                }
            }
            Err(e) => {
                debug!("Skipping unparseable stream line: {}", e);
                None
            }
        }
    }
}

/// A chat model reached over an OpenAI-compatible `/chat/completions` API
pub struct OpenAiCompatibleClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatibleClient {
    /// Create a client; a missing API key is accepted here and reported on first call
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(
            "Chat model configured: endpoint={}, model={}",
            base_url, config.model
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
        })
    }

    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolDefinition], stream: bool) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stream": stream,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tool_defs);
        }

        body
    }

    async fn post(&self, body: &Value) -> Result<reqwest::Response, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Completion, LlmError> {
        debug!(
            "Requesting completion: {} messages, {} tools",
            messages.len(),
            tools.len()
        );
        let body = self.request_body(messages, tools, false);
        let response = self.post(&body).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(error.into_error());
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        Ok(Completion {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
            finish_reason: choice.finish_reason,
        })
    }

    async fn complete_stream(&self, messages: &[ChatMessage]) -> Result<TokenStream, LlmError> {
        debug!("Requesting streaming completion: {} messages", messages.len());
        let body = self.request_body(messages, &[], true);
        let response = self.post(&body).await?;

        let state = Some((Box::pin(response.bytes_stream()), SseDecoder::default()));
        let stream = futures::stream::unfold(state, |state| async move {
            let (mut bytes, mut decoder) = state?;
            let items = match bytes.next().await {
                Some(Ok(chunk)) => decoder.push(&chunk),
                Some(Err(e)) => vec![Err(LlmError::Stream(e.to_string()))],
                None => return Some((decoder.finish(), None)),
            };
            Some((items, Some((bytes, decoder))))
        })
        .flat_map(futures::stream::iter);

        Ok(Box::pin(stream))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
