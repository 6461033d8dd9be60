// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Chat model access: message types, provider trait and OpenAI-compatible client

pub mod client;
pub mod errors;
pub mod openai;
pub mod types;

pub use client::{ChatModel, TokenStream};
pub use errors::LlmError;
pub use openai::{OpenAiCompatibleClient, SseDecoder};
pub use types::{ChatMessage, Completion, FunctionCall, Role, ToolCall, ToolDefinition};
