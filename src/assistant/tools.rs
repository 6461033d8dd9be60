// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The `search_documents` tool offered to the model

use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::errors::AskError;
use crate::llm::{ToolCall, ToolDefinition};

pub const SEARCH_TOOL_NAME: &str = "search_documents";

#[derive(Debug, Deserialize)]
struct SearchArguments {
    query: String,
}

pub fn search_documents_tool() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_TOOL_NAME.to_string(),
        description: "Searches the documentation database. Use only for technical questions, \
                      product information or questions that need information from specific documents."
            .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Extract the search query from a tool call's JSON arguments
///
/// Only one tool is ever offered, so a call under another name is still
/// treated as a search.
pub fn parse_search_arguments(call: &ToolCall) -> Result<String, AskError> {
    if call.function.name != SEARCH_TOOL_NAME {
        warn!(
            "Model called unknown tool {:?} (id {}), treating it as {}",
            call.function.name, call.id, SEARCH_TOOL_NAME
        );
    }

    let args: SearchArguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
        AskError::ModelUnavailable(format!(
            "malformed arguments for tool call {}: {}",
            call.id, e
        ))
    })?;

    Ok(args.query)
}
