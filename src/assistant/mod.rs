// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Documentation assistant
//!
//! Turns one user query into a stream of text fragments: the model decides
//! whether to search, search results are reported in a single envelope, and the
//! answer is streamed delta by delta.

pub mod envelope;
pub mod errors;
pub mod orchestrator;
pub mod prompt;
pub mod tools;

pub use envelope::{format_envelope, parse_envelope, SEARCH_RESULTS_END, SEARCH_RESULTS_START};
pub use errors::{AskError, ERROR_FRAGMENT_PREFIX};
pub use orchestrator::{AssistantConfig, Orchestrator};
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use tools::{parse_search_arguments, search_documents_tool, SEARCH_TOOL_NAME};
