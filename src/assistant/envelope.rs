// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-band search-results envelope
//!
//! The client recognises the fragment by its markers and renders the results
//! separately from the answer text:
//! `__SEARCH_RESULTS__[{"content":..,"score":..,"relevant":..}]__END_SEARCH__\n`

use tracing::warn;

use crate::rag::SearchResult;

pub const SEARCH_RESULTS_START: &str = "__SEARCH_RESULTS__";
pub const SEARCH_RESULTS_END: &str = "__END_SEARCH__";

/// Build the envelope fragment; non-ASCII content is kept unescaped
pub fn format_envelope(results: &[SearchResult]) -> String {
    let json = serde_json::to_string(results).unwrap_or_else(|e| {
        warn!("Failed to serialize search results: {}", e);
        "[]".to_string()
    });
    format!("{}{}{}\n", SEARCH_RESULTS_START, json, SEARCH_RESULTS_END)
}

/// Decode an envelope fragment; `None` for ordinary answer text
pub fn parse_envelope(fragment: &str) -> Option<Vec<SearchResult>> {
    let body = fragment
        .strip_prefix(SEARCH_RESULTS_START)?
        .strip_suffix('\n')?
        .strip_suffix(SEARCH_RESULTS_END)?;
    serde_json::from_str(body).ok()
}
