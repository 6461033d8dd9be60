// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask API request types

use serde::{Deserialize, Serialize};

/// Request body for POST /ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// User question; a missing field reads as empty and fails validation
    #[serde(default)]
    pub query: String,
}

impl AskRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Query cannot be empty".to_string());
        }
        Ok(())
    }
}
