// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the documentation assistant node

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Major version number
pub const VERSION_MAJOR: &str = env!("CARGO_PKG_VERSION_MAJOR");

/// Minor version number
pub const VERSION_MINOR: &str = env!("CARGO_PKG_VERSION_MINOR");

/// Patch version number
pub const VERSION_PATCH: &str = env!("CARGO_PKG_VERSION_PATCH");

/// Package name as built
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "sse-answer-stream",
    "tool-gated-retrieval",
    "search-results-envelope",
    "flat-l2-index",
];

/// Full version string for logs
pub fn get_version_string() -> String {
    format!("{} v{}", PACKAGE_NAME, VERSION_NUMBER)
}
