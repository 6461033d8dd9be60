// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ask API endpoint
//!
//! Provides the `/ask` HTTP endpoint streaming documentation answers.

pub mod handler;
pub mod request;

pub use handler::ask_handler;
pub use request::AskRequest;
