// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};

use super::ask::ask_handler;
use super::handlers::health_handler;
use crate::assistant::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    /// Root for `/` and every path not matched by a route
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            orchestrator,
            static_dir: static_dir.into(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        // Answer stream
        .route("/ask", post(ask_handler))
        // Health check
        .route("/health", get(health_handler))
        // Web client (index.html at /)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: &str) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
