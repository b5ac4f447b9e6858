// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::route::route_handler;
use crate::config::NotFoundPolicy;
use crate::planner::RoutePlanner;
use crate::version;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<RoutePlanner>,
    pub not_found_policy: NotFoundPolicy,
}

impl AppState {
    pub fn new(planner: RoutePlanner, not_found_policy: NotFoundPolicy) -> Self {
        Self {
            planner: Arc::new(planner),
            not_found_policy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub imagery_strategy: String,
}

/// Build the router with all endpoints
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Route rating
        .route("/route", get(route_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: AppState, listen_addr: &str) -> anyhow::Result<()> {
    let app = create_app(state);

    let addr = listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "API fonctionne !".to_string(),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION.to_string(),
        imagery_strategy: state.planner.strategy().to_string(),
    })
}
