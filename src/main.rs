// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use safe_route::{
    api::{start_server, AppState},
    cli::Cli,
    config::AppConfig,
    planner::RoutePlanner,
    version,
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading any configuration
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);

    tracing::info!("Starting {}", version::get_version_string());

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        "Imagery strategy: {}, classifier model: {}, max paths: {}",
        config.imagery.strategy,
        config.classifier.model,
        config.routing.max_paths
    );
    tracing::debug!("Configuration: {:?}", config);

    let planner = RoutePlanner::from_config(&config)?;
    let state = AppState::new(planner, config.api.not_found_policy);

    start_server(state, &config.api.listen_addr).await?;

    tracing::info!("Server stopped");
    Ok(())
}
