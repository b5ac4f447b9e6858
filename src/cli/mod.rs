// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::{AppConfig, ImageryStrategy, NotFoundPolicy};

/// Pedestrian route safety API
#[derive(Parser, Debug, Default)]
#[command(name = "safe-route")]
#[command(version)]
#[command(about = "Rates walking routes from street-level imagery", long_about = None)]
pub struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Imagery sampling strategy: along-route or bbox
    #[arg(long, env = "IMAGERY_STRATEGY", value_parser = parse_strategy)]
    pub imagery_strategy: Option<ImageryStrategy>,

    /// HTTP status for unresolved places: 200 or 404
    #[arg(long, env = "PLACE_NOT_FOUND_STATUS", value_parser = parse_policy)]
    pub not_found_status: Option<NotFoundPolicy>,
}

impl Cli {
    /// Overlay command line flags on a loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(addr) = &self.listen_addr {
            config.api.listen_addr = addr.clone();
        }
        if let Some(strategy) = self.imagery_strategy {
            config.imagery.strategy = strategy;
        }
        if let Some(policy) = self.not_found_status {
            config.api.not_found_policy = policy;
        }
    }
}

fn parse_strategy(s: &str) -> Result<ImageryStrategy, String> {
    s.parse()
}

fn parse_policy(s: &str) -> Result<NotFoundPolicy, String> {
    s.parse()
}
