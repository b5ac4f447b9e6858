// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
pub mod imagery;
pub mod planner;
pub mod safety;
pub mod version;

// Re-export main types
pub use config::AppConfig;
pub use error::PipelineError;
pub use planner::{RatedRoute, RoutePlan, RoutePlanner};
