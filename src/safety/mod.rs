// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route safety rating from street-level imagery
//!
//! This module provides:
//! - A vision-language model client asking "safe or danger?" per image
//! - A classifier serialising every model call through one admission gate
//! - A per-route aggregator applying the strict-majority rule

pub mod aggregator;
pub mod classifier;
pub mod gate;
pub mod verdict;
pub mod vlm_client;

pub use aggregator::{RouteAggregator, RouteAssessment};
pub use classifier::SafetyClassifier;
pub use gate::AdmissionGate;
pub use verdict::Verdict;
pub use vlm_client::{OpenRouterClient, VisionModel};
