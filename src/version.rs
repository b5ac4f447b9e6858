// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the safe-route service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "along-route-sampling",
    "bbox-sampling",
    "serialized-classification",
    "rate-limit-retry",
];

/// Get formatted version string
pub fn get_version_string() -> String {
    format!("safe-route v{} ({})", VERSION, FEATURES.join(", "))
}
