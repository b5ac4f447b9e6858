// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Everything is read from the process environment once, at startup, into an
//! [`AppConfig`] that is handed to each component constructor.

mod app;

pub use app::{
    ApiConfig, AppConfig, ClassifierConfig, EndpointConfig, HttpConfig, ImageryConfig,
    ImageryStrategy, NotFoundPolicy, RoutingConfig, ServiceKeys,
};
