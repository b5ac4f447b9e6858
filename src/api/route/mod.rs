// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route rating API endpoint
//!
//! Provides the `/route` HTTP endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::route_handler;
pub use request::RouteQuery;
pub use response::{RouteApiResponse, RouteEntry};
