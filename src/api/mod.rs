// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod route;

pub use errors::{ApiError, ErrorResponse, PlaceNotFoundResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse, RootResponse};
pub use route::{route_handler, RouteApiResponse, RouteEntry, RouteQuery};
