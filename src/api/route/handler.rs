// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route endpoint handler

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::request::RouteQuery;
use super::response::RouteApiResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// GET /route - Rate walking routes between two places
///
/// # Query
/// - `start_place`: origin place name (required)
/// - `end_place`: destination place name (required)
///
/// # Response
/// - `routes`: candidates with `geometry`, `distance`, `time`, `status` and,
///   in along-route mode, `images`
/// - `start`, `end`: resolved coordinates
///
/// # Errors
/// - 200 / 404 `{"error": "Lieu introuvable"}`: a place could not be geocoded
/// - 422 Unprocessable Entity: missing query parameter
/// - 429 Too Many Requests: classifier still rate limited after all retries
/// - 500 Internal Server Error: an upstream service failed
pub async fn route_handler(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteApiResponse>, ApiError> {
    let (start_place, end_place) = query.places()?;
    let request_id = Uuid::new_v4();
    let span = info_span!("route", %request_id);

    async move {
        info!("Route request: '{}' -> '{}'", start_place, end_place);

        let plan = match state.planner.plan(start_place, end_place).await {
            Ok(plan) => plan,
            Err(e) => {
                let err = ApiError::from_pipeline(e, state.not_found_policy);
                match &err {
                    ApiError::PlaceNotFound { .. } | ApiError::RateLimitExceeded { .. } => {
                        warn!("Route request rejected: {}", err)
                    }
                    _ => error!("Route request failed: {}", err),
                }
                return Err(err);
            }
        };

        info!("Route request complete: {} route(s)", plan.routes.len());
        Ok(Json(RouteApiResponse::from(plan)))
    }
    .instrument(span)
    .await
}
