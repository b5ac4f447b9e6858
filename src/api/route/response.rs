// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route API response types

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, LineString};
use crate::planner::{RatedRoute, RoutePlan};
use crate::safety::Verdict;

/// One rated route as sent to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub geometry: LineString,
    /// Metres
    pub distance: f64,
    /// Milliseconds
    pub time: u64,
    pub status: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Response body for GET /route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteApiResponse {
    pub routes: Vec<RouteEntry>,
    pub start: Coordinate,
    pub end: Coordinate,
}

impl From<RatedRoute> for RouteEntry {
    fn from(route: RatedRoute) -> Self {
        Self {
            geometry: route.candidate.geometry(),
            distance: route.candidate.distance,
            time: route.candidate.time,
            status: route.verdict,
            images: route.preview_images,
        }
    }
}

impl From<RoutePlan> for RouteApiResponse {
    fn from(plan: RoutePlan) -> Self {
        Self {
            routes: plan.routes.into_iter().map(RouteEntry::from).collect(),
            start: plan.start,
            end: plan.end,
        }
    }
}
