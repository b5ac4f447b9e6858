// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pedestrian route computation

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::types::{Coordinate, RouteCandidate};
use crate::config::RoutingConfig;
use crate::error::PipelineError;

const SERVICE: &str = "graphhopper";

/// Computes alternative walking paths between two coordinates
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn routes(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<RouteCandidate>, PipelineError>;

    fn name(&self) -> &'static str;
}

/// GraphHopper Routing API client
pub struct GraphHopperRouter {
    client: Client,
    endpoint: String,
    api_key: String,
    config: RoutingConfig,
}

impl GraphHopperRouter {
    pub fn new(client: Client, endpoint: &str, api_key: String, config: RoutingConfig) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
            config,
        }
    }

    fn query_params(&self, start: Coordinate, end: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("point", format!("{},{}", start.lat, start.lon)),
            ("point", format!("{},{}", end.lat, end.lon)),
            ("vehicle", self.config.profile.clone()),
            ("locale", self.config.locale.clone()),
            ("points_encoded", "false".to_string()),
            ("algorithm", "alternative_route".to_string()),
            (
                "alternative_route.max_paths",
                self.config.max_paths.to_string(),
            ),
            ("key", self.api_key.clone()),
        ]
    }
}

#[async_trait]
impl RouteProvider for GraphHopperRouter {
    async fn routes(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<RouteCandidate>, PipelineError> {
        debug!("Routing {:?} -> {:?}", start, end);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(start, end))
            .send()
            .await
            .map_err(|e| PipelineError::transport(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let body: GraphHopperResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::decode(SERVICE, e))?;

        let candidates: Vec<RouteCandidate> = body
            .paths
            .into_iter()
            .take(self.config.max_paths as usize)
            .map(GraphHopperPath::into_candidate)
            .collect();

        info!("{} returned {} candidate route(s)", SERVICE, candidates.len());
        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

#[derive(Debug, Deserialize)]
struct GraphHopperResponse {
    #[serde(default)]
    paths: Vec<GraphHopperPath>,
}

#[derive(Debug, Deserialize)]
struct GraphHopperPath {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    time: u64,
    points: GraphHopperPoints,
}

#[derive(Debug, Deserialize)]
struct GraphHopperPoints {
    /// `[lon, lat]` pairs, optionally followed by elevation
    coordinates: Vec<Vec<f64>>,
}

impl GraphHopperPath {
    fn into_candidate(self) -> RouteCandidate {
        let path = self
            .points
            .coordinates
            .into_iter()
            .filter(|pair| pair.len() >= 2)
            .map(|pair| Coordinate::from_lon_lat([pair[0], pair[1]]))
            .collect();
        RouteCandidate {
            path,
            distance: self.distance,
            time: self.time,
        }
    }
}
