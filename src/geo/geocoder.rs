// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Place-name geocoding

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::Coordinate;
use crate::error::PipelineError;

const SERVICE: &str = "nominatim";

/// Resolves free-text place names to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// First match for `place`, or `None` when the service knows no such place
    async fn geocode(&self, place: &str) -> Result<Option<Coordinate>, PipelineError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// OpenStreetMap Nominatim search client
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinate>, PipelineError> {
        debug!("Geocoding '{}'", place);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
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

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| PipelineError::decode(SERVICE, e))?;

        places.first().map(NominatimPlace::coordinate).transpose()
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

/// Nominatim reports coordinates as decimal strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinate(&self) -> Result<Coordinate, PipelineError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| PipelineError::decode(SERVICE, format!("lat '{}': {}", self.lat, e)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| PipelineError::decode(SERVICE, format!("lon '{}': {}", self.lon, e)))?;
        Ok(Coordinate::new(lat, lon))
    }
}
