// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mapillary Graph API imagery provider

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::provider::{ImageRef, ImageryProvider};
use crate::error::PipelineError;
use crate::geo::{BoundingBox, Coordinate};

const SERVICE: &str = "mapillary";
const FIELDS: &str = "id,computed_geometry,thumb_1024_url";

/// Mapillary `/images` search client
pub struct MapillaryProvider {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl MapillaryProvider {
    pub fn new(client: Client, endpoint: &str, access_token: String) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            access_token,
        }
    }
}

#[async_trait]
impl ImageryProvider for MapillaryProvider {
    async fn images_in_bbox(
        &self,
        bbox: &BoundingBox,
        limit: usize,
    ) -> Result<Vec<ImageRef>, PipelineError> {
        let bbox_param = bbox.to_query_param();
        debug!("Mapillary search bbox={} limit={}", bbox_param, limit);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("bbox", bbox_param.as_str()),
                ("limit", &limit.to_string()),
                ("fields", FIELDS),
                ("access_token", &self.access_token),
            ])
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

        let body: MapillaryResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::decode(SERVICE, e))?;

        Ok(body.data.into_iter().map(MapillaryImage::into_ref).collect())
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}

#[derive(Debug, Deserialize)]
struct MapillaryResponse {
    #[serde(default)]
    data: Vec<MapillaryImage>,
}

#[derive(Debug, Deserialize)]
struct MapillaryImage {
    id: String,
    thumb_1024_url: Option<String>,
    computed_geometry: Option<MapillaryPoint>,
}

#[derive(Debug, Deserialize)]
struct MapillaryPoint {
    coordinates: [f64; 2],
}

impl MapillaryImage {
    fn into_ref(self) -> ImageRef {
        ImageRef {
            id: self.id,
            thumb_url: self.thumb_1024_url,
            location: self
                .computed_geometry
                .map(|g| Coordinate::from_lon_lat(g.coordinates)),
        }
    }
}
