// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Street-level imagery provider trait and image records

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::geo::{BoundingBox, Coordinate};

/// One street-level image found near a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: String,
    /// Thumbnail the classifier looks at; absent when the provider has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
}

impl ImageRef {
    /// Thumbnail URL, if it is non-empty
    pub fn usable_url(&self) -> Option<&str> {
        self.thumb_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Directory of street-level images
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Up to `limit` images inside `bbox`
    async fn images_in_bbox(
        &self,
        bbox: &BoundingBox,
        limit: usize,
    ) -> Result<Vec<ImageRef>, PipelineError>;

    /// Up to `limit` images within `radius_m` metres of `point`
    async fn images_near(
        &self,
        point: Coordinate,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<ImageRef>, PipelineError> {
        self.images_in_bbox(&BoundingBox::around(point, radius_m), limit)
            .await
    }

    fn name(&self) -> &'static str;
}
