// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Imagery sampling strategies
//!
//! A sampler turns one route candidate into the list of images the safety
//! classifier will look at. Two strategies exist:
//! - [`AlongRouteSampler`] queries around every Nth point of the path, keeping
//!   at most one image per point, so imagery follows the walked path.
//! - [`BoundingBoxSampler`] issues a single search over the padded box of the
//!   whole path. Cheaper, but may return images the route never passes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::provider::{ImageRef, ImageryProvider};
use crate::config::{ImageryConfig, ImageryStrategy};
use crate::error::PipelineError;
use crate::geo::{BoundingBox, RouteCandidate};

/// Given a route, return candidate images
#[async_trait]
pub trait ImagerySampler: Send + Sync {
    async fn sample(&self, route: &RouteCandidate) -> Result<Vec<ImageRef>, PipelineError>;

    fn strategy(&self) -> ImageryStrategy;
}

/// Build the sampler selected by configuration
pub fn sampler_for(
    config: &ImageryConfig,
    provider: Arc<dyn ImageryProvider>,
) -> Arc<dyn ImagerySampler> {
    match config.strategy {
        ImageryStrategy::AlongRoute => Arc::new(AlongRouteSampler::new(
            provider,
            config.stride,
            config.radius_m,
            config.pause,
        )),
        ImageryStrategy::BoundingBox => Arc::new(BoundingBoxSampler::new(
            provider,
            config.bbox_padding_deg,
            config.bbox_limit,
        )),
    }
}

/// Point-by-point sampling along the path geometry
pub struct AlongRouteSampler {
    provider: Arc<dyn ImageryProvider>,
    stride: usize,
    radius_m: f64,
    pause: Duration,
}

impl AlongRouteSampler {
    pub fn new(
        provider: Arc<dyn ImageryProvider>,
        stride: usize,
        radius_m: f64,
        pause: Duration,
    ) -> Self {
        Self {
            provider,
            stride: stride.max(1),
            radius_m,
            pause,
        }
    }

    /// Indices of the path points that will be queried
    pub fn sample_indices(&self, path_len: usize) -> Vec<usize> {
        (0..path_len).step_by(self.stride).collect()
    }
}

#[async_trait]
impl ImagerySampler for AlongRouteSampler {
    async fn sample(&self, route: &RouteCandidate) -> Result<Vec<ImageRef>, PipelineError> {
        let indices = self.sample_indices(route.path.len());
        let mut images = Vec::new();

        for (n, index) in indices.iter().enumerate() {
            if n > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let point = route.path[*index];
            let found = self
                .provider
                .images_near(point, self.radius_m, 1)
                .await?;
            debug!(
                "Sample point {} ({:.5},{:.5}): {} image(s)",
                index,
                point.lat,
                point.lon,
                found.len()
            );
            images.extend(found.into_iter().take(1));
        }

        info!(
            "Sampled {} point(s) along route, {} found {} image(s)",
            indices.len(),
            self.provider.name(),
            images.len()
        );
        Ok(images)
    }

    fn strategy(&self) -> ImageryStrategy {
        ImageryStrategy::AlongRoute
    }
}

/// One search over the padded bounding box of the whole path
pub struct BoundingBoxSampler {
    provider: Arc<dyn ImageryProvider>,
    padding_deg: f64,
    limit: usize,
}

impl BoundingBoxSampler {
    pub fn new(provider: Arc<dyn ImageryProvider>, padding_deg: f64, limit: usize) -> Self {
        Self {
            provider,
            padding_deg,
            limit,
        }
    }
}

#[async_trait]
impl ImagerySampler for BoundingBoxSampler {
    async fn sample(&self, route: &RouteCandidate) -> Result<Vec<ImageRef>, PipelineError> {
        let bbox = match BoundingBox::enclosing(&route.path) {
            Some(bbox) => bbox.padded(self.padding_deg),
            None => return Ok(Vec::new()),
        };

        let images = self.provider.images_in_bbox(&bbox, self.limit).await?;
        info!(
            "Bounding-box search {} on {} found {} image(s)",
            bbox.to_query_param(),
            self.provider.name(),
            images.len()
        );
        Ok(images)
    }

    fn strategy(&self) -> ImageryStrategy {
        ImageryStrategy::BoundingBox
    }
}
