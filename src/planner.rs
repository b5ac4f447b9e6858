// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route planning orchestration
//!
//! Geocode both places, fetch candidate routes, then sample imagery and rate
//! each candidate in turn. Everything inside one plan runs sequentially.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{AppConfig, ImageryStrategy};
use crate::error::PipelineError;
use crate::geo::{
    Coordinate, Geocoder, GraphHopperRouter, NominatimGeocoder, RouteCandidate, RouteProvider,
};
use crate::imagery::{sampler_for, ImagerySampler, MapillaryProvider};
use crate::safety::{OpenRouterClient, RouteAggregator, RouteAssessment, SafetyClassifier, Verdict};

/// One candidate route with its safety rating
#[derive(Debug, Clone)]
pub struct RatedRoute {
    pub candidate: RouteCandidate,
    pub assessment: RouteAssessment,
    pub verdict: Verdict,
    /// Thumbnail URLs shown to the client (along-route sampling only)
    pub preview_images: Option<Vec<String>>,
}

/// Result of planning between two places
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub start: Coordinate,
    pub end: Coordinate,
    pub routes: Vec<RatedRoute>,
}

pub struct RoutePlanner {
    geocoder: Arc<dyn Geocoder>,
    router: Arc<dyn RouteProvider>,
    sampler: Arc<dyn ImagerySampler>,
    aggregator: RouteAggregator,
    preview_images: usize,
}

impl RoutePlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        router: Arc<dyn RouteProvider>,
        sampler: Arc<dyn ImagerySampler>,
        aggregator: RouteAggregator,
        preview_images: usize,
    ) -> Self {
        Self {
            geocoder,
            router,
            sampler,
            aggregator,
            preview_images,
        }
    }

    /// Wire the production clients from configuration.
    ///
    /// Builds exactly one [`SafetyClassifier`], so all plans made through this
    /// planner share its admission gate.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let client = config.http.build_client()?;
        let key = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| PipelineError::Config(format!("{} is not set", name)))
        };

        let geocoder = Arc::new(NominatimGeocoder::new(
            client.clone(),
            &config.endpoints.nominatim_url,
        ));
        let router = Arc::new(GraphHopperRouter::new(
            client.clone(),
            &config.endpoints.graphhopper_url,
            key(&config.keys.graphhopper_api_key, "GRAPHHOPPER_API_KEY")?,
            config.routing.clone(),
        ));
        let imagery = Arc::new(MapillaryProvider::new(
            client.clone(),
            &config.endpoints.mapillary_url,
            key(&config.keys.mapillary_token, "MAPILLARY_TOKEN")?,
        ));
        let model = Arc::new(OpenRouterClient::new(
            client,
            &config.endpoints.openrouter_url,
            key(&config.keys.openrouter_api_key, "OPENROUTER_API_KEY")?,
            &config.classifier.model,
            &config.classifier.prompt,
        ));

        let classifier = Arc::new(SafetyClassifier::new(model, &config.classifier));
        let aggregator = RouteAggregator::new(classifier, &config.classifier);

        Ok(Self::new(
            geocoder,
            router,
            sampler_for(&config.imagery, imagery),
            aggregator,
            config.api.preview_images,
        ))
    }

    pub fn strategy(&self) -> ImageryStrategy {
        self.sampler.strategy()
    }

    /// Plan and rate walking routes from `start_place` to `end_place`
    pub async fn plan(
        &self,
        start_place: &str,
        end_place: &str,
    ) -> Result<RoutePlan, PipelineError> {
        let start = self.geocoder.geocode(start_place).await?;
        let end = self.geocoder.geocode(end_place).await?;

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => {
                return Err(PipelineError::PlaceNotFound {
                    place: start_place.to_string(),
                })
            }
            (_, None) => {
                return Err(PipelineError::PlaceNotFound {
                    place: end_place.to_string(),
                })
            }
        };
        debug!(
            "{} resolved '{}' -> {:?}, '{}' -> {:?}",
            self.geocoder.name(),
            start_place,
            start,
            end_place,
            end
        );

        let candidates = self.router.routes(start, end).await?;
        info!(
            "{} returned {} candidate(s), rating with {} imagery sampling",
            self.router.name(),
            candidates.len(),
            self.sampler.strategy()
        );
        let mut routes = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.into_iter().enumerate() {
            let images = self.sampler.sample(&candidate).await?;
            let assessment = self.aggregator.assess(&images).await?;

            let preview_images = match self.sampler.strategy() {
                ImageryStrategy::AlongRoute => Some(
                    images
                        .iter()
                        .filter_map(|image| image.usable_url())
                        .take(self.preview_images)
                        .map(str::to_string)
                        .collect(),
                ),
                ImageryStrategy::BoundingBox => None,
            };

            info!(
                "Route {} ({:.0} m): {} image(s), verdict {}",
                index,
                candidate.distance,
                images.len(),
                assessment.verdict()
            );

            routes.push(RatedRoute {
                verdict: assessment.verdict(),
                assessment,
                candidate,
                preview_images,
            });
        }

        Ok(RoutePlan { start, end, routes })
    }
}
