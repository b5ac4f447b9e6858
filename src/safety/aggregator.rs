// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reduce per-image verdicts to one verdict per route

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::classifier::SafetyClassifier;
use super::verdict::Verdict;
use crate::config::ClassifierConfig;
use crate::error::PipelineError;
use crate::imagery::ImageRef;

/// Tally of one route's analysed images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteAssessment {
    pub safe_count: usize,
    pub danger_count: usize,
}

impl RouteAssessment {
    /// Dangerous only on a strict danger majority; ties and empty tallies are safe
    pub fn verdict(&self) -> Verdict {
        if self.danger_count > self.safe_count {
            Verdict::Danger
        } else {
            Verdict::Safe
        }
    }

    pub fn analyzed(&self) -> usize {
        self.safe_count + self.danger_count
    }

    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Safe => self.safe_count += 1,
            Verdict::Danger => self.danger_count += 1,
        }
    }
}

pub struct RouteAggregator {
    classifier: Arc<SafetyClassifier>,
    max_images: usize,
    pause: Duration,
}

impl RouteAggregator {
    pub fn new(classifier: Arc<SafetyClassifier>, config: &ClassifierConfig) -> Self {
        Self::with_limits(
            classifier,
            config.max_images_per_route,
            config.pause_between,
        )
    }

    pub fn with_limits(
        classifier: Arc<SafetyClassifier>,
        max_images: usize,
        pause: Duration,
    ) -> Self {
        Self {
            classifier,
            max_images,
            pause,
        }
    }

    /// Classify the first `max_images` images one after another.
    ///
    /// Images without a usable thumbnail are skipped but still use up one of
    /// the `max_images` slots.
    pub async fn assess(&self, images: &[ImageRef]) -> Result<RouteAssessment, PipelineError> {
        let mut assessment = RouteAssessment::default();

        for image in images.iter().take(self.max_images) {
            let url = match image.usable_url() {
                Some(url) => url,
                None => {
                    debug!("Image {} has no thumbnail, skipped", image.id);
                    continue;
                }
            };

            if assessment.analyzed() > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let verdict = self.classifier.classify(url).await?;
            assessment.record(verdict);
        }

        info!(
            "Route assessed by {}: {} safe, {} danger -> {}",
            self.classifier.model_name(),
            assessment.safe_count,
            assessment.danger_count,
            assessment.verdict()
        );
        Ok(assessment)
    }
}
