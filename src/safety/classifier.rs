// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-image safety classification with bounded 429 retry

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::gate::AdmissionGate;
use super::verdict::Verdict;
use super::vlm_client::VisionModel;
use crate::config::ClassifierConfig;
use crate::error::PipelineError;

/// Classifies single images as safe or dangerous.
///
/// Every call, retries included, runs inside one shared [`AdmissionGate`], so
/// only one request reaches the model at a time no matter how many routes are
/// being rated concurrently.
pub struct SafetyClassifier {
    model: Arc<dyn VisionModel>,
    gate: AdmissionGate,
    max_attempts: u32,
    fallback_delay: Duration,
}

impl SafetyClassifier {
    pub fn new(model: Arc<dyn VisionModel>, config: &ClassifierConfig) -> Self {
        Self::with_retry(model, config.max_attempts, config.fallback_delay)
    }

    /// Create a classifier with explicit retry settings (for testing)
    pub fn with_retry(
        model: Arc<dyn VisionModel>,
        max_attempts: u32,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            model,
            gate: AdmissionGate::new(),
            max_attempts: max_attempts.max(1),
            fallback_delay,
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Verdict for the image at `image_url`
    pub async fn classify(&self, image_url: &str) -> Result<Verdict, PipelineError> {
        let _pass = self.gate.enter().await;

        for attempt in 1..=self.max_attempts {
            match self.model.ask(image_url).await {
                Ok(answer) => {
                    let verdict = Verdict::from_answer(&answer);
                    debug!(
                        "Image {} classified {} by {} ({:?})",
                        image_url,
                        verdict,
                        self.model.model_name(),
                        answer
                    );
                    return Ok(verdict);
                }
                Err(PipelineError::RateLimited { retry_after }) => {
                    if attempt == self.max_attempts {
                        break;
                    }
                    let wait = retry_after.unwrap_or(self.fallback_delay);
                    warn!(
                        "{} rate limited (attempt {}/{}), waiting {:?}",
                        self.model.model_name(),
                        attempt,
                        self.max_attempts,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Classifier still rate limited after {} attempts, giving up",
            self.max_attempts
        );
        Err(PipelineError::RateLimitExhausted {
            attempts: self.max_attempts,
        })
    }
}
