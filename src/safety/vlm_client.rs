// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision-language model client via an OpenAI-compatible chat completion API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::error::PipelineError;

const SERVICE: &str = "openrouter";

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A model that answers one fixed question about one image
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Raw text answer for the image at `image_url`.
    ///
    /// A 429 must surface as [`PipelineError::RateLimited`] so the caller can
    /// retry; every other failure is final.
    async fn ask(&self, image_url: &str) -> Result<String, PipelineError>;

    fn model_name(&self) -> &str;
}

/// Client for a hosted OpenAI-compatible chat completion endpoint
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model_name: String,
    prompt: String,
}

impl OpenRouterClient {
    /// Create a new client
    pub fn new(
        client: Client,
        endpoint: &str,
        api_key: String,
        model_name: &str,
        prompt: &str,
    ) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Vision client configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Self {
            client,
            endpoint,
            api_key,
            model_name: model_name.to_string(),
            prompt: prompt.to_string(),
        }
    }

    fn build_request(&self, image_url: &str) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": self.prompt},
                    {"type": "image_url", "image_url": {"url": image_url}}
                ]),
            }],
            max_tokens: 16,
            temperature: 0.0,
        }
    }
}

#[async_trait]
impl VisionModel for OpenRouterClient {
    async fn ask(&self, image_url: &str) -> Result<String, PipelineError> {
        let start = std::time::Instant::now();
        let request = self.build_request(image_url);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::transport(SERVICE, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(PipelineError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::decode(SERVICE, e))?;
        let answer = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            "Vision answer {:?} in {}ms",
            answer,
            start.elapsed().as_millis()
        );
        Ok(answer)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// `Retry-After` in whole seconds; HTTP-date and garbage yield `None`
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
