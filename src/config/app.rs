// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;

use crate::error::PipelineError;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_GRAPHHOPPER_URL: &str = "https://graphhopper.com/api/1/route";
pub const DEFAULT_MAPILLARY_URL: &str = "https://graph.mapillary.com/images";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

pub const DEFAULT_CLASSIFIER_MODEL: &str = "google/gemma-3-27b-it:free";
pub const DEFAULT_CLASSIFIER_PROMPT: &str =
    "Analyse cette image et réponds uniquement par 'safe' ou 'danger'.";

/// API keys for the three authenticated upstreams
#[derive(Clone, Default)]
pub struct ServiceKeys {
    pub graphhopper_api_key: Option<String>,
    pub mapillary_token: Option<String>,
    pub openrouter_api_key: Option<String>,
}

impl fmt::Debug for ServiceKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |k: &Option<String>| if k.is_some() { "<set>" } else { "<missing>" };
        f.debug_struct("ServiceKeys")
            .field("graphhopper_api_key", &redact(&self.graphhopper_api_key))
            .field("mapillary_token", &redact(&self.mapillary_token))
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .finish()
    }
}

/// Upstream endpoint URLs (overridable for staging or test doubles)
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub nominatim_url: String,
    pub graphhopper_url: String,
    pub mapillary_url: String,
    pub openrouter_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            graphhopper_url: DEFAULT_GRAPHHOPPER_URL.to_string(),
            mapillary_url: DEFAULT_MAPILLARY_URL.to_string(),
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
        }
    }
}

/// Timeouts applied to every outbound call
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("safe-route/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Build the shared HTTP client
    pub fn build_client(&self) -> Result<Client, PipelineError> {
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {}", e)))
    }
}

/// Pedestrian routing parameters
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub max_paths: u32,
    pub profile: String,
    pub locale: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_paths: 3,
            profile: "foot".to_string(),
            locale: "fr".to_string(),
        }
    }
}

/// How imagery is gathered for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageryStrategy {
    /// Query around every Nth point of the path
    AlongRoute,
    /// One search over the padded bounding box of the whole path
    BoundingBox,
}

impl FromStr for ImageryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "along-route" | "along_route" | "points" => Ok(ImageryStrategy::AlongRoute),
            "bbox" | "bounding-box" | "bounding_box" => Ok(ImageryStrategy::BoundingBox),
            other => Err(format!(
                "unknown imagery strategy '{}'; expected 'along-route' or 'bbox'",
                other
            )),
        }
    }
}

impl fmt::Display for ImageryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageryStrategy::AlongRoute => write!(f, "along-route"),
            ImageryStrategy::BoundingBox => write!(f, "bbox"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageryConfig {
    pub strategy: ImageryStrategy,
    /// Every Nth path point is queried
    pub stride: usize,
    /// Search radius around a sampled point
    pub radius_m: f64,
    /// Fixed pause between successive point queries
    pub pause: Duration,
    /// Padding added to the route box in bounding-box mode
    pub bbox_padding_deg: f64,
    /// Images requested per bounding-box search
    pub bbox_limit: usize,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            strategy: ImageryStrategy::AlongRoute,
            stride: 15,
            radius_m: 50.0,
            pause: Duration::from_millis(200),
            bbox_padding_deg: 0.005,
            bbox_limit: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model: String,
    pub prompt: String,
    /// Total attempts when the provider keeps answering 429
    pub max_attempts: u32,
    /// Wait used when a 429 carries no usable Retry-After
    pub fallback_delay: Duration,
    /// Pause between two classifications of the same route
    pub pause_between: Duration,
    /// Only the first N images of a route are considered
    pub max_images_per_route: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            prompt: DEFAULT_CLASSIFIER_PROMPT.to_string(),
            max_attempts: 3,
            fallback_delay: Duration::from_secs(5),
            pause_between: Duration::from_secs(1),
            max_images_per_route: 5,
        }
    }
}

/// Status used when a place name cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// HTTP 200 with `{"error": "Lieu introuvable"}`
    Ok200,
    /// HTTP 404 with the same body
    NotFound404,
}

impl FromStr for NotFoundPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "200" => Ok(NotFoundPolicy::Ok200),
            "404" => Ok(NotFoundPolicy::NotFound404),
            other => Err(format!("unsupported not-found status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    pub not_found_policy: NotFoundPolicy,
    /// Thumbnail URLs returned per route in along-route mode
    pub preview_images: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            not_found_policy: NotFoundPolicy::Ok200,
            preview_images: 3,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub keys: ServiceKeys,
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub routing: RoutingConfig,
    pub imagery: ImageryConfig,
    pub classifier: ClassifierConfig,
    pub api: ApiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| non_empty(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            keys: ServiceKeys {
                graphhopper_api_key: non_empty("GRAPHHOPPER_API_KEY"),
                mapillary_token: non_empty("MAPILLARY_TOKEN"),
                openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            },
            endpoints: EndpointConfig {
                nominatim_url: non_empty("NOMINATIM_URL")
                    .unwrap_or(defaults.endpoints.nominatim_url),
                graphhopper_url: non_empty("GRAPHHOPPER_URL")
                    .unwrap_or(defaults.endpoints.graphhopper_url),
                mapillary_url: non_empty("MAPILLARY_URL")
                    .unwrap_or(defaults.endpoints.mapillary_url),
                openrouter_url: non_empty("OPENROUTER_URL")
                    .unwrap_or(defaults.endpoints.openrouter_url),
            },
            http: defaults.http,
            routing: RoutingConfig {
                max_paths: parsed("ROUTE_MAX_PATHS")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(defaults.routing.max_paths),
                ..defaults.routing
            },
            imagery: ImageryConfig {
                strategy: non_empty("IMAGERY_STRATEGY")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.imagery.strategy),
                stride: parsed("SAMPLING_STRIDE")
                    .and_then(|v| usize::try_from(v).ok())
                    .unwrap_or(defaults.imagery.stride),
                radius_m: non_empty("SAMPLING_RADIUS_M")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(defaults.imagery.radius_m),
                pause: parsed("SAMPLING_PAUSE_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.imagery.pause),
                ..defaults.imagery
            },
            classifier: ClassifierConfig {
                model: non_empty("CLASSIFIER_MODEL").unwrap_or(defaults.classifier.model),
                max_attempts: parsed("CLASSIFIER_MAX_ATTEMPTS")
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(defaults.classifier.max_attempts),
                fallback_delay: parsed("CLASSIFIER_FALLBACK_DELAY_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.classifier.fallback_delay),
                pause_between: parsed("CLASSIFIER_PAUSE_MS")
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.classifier.pause_between),
                max_images_per_route: parsed("MAX_IMAGES_PER_ROUTE")
                    .and_then(|v| usize::try_from(v).ok())
                    .unwrap_or(defaults.classifier.max_images_per_route),
                ..defaults.classifier
            },
            api: ApiConfig {
                listen_addr: non_empty("LISTEN_ADDR").unwrap_or(defaults.api.listen_addr),
                not_found_policy: non_empty("PLACE_NOT_FOUND_STATUS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.api.not_found_policy),
                preview_images: parsed("PREVIEW_IMAGES")
                    .and_then(|v| usize::try_from(v).ok())
                    .unwrap_or(defaults.api.preview_images),
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut missing = Vec::new();
        if self.keys.graphhopper_api_key.is_none() {
            missing.push("GRAPHHOPPER_API_KEY");
        }
        if self.keys.mapillary_token.is_none() {
            missing.push("MAPILLARY_TOKEN");
        }
        if self.keys.openrouter_api_key.is_none() {
            missing.push("OPENROUTER_API_KEY");
        }
        if !missing.is_empty() {
            return Err(PipelineError::Config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        for (name, value) in [
            ("NOMINATIM_URL", &self.endpoints.nominatim_url),
            ("GRAPHHOPPER_URL", &self.endpoints.graphhopper_url),
            ("MAPILLARY_URL", &self.endpoints.mapillary_url),
            ("OPENROUTER_URL", &self.endpoints.openrouter_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| PipelineError::Config(format!("{} is not a URL: {}", name, e)))?;
        }

        if self.imagery.stride == 0 {
            return Err(PipelineError::Config(
                "sampling stride must be greater than 0".to_string(),
            ));
        }
        if self.classifier.max_attempts == 0 {
            return Err(PipelineError::Config(
                "classifier attempts must be greater than 0".to_string(),
            ));
        }
        if self.classifier.max_images_per_route == 0 {
            return Err(PipelineError::Config(
                "images per route must be greater than 0".to_string(),
            ));
        }
        if self.routing.max_paths == 0 {
            return Err(PipelineError::Config(
                "max paths must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
