// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::NotFoundPolicy;
use crate::error::PipelineError;

pub const PLACE_NOT_FOUND_MESSAGE: &str = "Lieu introuvable";
pub const CLASSIFIER_EXHAUSTED_MESSAGE: &str =
    "Trop de requêtes vers OpenRouter, réessayer plus tard.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
    pub error_type: String,
}

/// Body used when a place cannot be geocoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceNotFoundResponse {
    pub error: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    PlaceNotFound {
        place: String,
        policy: NotFoundPolicy,
    },
    ValidationError {
        field: String,
        message: String,
    },
    RateLimitExceeded {
        attempts: u32,
    },
    UpstreamFailure(String),
    InternalError(String),
}

impl ApiError {
    /// Map a pipeline failure onto the HTTP contract
    pub fn from_pipeline(err: PipelineError, policy: NotFoundPolicy) -> Self {
        match err {
            PipelineError::PlaceNotFound { place } => ApiError::PlaceNotFound { place, policy },
            PipelineError::RateLimitExhausted { attempts } => {
                ApiError::RateLimitExceeded { attempts }
            }
            // a lone 429 never escapes the classifier, but treat it the same way
            PipelineError::RateLimited { .. } => ApiError::RateLimitExceeded { attempts: 1 },
            e @ (PipelineError::Upstream { .. }
            | PipelineError::Transport { .. }
            | PipelineError::Decode { .. }) => ApiError::UpstreamFailure(e.to_string()),
            PipelineError::Config(msg) => ApiError::InternalError(msg),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, detail) = match self {
            ApiError::PlaceNotFound { .. } => {
                ("place_not_found", PLACE_NOT_FOUND_MESSAGE.to_string())
            }
            ApiError::ValidationError { field, message } => {
                ("validation_error", format!("{}: {}", field, message))
            }
            ApiError::RateLimitExceeded { .. } => (
                "rate_limit_exceeded",
                CLASSIFIER_EXHAUSTED_MESSAGE.to_string(),
            ),
            ApiError::UpstreamFailure(_) => ("upstream_error", "Internal Server Error".to_string()),
            ApiError::InternalError(_) => ("internal_error", "Internal Server Error".to_string()),
        };

        ErrorResponse {
            detail,
            error_type: error_type.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::PlaceNotFound { policy, .. } => match policy {
                NotFoundPolicy::Ok200 => 200,
                NotFoundPolicy::NotFound404 => 404,
            },
            ApiError::ValidationError { .. } => 422,
            ApiError::RateLimitExceeded { .. } => 429,
            ApiError::UpstreamFailure(_) | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::PlaceNotFound { place, .. } => write!(f, "Place not found: {}", place),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::RateLimitExceeded { attempts } => write!(
                f,
                "Classifier rate limit exceeded after {} attempts",
                attempts
            ),
            ApiError::UpstreamFailure(msg) => write!(f, "Upstream failure: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self {
            // The not-found contract carries `error`, not `detail`
            ApiError::PlaceNotFound { .. } => (
                status,
                Json(PlaceNotFoundResponse {
                    error: PLACE_NOT_FOUND_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            other => (status, Json(other.to_response())).into_response(),
        }
    }
}
