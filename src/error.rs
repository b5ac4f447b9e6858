// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Errors shared by the geocoding, routing, imagery and classification stages

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while planning and rating a route
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A place name could not be resolved to a coordinate
    #[error("Place not found: {place}")]
    PlaceNotFound {
        /// The unresolved place name
        place: String,
    },

    /// An upstream service answered with a non-success status
    #[error("{service} returned {status}: {message}")]
    Upstream {
        /// Name of the upstream service
        service: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The request never produced a response (connect error, timeout)
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream body did not have the expected shape
    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    /// A single 429 from the classification provider
    #[error("Rate limited by classifier{}", retry_after_suffix(.retry_after))]
    RateLimited {
        /// Provider-suggested wait, when the response carried one
        retry_after: Option<Duration>,
    },

    /// Every classification attempt was rate limited
    #[error("Classifier still rate limited after {attempts} attempts")]
    RateLimitExhausted {
        /// Number of attempts made before giving up
        attempts: u32,
    },

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Wrap a reqwest error for the given service
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        PipelineError::Transport { service, source }
    }

    /// Build a decode error from anything displayable
    pub fn decode(service: &'static str, message: impl std::fmt::Display) -> Self {
        PipelineError::Decode {
            service,
            message: message.to_string(),
        }
    }
}

fn retry_after_suffix(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(", retry after {}s", wait.as_secs()),
        None => String::new(),
    }
}
