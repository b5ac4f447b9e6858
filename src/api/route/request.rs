// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Route API request types

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Query string for GET /route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start_place: Option<String>,
    pub end_place: Option<String>,
}

impl RouteQuery {
    /// Both places, or a validation error naming the first missing one
    pub fn places(&self) -> Result<(&str, &str), ApiError> {
        let start = required("start_place", &self.start_place)?;
        let end = required("end_place", &self.end_place)?;
        Ok((start, end))
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::ValidationError {
            field: field.to_string(),
            message: "field required".to_string(),
        }),
    }
}
