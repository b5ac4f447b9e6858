// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Street-level imagery lookup and route sampling

pub mod mapillary;
pub mod provider;
pub mod sampler;

pub use mapillary::MapillaryProvider;
pub use provider::{ImageRef, ImageryProvider};
pub use sampler::{sampler_for, AlongRouteSampler, BoundingBoxSampler, ImagerySampler};
