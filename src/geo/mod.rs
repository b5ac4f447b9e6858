// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Geocoding and pedestrian routing collaborators

pub mod geocoder;
pub mod router;
pub mod types;

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use router::{GraphHopperRouter, RouteProvider};
pub use types::{BoundingBox, Coordinate, LineString, RouteCandidate};
