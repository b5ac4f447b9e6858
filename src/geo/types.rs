// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Coordinates, bounding boxes and route candidates

use serde::{Deserialize, Serialize};

/// Metres per degree of latitude (mean, WGS84)
const METRES_PER_DEGREE: f64 = 111_320.0;

/// A WGS84 position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from a GeoJSON-ordered `[lon, lat]` pair
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lon: pair[0],
        }
    }

    /// GeoJSON ordering
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Axis-aligned box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty path
    pub fn enclosing(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for p in &points[1..] {
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lon = bbox.max_lon.max(p.lon);
            bbox.max_lat = bbox.max_lat.max(p.lat);
        }
        Some(bbox)
    }

    /// Grow the box by `degrees` on every side
    pub fn padded(self, degrees: f64) -> Self {
        Self {
            min_lon: self.min_lon - degrees,
            min_lat: self.min_lat - degrees,
            max_lon: self.max_lon + degrees,
            max_lat: self.max_lat + degrees,
        }
    }

    /// Box approximating a circle of `radius_m` metres around `center`
    pub fn around(center: Coordinate, radius_m: f64) -> Self {
        let dlat = radius_m / METRES_PER_DEGREE;
        let cos_lat = center.lat.to_radians().cos().abs().max(1e-6);
        let dlon = radius_m / (METRES_PER_DEGREE * cos_lat);
        Self {
            min_lon: center.lon - dlon,
            min_lat: center.lat - dlat,
            max_lon: center.lon + dlon,
            max_lat: center.lat + dlat,
        }
    }

    /// `minLon,minLat,maxLon,maxLat`, the order imagery APIs expect
    pub fn to_query_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// GeoJSON-like line geometry as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn from_path(path: &[Coordinate]) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: path.iter().map(|c| c.to_lon_lat()).collect(),
        }
    }
}

/// One alternative path between two places
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub path: Vec<Coordinate>,
    /// Metres
    pub distance: f64,
    /// Milliseconds
    pub time: u64,
}

impl RouteCandidate {
    pub fn geometry(&self) -> LineString {
        LineString::from_path(&self.path)
    }
}
