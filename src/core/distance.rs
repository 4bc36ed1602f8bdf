use crate::models::{BoundingBox, Coordinate};
use geo::{Coord, Intersects, Point, Rect};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

const KM_PER_DEGREE: f64 = 111.0;

/// Errors from distance calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    #[error("invalid argument: {0} must be a latitude or longitude value")]
    InvalidArgument(&'static str),
}

/// Unit a distance is reported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    #[serde(alias = "km")]
    Kilometers,
    #[serde(alias = "mi")]
    Miles,
}

impl DistanceUnit {
    pub fn earth_radius(self) -> f64 {
        match self {
            Self::Kilometers => EARTH_RADIUS_KM,
            Self::Miles => EARTH_RADIUS_MILES,
        }
    }

    pub fn to_km(self, distance: f64) -> f64 {
        distance * EARTH_RADIUS_KM / self.earth_radius()
    }

    /// Plural label for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Miles => "miles",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Self::Kilometers),
            "mi" | "miles" => Ok(Self::Miles),
            other => Err(format!("unknown distance unit: {}", other)),
        }
    }
}

/// Great-circle distance between two points using the haversine formula
///
/// `a` is clamped to `[0, 1]`; identical points give exactly 0.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, unit: DistanceUnit) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    unit.earth_radius() * c
}

/// Checked variant of [`haversine_distance`] for values that may be absent
///
/// `0.0` is a legal latitude or longitude; `None` and NaN are not.
pub fn calculate_distance(
    lat1: Option<f64>,
    lon1: Option<f64>,
    lat2: Option<f64>,
    lon2: Option<f64>,
    unit: DistanceUnit,
) -> Result<f64, DistanceError> {
    let lat1 = require(lat1, "lat1")?;
    let lon1 = require(lon1, "lon1")?;
    let lat2 = require(lat2, "lat2")?;
    let lon2 = require(lon2, "lon2")?;

    Ok(haversine_distance(lat1, lon1, lat2, lon2, unit))
}

fn require(value: Option<f64>, name: &'static str) -> Result<f64, DistanceError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DistanceError::InvalidArgument(name)),
    }
}

impl Coordinate {
    pub fn distance_to(&self, other: &Coordinate, unit: DistanceUnit) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude, unit)
    }
}

/// Calculate a bounding box around a center point
///
/// 1° latitude ≈ 111km, 1° longitude ≈ 111km * cos(latitude). Near the poles,
/// or when the box would cross the antimeridian, longitude is left unbounded.
pub fn calculate_bounding_box(center: Coordinate, radius: f64, unit: DistanceUnit) -> BoundingBox {
    let radius_km = unit.to_km(radius);
    let lat_delta = radius_km / KM_PER_DEGREE;

    let min_lat = (center.latitude - lat_delta).max(-90.0);
    let max_lat = (center.latitude + lat_delta).min(90.0);

    let cos_lat = center.latitude.to_radians().cos().abs();
    let (min_lon, max_lon) = if cos_lat < 1e-6 {
        (-180.0, 180.0)
    } else {
        let lon_delta = radius_km / (KM_PER_DEGREE * cos_lat);
        let min = center.longitude - lon_delta;
        let max = center.longitude + lon_delta;
        if min < -180.0 || max > 180.0 {
            (-180.0, 180.0)
        } else {
            (min, max)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

impl BoundingBox {
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.min_lon, y: self.min_lat },
            Coord { x: self.max_lon, y: self.max_lat },
        )
    }
}

/// Check if a point is within a bounding box, edges included
#[inline]
pub fn is_within_bounding_box(point: Coordinate, bbox: &BoundingBox) -> bool {
    Point::new(point.longitude, point.latitude).intersects(&bbox.to_rect())
}
