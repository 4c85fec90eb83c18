//! Geodesy Library
//!
//! Great-circle distance on a spherical Earth and the geographic point/area
//! types that bound a coverage grid.
//!
//! # Haversine
//!
//! ```text
//! a = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
//! d = 2R · atan2(√a, √(1−a))
//! ```
//!
//! with R = 6,371,000 m (mean Earth radius).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const M2_PER_KM2: f64 = 1_000_000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeodesyError {
    #[error("Non-finite coordinate: ({latitude}, {longitude})")]
    NonFinite { latitude: f64, longitude: f64 },
    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),
    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
    #[error("North-east corner must be strictly north of south-west corner: {north} <= {south}")]
    InvertedLatitudeSpan { north: f64, south: f64 },
    #[error("North-east corner must be strictly east of south-west corner: {east} <= {west}")]
    InvertedLongitudeSpan { east: f64, west: f64 },
}

pub type Result<T> = std::result::Result<T, GeodesyError>;

/// Haversine distance between two points in meters.
///
/// Inputs are degrees. Non-finite inputs yield NaN; validate upstream.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeodesyError::NonFinite {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeodesyError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeodesyError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Axis-aligned bounding area given by its north-east and south-west corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoArea {
    pub north_east: GeoPoint,
    pub south_west: GeoPoint,
}

impl GeoArea {
    pub const fn new(north_east: GeoPoint, south_west: GeoPoint) -> Self {
        Self {
            north_east,
            south_west,
        }
    }

    /// Check both corners and require strictly positive spans.
    pub fn validate(&self) -> Result<()> {
        self.north_east.validate()?;
        self.south_west.validate()?;

        if self.north_east.latitude <= self.south_west.latitude {
            return Err(GeodesyError::InvertedLatitudeSpan {
                north: self.north_east.latitude,
                south: self.south_west.latitude,
            });
        }
        if self.north_east.longitude <= self.south_west.longitude {
            return Err(GeodesyError::InvertedLongitudeSpan {
                east: self.north_east.longitude,
                west: self.south_west.longitude,
            });
        }
        Ok(())
    }

    pub fn latitude_span(&self) -> f64 {
        self.north_east.latitude - self.south_west.latitude
    }

    pub fn longitude_span(&self) -> f64 {
        self.north_east.longitude - self.south_west.longitude
    }

    /// North-south extent in meters, measured along the western edge
    pub fn height_m(&self) -> f64 {
        haversine_m(
            self.south_west.latitude,
            self.south_west.longitude,
            self.north_east.latitude,
            self.south_west.longitude,
        )
    }

    /// East-west extent in meters, measured along the southern edge
    pub fn width_m(&self) -> f64 {
        haversine_m(
            self.south_west.latitude,
            self.south_west.longitude,
            self.south_west.latitude,
            self.north_east.longitude,
        )
    }

    /// Rectangle approximation of the area in km²
    pub fn rectangle_area_km2(&self) -> f64 {
        self.height_m() * self.width_m() / M2_PER_KM2
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_area() -> GeoArea {
        GeoArea::new(GeoPoint::new(1.0, 1.0), GeoPoint::new(0.0, 0.0))
    }

    #[test]
    fn test_haversine_known_distance() {
        // NYC to London: ~5,570 km
        let dist = haversine_m(40.7128, -74.0060, 51.5074, -0.1278);
        assert!((dist - 5_570_000.0).abs() < 50_000.0);
    }

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_m(12.5, -45.25, 12.5, -45.25), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2πR / 360 ≈ 111.195 km
        let dist = haversine_m(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.93).abs() < 1.0, "got {}", dist);
    }

    #[test]
    fn test_non_finite_input_is_nan() {
        assert!(haversine_m(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_area_validation() {
        assert!(unit_area().validate().is_ok());

        let flat = GeoArea::new(GeoPoint::new(0.0, 1.0), GeoPoint::new(0.0, 0.0));
        assert!(matches!(
            flat.validate(),
            Err(GeodesyError::InvertedLatitudeSpan { .. })
        ));

        let inverted = GeoArea::new(GeoPoint::new(1.0, -1.0), GeoPoint::new(0.0, 0.0));
        assert!(matches!(
            inverted.validate(),
            Err(GeodesyError::InvertedLongitudeSpan { .. })
        ));

        let out_of_range = GeoArea::new(GeoPoint::new(91.0, 1.0), GeoPoint::new(0.0, 0.0));
        assert_eq!(
            out_of_range.validate(),
            Err(GeodesyError::LatitudeOutOfRange(91.0))
        );

        let nan = GeoArea::new(GeoPoint::new(1.0, f64::NAN), GeoPoint::new(0.0, 0.0));
        assert!(matches!(nan.validate(), Err(GeodesyError::NonFinite { .. })));
    }

    #[test]
    fn test_rectangle_area() {
        // One degree square at the equator: ~111.19 km × ~111.19 km
        let area = unit_area().rectangle_area_km2();
        assert!((area - 12_364.3).abs() < 5.0, "got {}", area);
    }

    #[test]
    fn test_contains() {
        let area = unit_area();
        assert!(area.contains(&GeoPoint::new(0.5, 0.5)));
        assert!(area.contains(&GeoPoint::new(1.0, 0.0)));
        assert!(!area.contains(&GeoPoint::new(1.5, 0.5)));
    }

    #[test]
    fn test_area_serializes_camel_case() {
        let json = serde_json::to_value(unit_area()).unwrap();
        assert_eq!(json["northEast"]["latitude"], 1.0);
        assert_eq!(json["southWest"]["longitude"], 0.0);
    }

    proptest! {
        #[test]
        fn test_distance_symmetric(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let ab = haversine_m(lat1, lon1, lat2, lon2);
            let ba = haversine_m(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            prop_assert!(ab >= 0.0);
            prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
        }

        #[test]
        fn test_distance_to_self_is_zero(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let p = GeoPoint::new(lat, lon);
            prop_assert_eq!(p.distance_to(&p), 0.0);
        }
    }
}
