//! Domain generators for property-based testing
//!
//! Every generator yields values that pass the engine's input validation.

use geodesy::{GeoArea, GeoPoint};
use proptest::prelude::*;
use propagation::{Environment, Tower, TowerParameters, TowerStatus};

// ============================================================================
// Coordinate Generators
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Any valid point
pub fn geo_point() -> impl Strategy<Value = GeoPoint> {
    (latitude_deg(), longitude_deg()).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

/// City-scale bounding area (spans 0.001 to 0.5 deg, away from the poles
/// and the antimeridian)
pub fn geo_area() -> impl Strategy<Value = GeoArea> {
    (-60.0f64..60.0, -170.0f64..170.0, 0.001f64..0.5, 0.001f64..0.5).prop_map(
        |(lat, lon, dlat, dlon)| {
            GeoArea::new(GeoPoint::new(lat + dlat, lon + dlon), GeoPoint::new(lat, lon))
        },
    )
}

/// Point inside `area`
pub fn point_in(area: GeoArea) -> impl Strategy<Value = GeoPoint> {
    (0.0f64..=1.0, 0.0f64..=1.0).prop_map(move |(u, v)| {
        GeoPoint::new(
            (area.south_west.latitude + u * area.latitude_span()).min(area.north_east.latitude),
            (area.south_west.longitude + v * area.longitude_span()).min(area.north_east.longitude),
        )
    })
}

// ============================================================================
// RF Generators
// ============================================================================

/// Reference power at unit distance (-60 to 0 dBm)
pub fn reference_power_dbm() -> impl Strategy<Value = f64> {
    -60.0f64..=0.0
}

/// Path-loss exponent (free space to dense indoor)
pub fn path_loss_exponent() -> impl Strategy<Value = f64> {
    2.0f64..=5.0
}

/// Carrier frequency (700 MHz to 6 GHz)
pub fn frequency_mhz() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(700.0),
        Just(900.0),
        Just(1800.0),
        Just(2100.0),
        Just(2600.0),
        Just(3500.0),
        700.0f64..=6000.0,
    ]
}

/// Receiver sensitivity (-130 to -70 dBm)
pub fn receiver_sensitivity_dbm() -> impl Strategy<Value = f64> {
    -130.0f64..=-70.0
}

pub fn environment() -> impl Strategy<Value = Environment> {
    prop_oneof![
        Just(Environment::Urban),
        Just(Environment::Suburban),
        Just(Environment::Rural),
    ]
}

pub fn tower_parameters() -> impl Strategy<Value = TowerParameters> {
    (
        reference_power_dbm(),
        path_loss_exponent(),
        frequency_mhz(),
        0.0f64..=43.0,
        0.0f64..=20.0,
    )
        .prop_map(
            |(reference_power, path_loss_exponent, frequency, transmitter_power, antenna_gain)| {
                TowerParameters {
                    reference_power,
                    path_loss_exponent,
                    frequency,
                    transmitter_power,
                    antenna_gain,
                    ..Default::default()
                }
            },
        )
}

// ============================================================================
// Tower Generators
// ============================================================================

/// Network identifier
pub fn network() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("telco1".to_string()),
        Just("telco2".to_string()),
        Just("telco3".to_string()),
        Just("multi".to_string()),
    ]
}

pub fn tower_status() -> impl Strategy<Value = TowerStatus> {
    prop_oneof![
        Just(TowerStatus::Active),
        Just(TowerStatus::Maintenance),
        Just(TowerStatus::Inactive),
    ]
}

/// Active tower somewhere inside `area`; ids are assigned by [`towers_in`]
pub fn tower_in(area: GeoArea) -> impl Strategy<Value = Tower> {
    (point_in(area), network(), tower_parameters()).prop_map(|(location, network, parameters)| {
        Tower::new("", network, location).with_parameters(parameters)
    })
}

/// Up to `max` towers inside `area`, with unique ids `T-0`, `T-1`, ...
pub fn towers_in(area: GeoArea, max: usize) -> impl Strategy<Value = Vec<Tower>> {
    prop::collection::vec(tower_in(area), 0..=max).prop_map(|towers| {
        towers
            .into_iter()
            .enumerate()
            .map(|(i, mut tower)| {
                tower.id = format!("T-{}", i);
                tower.name = format!("Tower {}", i);
                tower
            })
            .collect()
    })
}

/// Area with a tower list drawn inside it
pub fn scenario(max_towers: usize) -> impl Strategy<Value = (GeoArea, Vec<Tower>)> {
    geo_area().prop_flat_map(move |area| (Just(area), towers_in(area, max_towers)))
}

/// Small grid resolution for fast property runs
pub fn grid_resolution() -> impl Strategy<Value = u32> {
    1u32..=12
}
