//! Tower data model

use crate::{ensure_finite, model, PropagationError, Result};
use geodesy::GeoPoint;
use serde::{Deserialize, Serialize};

/// Largest accepted |reference power| in dBm
pub const MAX_REFERENCE_POWER_DBM: f64 = 1.0e6;

/// Search radius of a nearby-tower lookup when the caller gives none
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 10_000.0;

/// Per-tower hardware profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TowerParameters {
    /// dBm at unit distance
    pub reference_power: f64,
    /// Tower's own exponent; simulations override it network-wide
    pub path_loss_exponent: f64,
    /// MHz
    pub frequency: f64,
    /// Meters above ground (inventory data, not used by the model)
    pub antenna_height: f64,
    /// dBm (accepted, not used by the model)
    pub transmitter_power: f64,
    /// dB (accepted, not used by the model)
    pub antenna_gain: f64,
}

impl Default for TowerParameters {
    fn default() -> Self {
        Self {
            reference_power: -30.0,
            path_loss_exponent: 3.0,
            frequency: 2100.0,
            antenna_height: 30.0,
            transmitter_power: 20.0,
            antenna_gain: 10.0,
        }
    }
}

impl TowerParameters {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("reference power", self.reference_power)?;
        ensure_finite("path loss exponent", self.path_loss_exponent)?;
        ensure_finite("frequency", self.frequency)?;
        ensure_finite("antenna height", self.antenna_height)?;
        ensure_finite("transmitter power", self.transmitter_power)?;
        ensure_finite("antenna gain", self.antenna_gain)?;

        if self.frequency <= 0.0 {
            return Err(PropagationError::NonPositiveFrequency(self.frequency));
        }
        if self.reference_power.abs() > MAX_REFERENCE_POWER_DBM {
            return Err(PropagationError::OutOfRange {
                field: "reference power",
                value: self.reference_power,
                limit: MAX_REFERENCE_POWER_DBM,
            });
        }
        Ok(())
    }

    /// Received power at `distance_m` under the given exponent
    #[inline]
    pub fn signal_at(&self, distance_m: f64, path_loss_exponent: f64) -> f64 {
        model::signal_strength(
            distance_m,
            self.reference_power,
            path_loss_exponent,
            self.frequency,
            self.transmitter_power,
            self.antenna_gain,
        )
    }
}

/// Radio access technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "2G")]
    G2,
    #[serde(rename = "3G")]
    G3,
    #[serde(rename = "4G")]
    G4,
    #[serde(rename = "5G")]
    G5,
}

impl Technology {
    pub fn label(&self) -> &'static str {
        match self {
            Technology::G2 => "2G",
            Technology::G3 => "3G",
            Technology::G4 => "4G",
            Technology::G5 => "5G",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

fn default_technology() -> Vec<Technology> {
    vec![Technology::G4]
}

fn default_capacity() -> u32 {
    1000
}

fn default_coverage_radius() -> f64 {
    5000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tower {
    #[serde(alias = "towerId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub location: GeoPoint,
    pub network: String,
    #[serde(default = "default_technology")]
    pub technology: Vec<Technology>,
    #[serde(default)]
    pub parameters: TowerParameters,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Nominal radius in meters (inventory data)
    #[serde(default = "default_coverage_radius")]
    pub coverage_radius: f64,
    #[serde(default)]
    pub status: TowerStatus,
}

impl Tower {
    /// Active tower with default parameters
    pub fn new(id: impl Into<String>, network: impl Into<String>, location: GeoPoint) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location,
            network: network.into(),
            technology: default_technology(),
            parameters: TowerParameters::default(),
            capacity: default_capacity(),
            coverage_radius: default_coverage_radius(),
            status: TowerStatus::Active,
        }
    }

    pub fn with_parameters(mut self, parameters: TowerParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_status(mut self, status: TowerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_serving(&self) -> bool {
        self.status == TowerStatus::Active
    }

    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        self.parameters.validate()
    }
}

/// Towers that should take part in a simulation, in input order
pub fn serving_towers<'a>(towers: impl IntoIterator<Item = &'a Tower>) -> Vec<Tower> {
    towers
        .into_iter()
        .filter(|t| t.is_serving())
        .cloned()
        .collect()
}

/// Towers within `radius_m` of `point`, nearest first.
///
/// Equidistant towers keep their input order.
pub fn towers_within<'a>(point: &GeoPoint, radius_m: f64, towers: &'a [Tower]) -> Vec<&'a Tower> {
    let mut nearby: Vec<(f64, &Tower)> = towers
        .iter()
        .map(|t| (point.distance_to(&t.location), t))
        .filter(|(d, _)| *d <= radius_m)
        .collect();
    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    nearby.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = TowerParameters::default();
        assert_eq!(p.reference_power, -30.0);
        assert_eq!(p.frequency, 2100.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_parameter_validation() {
        let p = TowerParameters {
            frequency: -900.0,
            ..Default::default()
        };
        assert_eq!(p.validate(), Err(PropagationError::NonPositiveFrequency(-900.0)));

        let p = TowerParameters {
            reference_power: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(PropagationError::NonFinite { field: "reference power", .. })
        ));
    }

    #[test]
    fn test_rejects_huge_reference_power() {
        let p = TowerParameters {
            reference_power: 1e30,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(PropagationError::OutOfRange { field: "reference power", .. })
        ));

        let p = TowerParameters {
            reference_power: -MAX_REFERENCE_POWER_DBM,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_towers_within_radius_nearest_first() {
        let centre = GeoPoint::new(40.7, -74.0);
        let towers = vec![
            Tower::new("FAR", "telco1", GeoPoint::new(40.78, -74.0)),
            Tower::new("NEAR", "telco2", GeoPoint::new(40.71, -74.0)),
            Tower::new("OUT", "telco3", GeoPoint::new(41.0, -74.0)),
            Tower::new("HERE", "multi", centre),
        ];

        let ids: Vec<_> = towers_within(&centre, DEFAULT_NEARBY_RADIUS_M, &towers)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["HERE", "NEAR", "FAR"]);
        assert!(towers_within(&centre, 0.0, &towers[..3]).is_empty());
    }

    #[test]
    fn test_tower_validation_rejects_bad_location() {
        let tower = Tower::new("T-1", "telco1", GeoPoint::new(95.0, 0.0));
        assert!(matches!(
            tower.validate(),
            Err(PropagationError::InvalidLocation(_))
        ));
    }

    #[test]
    fn test_serving_filter_keeps_order() {
        let towers = vec![
            Tower::new("A", "telco1", GeoPoint::new(0.0, 0.0)),
            Tower::new("B", "telco2", GeoPoint::new(0.0, 0.0)).with_status(TowerStatus::Maintenance),
            Tower::new("C", "telco3", GeoPoint::new(0.0, 0.0)),
            Tower::new("D", "multi", GeoPoint::new(0.0, 0.0)).with_status(TowerStatus::Inactive),
        ];
        let ids: Vec<_> = serving_towers(&towers).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "towerId": "T-42",
            "location": {"latitude": 6.5, "longitude": 3.4},
            "network": "telco2",
            "technology": ["4G", "5G"],
            "parameters": {"referencePower": -25}
        }"#;
        let tower: Tower = serde_json::from_str(json).unwrap();
        assert_eq!(tower.id, "T-42");
        assert_eq!(tower.technology, vec![Technology::G4, Technology::G5]);
        assert_eq!(tower.parameters.reference_power, -25.0);
        assert_eq!(tower.parameters.frequency, 2100.0);
        assert_eq!(tower.status, TowerStatus::Active);
        assert_eq!(tower.capacity, 1000);
    }

    #[test]
    fn test_signal_at_uses_given_exponent() {
        let p = TowerParameters::default();
        let d = 3.0;
        assert!(p.signal_at(d, 2.0) > p.signal_at(d, 3.0));
        assert_eq!(p.signal_at(0.0, 9.0), p.reference_power);
    }
}
