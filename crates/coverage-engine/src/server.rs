//! Best-server selection

use crate::{CoverageError, CoveragePoint, Result};
use geodesy::GeoPoint;
use propagation::{to_bars, Tower};

/// Which path-loss exponent drives the signal estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExponentPolicy {
    /// One exponent for every tower (grid simulations)
    SimulationWide(f64),
    /// Each tower's own `parameters.path_loss_exponent`
    PerTower,
}

impl ExponentPolicy {
    #[inline]
    fn exponent_for(&self, tower: &Tower) -> f64 {
        match self {
            ExponentPolicy::SimulationWide(n) => *n,
            ExponentPolicy::PerTower => tower.parameters.path_loss_exponent,
        }
    }
}

/// Winning tower at a location
#[derive(Debug, Clone, Copy)]
pub(crate) struct ServingCell<'a> {
    pub tower: &'a Tower,
    pub signal_dbm: f64,
    pub distance_m: f64,
}

/// Scan towers in order, keeping the first tower that reaches the maximum.
///
/// A non-finite estimate aborts with [`CoverageError::ArithmeticFault`].
pub(crate) fn best_server<'a>(
    location: &GeoPoint,
    towers: &'a [Tower],
    policy: ExponentPolicy,
) -> Result<Option<ServingCell<'a>>> {
    let mut best: Option<ServingCell<'a>> = None;
    let mut max_signal = f64::NEG_INFINITY;

    for tower in towers {
        let distance_m = location.distance_to(&tower.location);
        let signal_dbm = tower
            .parameters
            .signal_at(distance_m, policy.exponent_for(tower));

        if !signal_dbm.is_finite() {
            return Err(CoverageError::ArithmeticFault {
                latitude: location.latitude,
                longitude: location.longitude,
            });
        }

        // Strict comparison: ties keep the earlier tower
        if signal_dbm > max_signal {
            max_signal = signal_dbm;
            best = Some(ServingCell {
                tower,
                signal_dbm,
                distance_m,
            });
        }
    }

    Ok(best)
}

/// Build the record for one location from pre-validated inputs
#[inline]
pub(crate) fn coverage_at(
    location: GeoPoint,
    towers: &[Tower],
    policy: ExponentPolicy,
    receiver_sensitivity: f64,
) -> Result<CoveragePoint> {
    let point = match best_server(&location, towers, policy)? {
        Some(cell) => CoveragePoint {
            latitude: location.latitude,
            longitude: location.longitude,
            signal_strength: cell.signal_dbm,
            signal_bars: to_bars(cell.signal_dbm, receiver_sensitivity),
            network: Some(cell.tower.network.clone()),
            serving_tower: Some(cell.tower.id.clone()),
            distance: cell.distance_m,
        },
        None => CoveragePoint {
            latitude: location.latitude,
            longitude: location.longitude,
            signal_strength: f64::NEG_INFINITY,
            signal_bars: 0,
            network: None,
            serving_tower: None,
            distance: 0.0,
        },
    };
    Ok(point)
}

/// Best server at a single location.
///
/// Validates the location, towers, exponent and sensitivity before scanning.
pub fn evaluate_point(
    location: GeoPoint,
    towers: &[Tower],
    policy: ExponentPolicy,
    receiver_sensitivity: f64,
) -> Result<CoveragePoint> {
    location.validate()?;
    crate::engine::validate_towers(towers)?;

    if let ExponentPolicy::SimulationWide(n) = policy {
        if !n.is_finite() || n <= 0.0 {
            return Err(CoverageError::InvalidParameters(format!(
                "path loss exponent must be finite and positive, got {}",
                n
            )));
        }
    }
    if !receiver_sensitivity.is_finite() || receiver_sensitivity >= 0.0 {
        return Err(CoverageError::InvalidParameters(format!(
            "receiver sensitivity must be finite and negative, got {} dBm",
            receiver_sensitivity
        )));
    }

    coverage_at(location, towers, policy, receiver_sensitivity)
}
