//! Verbose-mode link diagnostics
//!
//! Explains, per tower, how the signal at the worst-placed corner of the
//! area was derived, and which towers sit near the area centre.

use crate::Scenario;
use geodesy::{GeoArea, GeoPoint};
use propagation::{
    propagation_breakdown, towers_within, PropagationBreakdown, DEFAULT_NEARBY_RADIUS_M,
};
use tracing::debug;

fn corners(area: &GeoArea) -> [GeoPoint; 4] {
    let ne = area.north_east;
    let sw = area.south_west;
    [
        sw,
        GeoPoint::new(sw.latitude, ne.longitude),
        GeoPoint::new(ne.latitude, sw.longitude),
        ne,
    ]
}

fn centre(area: &GeoArea) -> GeoPoint {
    GeoPoint::new(
        area.south_west.latitude + area.latitude_span() / 2.0,
        area.south_west.longitude + area.longitude_span() / 2.0,
    )
}

/// Breakdown at each tower's farthest area corner, in tower order.
///
/// Uses the simulation-wide path-loss exponent, as the grid run does.
pub fn corner_breakdowns(scenario: &Scenario) -> Vec<(String, PropagationBreakdown)> {
    let corners = corners(&scenario.area);
    scenario
        .towers
        .iter()
        .map(|tower| {
            let farthest = corners
                .iter()
                .map(|c| tower.location.distance_to(c))
                .fold(0.0, f64::max);
            let breakdown = propagation_breakdown(
                farthest,
                tower.parameters.reference_power,
                scenario.parameters.path_loss_exponent,
                tower.parameters.frequency,
            );
            (tower.id.clone(), breakdown)
        })
        .collect()
}

/// Ids of the towers within `radius_m` of the area centre, nearest first
pub fn towers_near_centre(scenario: &Scenario, radius_m: f64) -> Vec<String> {
    towers_within(&centre(&scenario.area), radius_m, &scenario.towers)
        .into_iter()
        .map(|t| t.id.clone())
        .collect()
}

pub fn log_diagnostics(scenario: &Scenario) {
    for (id, b) in corner_breakdowns(scenario) {
        debug!(
            tower = %id,
            distance_m = b.distance_m,
            log_distance_dbm = b.log_distance_dbm,
            free_space_loss_db = b.free_space_loss_db,
            received_dbm = b.received_dbm,
            floor_applied = b.floor_applied,
            "Worst-corner link"
        );
    }

    let nearby = towers_near_centre(scenario, DEFAULT_NEARBY_RADIUS_M);
    debug!(
        radius_m = DEFAULT_NEARBY_RADIUS_M,
        "{} towers near area centre: {:?}",
        nearby.len(),
        nearby
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage_engine::{SimulationParameters, TowerInventory};
    use propagation::{log_distance_dbm, Tower};

    fn scenario(towers: Vec<Tower>) -> Scenario {
        Scenario {
            name: "test".to_string(),
            area: GeoArea::new(GeoPoint::new(0.02, 0.02), GeoPoint::new(0.0, 0.0)),
            inventory: TowerInventory::from_towers(&towers),
            towers,
            parameters: SimulationParameters::default(),
            grid_resolution: 4,
            skipped: 0,
        }
    }

    #[test]
    fn test_corner_breakdown_uses_farthest_corner() {
        let s = scenario(vec![
            Tower::new("SW", "telco1", GeoPoint::new(0.0, 0.0)),
            Tower::new("MID", "telco2", GeoPoint::new(0.01, 0.01)),
        ]);
        let rows = corner_breakdowns(&s);
        assert_eq!(rows.len(), 2);

        let (id, sw) = &rows[0];
        assert_eq!(id, "SW");
        let expected = GeoPoint::new(0.0, 0.0).distance_to(&GeoPoint::new(0.02, 0.02));
        assert!((sw.distance_m - expected).abs() < 1e-9);
        assert_eq!(
            sw.log_distance_dbm,
            log_distance_dbm(sw.distance_m, -30.0, s.parameters.path_loss_exponent)
        );

        // Centre tower: every corner is nearer than the opposite corner is to SW
        assert!(rows[1].1.distance_m < sw.distance_m);
        assert!(rows[1].1.received_dbm >= sw.received_dbm);
    }

    #[test]
    fn test_towers_near_centre() {
        let s = scenario(vec![
            Tower::new("SW", "telco1", GeoPoint::new(0.0, 0.0)),
            Tower::new("MID", "telco2", GeoPoint::new(0.01, 0.01)),
            Tower::new("AWAY", "telco3", GeoPoint::new(1.0, 1.0)),
        ]);

        assert_eq!(towers_near_centre(&s, DEFAULT_NEARBY_RADIUS_M), vec!["MID", "SW"]);
        assert_eq!(towers_near_centre(&s, 100.0), vec!["MID"]);
        assert!(towers_near_centre(&scenario(vec![]), DEFAULT_NEARBY_RADIUS_M).is_empty());
    }
}
