//! Signal strength and bar rating calculations

/// Free-space path loss constant for distance in meters and frequency in MHz
const FSPL_CONSTANT_DB: f64 = 27.55;

/// Highest bar rating
pub const MAX_BARS: u8 = 5;

/// Normalized thresholds for bars 5..=2, checked in descending order
const BAR_THRESHOLDS: [(f64, u8); 4] = [(0.8, 5), (0.6, 4), (0.4, 3), (0.2, 2)];

/// Log-distance estimate in dBm (before the free-space floor)
#[inline]
pub fn log_distance_dbm(distance_m: f64, reference_power_dbm: f64, path_loss_exponent: f64) -> f64 {
    reference_power_dbm - 10.0 * path_loss_exponent * (distance_m + 1.0).log10()
}

/// Free space path loss in dB
#[inline]
pub fn free_space_path_loss_db(distance_m: f64, frequency_mhz: f64) -> f64 {
    20.0 * distance_m.log10() + 20.0 * frequency_mhz.log10() - FSPL_CONSTANT_DB
}

/// Received signal strength in dBm at `distance_m` from a tower.
///
/// `transmitter_power_dbm` and `antenna_gain_db` are accepted but do not
/// enter the formula; the model is driven by reference power, exponent and
/// frequency only.
#[inline]
pub fn signal_strength(
    distance_m: f64,
    reference_power_dbm: f64,
    path_loss_exponent: f64,
    frequency_mhz: f64,
    _transmitter_power_dbm: f64,
    _antenna_gain_db: f64,
) -> f64 {
    if distance_m == 0.0 {
        return reference_power_dbm;
    }

    let estimate = log_distance_dbm(distance_m, reference_power_dbm, path_loss_exponent);
    let fsl = free_space_path_loss_db(distance_m, frequency_mhz);

    estimate.max(-fsl)
}

/// Discretize dBm into 0-5 bars relative to receiver sensitivity
pub fn to_bars(dbm: f64, sensitivity_dbm: f64) -> u8 {
    if dbm < sensitivity_dbm {
        return 0;
    }

    let normalized = (dbm - sensitivity_dbm) / sensitivity_dbm.abs();

    BAR_THRESHOLDS
        .iter()
        .find(|(threshold, _)| normalized >= *threshold)
        .map(|(_, bars)| *bars)
        .unwrap_or(1)
}

/// Detailed propagation breakdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationBreakdown {
    pub distance_m: f64,
    pub log_distance_dbm: f64,
    pub free_space_loss_db: f64,
    pub received_dbm: f64,
    /// True when the free-space bound, not the log-distance estimate, set the result
    pub floor_applied: bool,
}

/// Get detailed breakdown
pub fn propagation_breakdown(
    distance_m: f64,
    reference_power_dbm: f64,
    path_loss_exponent: f64,
    frequency_mhz: f64,
) -> PropagationBreakdown {
    if distance_m == 0.0 {
        return PropagationBreakdown {
            distance_m,
            log_distance_dbm: reference_power_dbm,
            free_space_loss_db: 0.0,
            received_dbm: reference_power_dbm,
            floor_applied: false,
        };
    }

    let estimate = log_distance_dbm(distance_m, reference_power_dbm, path_loss_exponent);
    let fsl = free_space_path_loss_db(distance_m, frequency_mhz);

    PropagationBreakdown {
        distance_m,
        log_distance_dbm: estimate,
        free_space_loss_db: fsl,
        received_dbm: estimate.max(-fsl),
        floor_applied: -fsl > estimate,
    }
}
