//! Propagation Model Library
//!
//! Converts distance and per-tower RF parameters into a received-power
//! estimate (dBm) and a 0-5 bar rating.
//!
//! # Signal Model
//!
//! ```text
//! P(d)  = P₀ − 10·n·log₁₀(d + 1)
//! FSL   = 20·log₁₀(d) + 20·log₁₀(f_MHz) − 27.55
//! Prx   = max(P(d), −FSL)            (d > 0)
//! Prx   = P₀                         (d = 0)
//! ```
//!
//! | Term | Source | Description |
//! |------|--------|-------------|
//! | P₀   | tower  | Reference power at unit distance (dBm) |
//! | n    | simulation | Path-loss exponent (environment) |
//! | f    | tower  | Carrier frequency (MHz) |
//!
//! The free-space term is a floor: the log-distance estimate is never allowed
//! to attenuate harder than unobstructed propagation would.

use thiserror::Error;

pub mod environment;
pub mod model;
pub mod tower;

pub use environment::Environment;
pub use model::{
    free_space_path_loss_db, log_distance_dbm, propagation_breakdown, signal_strength, to_bars,
    PropagationBreakdown, MAX_BARS,
};
pub use tower::{
    serving_towers, towers_within, Technology, Tower, TowerParameters, TowerStatus,
    DEFAULT_NEARBY_RADIUS_M, MAX_REFERENCE_POWER_DBM,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagationError {
    #[error("Invalid tower location: {0}")]
    InvalidLocation(#[from] geodesy::GeodesyError),
    #[error("Non-finite {field}: {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("Frequency must be positive: {0} MHz")]
    NonPositiveFrequency(f64),
    #[error("{field} out of range: |{value}| > {limit}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        limit: f64,
    },
}

pub type Result<T> = std::result::Result<T, PropagationError>;

/// Reject NaN and ±∞ for a named RF quantity
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PropagationError::NonFinite { field, value })
    }
}
