//! Coverage Simulation Engine
//!
//! Samples a bounding area on a regular grid, selects the best-serving tower
//! at every grid point and reduces the per-point records into area-level
//! coverage statistics.
//!
//! # Pipeline
//!
//! ```text
//! GeoArea ──► Grid ((r+1)² points, row-major)
//!               │  chunked, evaluated on rayon workers
//!               ▼
//!   best server per point (towers scanned in input order, first max wins)
//!               │
//!               ├──► CoveragePoint sequence (canonical order)
//!               └──► CoverageTally (mergeable) ──► Statistics
//! ```
//!
//! # Statistics
//!
//! | Field | Definition |
//! |-------|------------|
//! | overallCoverage | points with bars > 0, % |
//! | strongCoverage  | points with bars ≥ 4, % |
//! | weakCoverage    | points with bars 1-2, % |
//! | noCoverage      | 100 − overallCoverage |
//! | averageSignalStrength | mean dBm over finite samples (null without towers) |
//! | coverageArea    | bounding rectangle km² × covered fraction |

use geodesy::{GeoArea, GeodesyError};
use propagation::{PropagationError, Tower};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod engine;
pub mod grid;
pub mod inventory;
pub mod params;
pub mod progress;
pub mod server;
pub mod tally;

pub use engine::{CoverageEngine, EngineConfig};
pub use grid::Grid;
pub use inventory::TowerInventory;
pub use params::SimulationParameters;
pub use progress::{ChannelObserver, ProgressEvent, ProgressObserver, ProgressPhase};
pub use server::{evaluate_point, ExponentPolicy};
pub use tally::CoverageTally;

pub use geodesy::GeoPoint;
pub use propagation::{Environment, Technology, TowerParameters, TowerStatus};

/// Default number of subdivisions per axis
pub const DEFAULT_GRID_RESOLUTION: u32 = 100;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Invalid area: {0}")]
    InvalidArea(#[from] GeodesyError),
    #[error("Invalid grid resolution: {0} (must be a positive integer)")]
    InvalidGridResolution(u32),
    #[error("Invalid tower {id}: {source}")]
    InvalidTower {
        id: String,
        #[source]
        source: PropagationError,
    },
    #[error("Invalid simulation parameters: {0}")]
    InvalidParameters(String),
    #[error("Worker pool unavailable: {0}")]
    ThreadPool(String),
    #[error("Simulation cancelled after {processed} of {total} points")]
    Cancelled { processed: usize, total: usize },
    #[error("Non-finite signal at ({latitude}, {longitude})")]
    ArithmeticFault { latitude: f64, longitude: f64 },
    #[error("Signal sum overflowed while merging partial results")]
    SignalSumOverflow,
}

pub type Result<T> = std::result::Result<T, CoverageError>;

/// Estimate at a single grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoveragePoint {
    pub latitude: f64,
    pub longitude: f64,
    /// dBm; −∞ (serialized as null) when no tower serves the point
    #[serde(with = "signal_serde")]
    pub signal_strength: f64,
    pub signal_bars: u8,
    pub network: Option<String>,
    /// Id of the winning tower
    pub serving_tower: Option<String>,
    /// Meters to the winning tower
    pub distance: f64,
}

/// Area-level coverage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub overall_coverage: f64,
    pub strong_coverage: f64,
    pub weak_coverage: f64,
    pub no_coverage: f64,
    pub average_signal_strength: Option<f64>,
    /// km²
    pub coverage_area: f64,
}

/// Points in row-major grid order plus their summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    #[serde(rename = "coverageData")]
    pub points: Vec<CoveragePoint>,
    pub statistics: Statistics,
}

/// Non-finite dBm values travel as JSON `null`
mod signal_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dbm: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if dbm.is_finite() {
            serializer.serialize_f64(*dbm)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
    }
}

/// Run a simulation with the default engine configuration
pub fn generate_coverage_data(
    area: &GeoArea,
    towers: &[Tower],
    params: &SimulationParameters,
    grid_resolution: u32,
    observer: Option<&dyn ProgressObserver>,
) -> Result<CoverageResult> {
    CoverageEngine::default().run(area, towers, params, grid_resolution, observer)
}
