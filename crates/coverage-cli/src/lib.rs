//! Coverage Simulation Driver
//!
//! Loads a scenario file, runs the coverage engine over it and writes the
//! results as JSON and, optionally, GeoJSON.
//!
//! # Scenario Format
//!
//! ```text
//! {
//!   "name": "New York metro",                       (optional)
//!   "area": { "northEast": {..}, "southWest": {..} },
//!   "towers": [ { "id", "location", "network", ... } ],
//!   "parameters": { "pathLossExponent", "receiverSensitivity", "environment" },
//!   "gridResolution": 100                            (optional)
//! }
//! ```
//!
//! | Output key | Contents |
//! |------------|----------|
//! | metadata   | run id, scenario, timestamps, effective parameters |
//! | statistics | area-level coverage summary |
//! | inventory  | tower counts per network, technology, status |
//! | points     | per-grid-point records in row-major order |

use thiserror::Error;

pub mod diagnostics;
pub mod loader;
pub mod observer;
pub mod output;

pub use loader::{load_scenario, Scenario};
pub use observer::LogObserver;
pub use output::{to_geojson, CoverageReport, RunMetadata};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid scenario area: {0}")]
    InvalidArea(#[from] geodesy::GeodesyError),
    #[error("Invalid grid resolution: {0}")]
    InvalidGridResolution(u32),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
