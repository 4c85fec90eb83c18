//! Result files: JSON report and GeoJSON points

use crate::Scenario;
use chrono::{DateTime, Utc};
use coverage_engine::{
    CoveragePoint, CoverageResult, Environment, Statistics, TowerInventory,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use uuid::Uuid;

/// Provenance and effective parameters of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub grid_resolution: u32,
    pub total_points: usize,
    pub towers_simulated: usize,
    pub environment: Environment,
    pub path_loss_exponent: f64,
    pub receiver_sensitivity: f64,
    pub elapsed_ms: u64,
}

impl RunMetadata {
    pub fn new(scenario: &Scenario, result: &CoverageResult, elapsed_ms: u64) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scenario: scenario.name.clone(),
            generated_at: Utc::now(),
            grid_resolution: scenario.grid_resolution,
            total_points: result.points.len(),
            towers_simulated: scenario.towers.len(),
            environment: scenario.parameters.environment,
            path_loss_exponent: scenario.parameters.path_loss_exponent,
            receiver_sensitivity: scenario.parameters.receiver_sensitivity,
            elapsed_ms,
        }
    }
}

/// Complete output document
#[derive(Debug, Serialize)]
pub struct CoverageReport<'a> {
    pub metadata: RunMetadata,
    pub statistics: &'a Statistics,
    pub inventory: &'a TowerInventory,
    pub points: &'a [CoveragePoint],
}

impl<'a> CoverageReport<'a> {
    pub fn new(metadata: RunMetadata, scenario: &'a Scenario, result: &'a CoverageResult) -> Self {
        Self {
            metadata,
            statistics: &result.statistics,
            inventory: &scenario.inventory,
            points: &result.points,
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write_geojson(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &to_geojson(self))?;
        Ok(())
    }
}

/// Points as a GeoJSON FeatureCollection
pub fn to_geojson(report: &CoverageReport<'_>) -> serde_json::Value {
    let features: Vec<serde_json::Value> = report
        .points
        .iter()
        .map(|p| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [p.longitude, p.latitude]
                },
                "properties": {
                    "signalStrength": p.signal_strength.is_finite().then_some(p.signal_strength),
                    "signalBars": p.signal_bars,
                    "network": p.network,
                    "servingTower": p.serving_tower,
                    "distance": p.distance
                }
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
        "metadata": report.metadata,
        "statistics": report.statistics
    })
}
