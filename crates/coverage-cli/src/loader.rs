//! Scenario loading from JSON files

use crate::{LoaderError, Result};
use coverage_engine::{SimulationParameters, TowerInventory, DEFAULT_GRID_RESOLUTION};
use geodesy::GeoArea;
use propagation::{serving_towers, Tower};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Sanitize ID to prevent injection (alphanumeric, dash, underscore only)
fn sanitize_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(128)
        .collect()
}

/// Sanitize name (allow more chars but still limit)
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || " -_.,()&'".contains(*c))
        .take(256)
        .collect()
}

/// Scenario file as written on disk
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScenario {
    name: Option<String>,
    area: GeoArea,
    #[serde(default)]
    towers: Vec<serde_json::Value>,
    #[serde(default)]
    parameters: SimulationParameters,
    grid_resolution: Option<u32>,
}

/// A validated scenario ready to simulate
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub area: GeoArea,
    /// Towers handed to the engine, in file order
    pub towers: Vec<Tower>,
    /// Summary of every valid tower in the file, serving or not
    pub inventory: TowerInventory,
    pub parameters: SimulationParameters,
    pub grid_resolution: u32,
    /// Entries dropped as malformed, invalid or duplicate
    pub skipped: usize,
}

/// Load a scenario file.
///
/// Malformed, invalid or duplicate-id tower entries are logged and skipped;
/// the first entry holding an id wins. Unless
/// `include_inactive` is set only serving (active) towers are kept.
pub fn load_scenario(path: impl AsRef<Path>, include_inactive: bool) -> Result<Scenario> {
    let path = path.as_ref();
    info!("Loading scenario from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: RawScenario = serde_json::from_reader(reader)?;

    raw.area.validate()?;

    let grid_resolution = raw.grid_resolution.unwrap_or(DEFAULT_GRID_RESOLUTION);
    if grid_resolution == 0 {
        return Err(LoaderError::InvalidGridResolution(grid_resolution));
    }

    let mut towers = Vec::with_capacity(raw.towers.len());
    let mut seen_ids = HashSet::new();
    let mut skipped = 0;

    for (i, value) in raw.towers.into_iter().enumerate() {
        let mut tower: Tower = match serde_json::from_value(value) {
            Ok(t) => t,
            Err(e) => {
                warn!(index = i, error = %e, "Skipping malformed tower entry");
                skipped += 1;
                continue;
            }
        };

        tower.id = match sanitize_id(&tower.id) {
            id if id.is_empty() => format!("tower-{}", i),
            id => id,
        };
        tower.name = match sanitize_name(&tower.name) {
            name if name.is_empty() => tower.id.clone(),
            name => name,
        };

        if let Err(e) = tower.validate() {
            warn!(tower = %tower.id, error = %e, "Skipping invalid tower");
            skipped += 1;
            continue;
        }

        // Serving-tower references must stay unambiguous
        if !seen_ids.insert(tower.id.clone()) {
            warn!(index = i, tower = %tower.id, "Skipping tower with duplicate id");
            skipped += 1;
            continue;
        }

        towers.push(tower);
    }

    let inventory = TowerInventory::from_towers(&towers);
    let towers = if include_inactive {
        towers
    } else {
        let serving = serving_towers(&towers);
        debug!(
            "Excluded {} non-serving towers",
            towers.len() - serving.len()
        );
        serving
    };

    let name = raw
        .name
        .as_deref()
        .map(sanitize_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "unnamed".to_string());

    info!(
        "Loaded scenario '{}': {} towers in use, {} in inventory ({} skipped)",
        name,
        towers.len(),
        inventory.total_towers,
        skipped
    );

    Ok(Scenario {
        name,
        area: raw.area,
        towers,
        inventory,
        parameters: raw.parameters,
        grid_resolution,
        skipped,
    })
}
