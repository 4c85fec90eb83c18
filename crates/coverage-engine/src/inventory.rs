//! Tower inventory summary

use propagation::{Tower, TowerStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerInventory {
    pub total_towers: usize,
    pub networks: BTreeMap<String, usize>,
    pub technologies: BTreeMap<String, usize>,
    pub active_towers: usize,
    pub maintenance_towers: usize,
    pub inactive_towers: usize,
}

impl TowerInventory {
    pub fn from_towers(towers: &[Tower]) -> Self {
        let mut inventory = Self {
            total_towers: towers.len(),
            ..Default::default()
        };

        for tower in towers {
            *inventory.networks.entry(tower.network.clone()).or_default() += 1;

            for tech in &tower.technology {
                *inventory
                    .technologies
                    .entry(tech.label().to_string())
                    .or_default() += 1;
            }

            match tower.status {
                TowerStatus::Active => inventory.active_towers += 1,
                TowerStatus::Maintenance => inventory.maintenance_towers += 1,
                TowerStatus::Inactive => inventory.inactive_towers += 1,
            }
        }

        inventory
    }
}
