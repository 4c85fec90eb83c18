//! Simulation-wide parameters

use crate::{CoverageError, Result};
use propagation::Environment;
use serde::{Deserialize, Serialize};

/// Environment profile shared by every tower in a simulation.
///
/// Kept apart from [`propagation::TowerParameters`]: the environment sets the
/// exponent, the towers set reference power and frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationParameters {
    /// Overrides each tower's own exponent
    pub path_loss_exponent: f64,
    /// dBm floor below which a signal is unusable
    pub receiver_sensitivity: f64,
    pub environment: Environment,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl SimulationParameters {
    pub const DEFAULT_RECEIVER_SENSITIVITY: f64 = -100.0;

    pub fn for_environment(environment: Environment) -> Self {
        Self {
            path_loss_exponent: environment.path_loss_exponent(),
            receiver_sensitivity: Self::DEFAULT_RECEIVER_SENSITIVITY,
            environment,
        }
    }

    pub fn with_receiver_sensitivity(mut self, dbm: f64) -> Self {
        self.receiver_sensitivity = dbm;
        self
    }

    pub fn with_path_loss_exponent(mut self, exponent: f64) -> Self {
        self.path_loss_exponent = exponent;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path_loss_exponent.is_finite() || self.path_loss_exponent <= 0.0 {
            return Err(CoverageError::InvalidParameters(format!(
                "path loss exponent must be finite and positive, got {}",
                self.path_loss_exponent
            )));
        }
        if !self.receiver_sensitivity.is_finite() || self.receiver_sensitivity >= 0.0 {
            return Err(CoverageError::InvalidParameters(format!(
                "receiver sensitivity must be finite and negative, got {} dBm",
                self.receiver_sensitivity
            )));
        }
        Ok(())
    }
}
