//! Environment presets for the network-wide path-loss exponent

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Propagation environment of a simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Urban,
    #[default]
    Suburban,
    Rural,
}

impl Environment {
    /// Preset path-loss exponent
    pub fn path_loss_exponent(&self) -> f64 {
        match self {
            Environment::Urban => 3.5,
            Environment::Suburban => 3.0,
            Environment::Rural => 2.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Urban => "urban",
            Environment::Suburban => "suburban",
            Environment::Rural => "rural",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "urban" => Ok(Environment::Urban),
            "suburban" => Ok(Environment::Suburban),
            "rural" => Ok(Environment::Rural),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Environment::Urban.path_loss_exponent(), 3.5);
        assert_eq!(Environment::Suburban.path_loss_exponent(), 3.0);
        assert_eq!(Environment::Rural.path_loss_exponent(), 2.5);
        assert_eq!(Environment::default(), Environment::Suburban);
    }

    #[test]
    fn test_parse_round_trip() {
        for env in [Environment::Urban, Environment::Suburban, Environment::Rural] {
            assert_eq!(env.to_string().parse::<Environment>(), Ok(env));
        }
        assert_eq!("URBAN".parse::<Environment>(), Ok(Environment::Urban));
        assert!("desert".parse::<Environment>().is_err());
    }
}
