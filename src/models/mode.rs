//! Trading mode

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which brokerage environment a client talks to
///
/// Fixed when a `SessionManager` is built. Production requires an explicit
/// opt-in from the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    /// Vendor simulation environment
    #[default]
    Simulation,
    /// Real trading environment
    Production,
}

impl TradingMode {
    pub fn is_simulation(&self) -> bool {
        matches!(self, Self::Simulation)
    }

    /// Mode implied by the CLI `--production` flag
    pub fn from_production_flag(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Simulation
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulation => write!(f, "SIMULATION"),
            Self::Production => write!(f, "PRODUCTION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_simulation() {
        assert!(TradingMode::default().is_simulation());
        assert_eq!(TradingMode::from_production_flag(false), TradingMode::Simulation);
        assert_eq!(TradingMode::from_production_flag(true), TradingMode::Production);
    }

    #[test]
    fn test_display() {
        assert_eq!(TradingMode::Production.to_string(), "PRODUCTION");
    }
}
