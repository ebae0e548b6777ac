//! Forecast tuning knobs.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HORIZON, MAX_HORIZON};
use crate::error::ForecastError;

/// Settings shared by every forecast an engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Encounters to look ahead along each path.
    #[serde(default = "ForecastConfig::default_horizon")]
    pub horizon: usize,
    /// Stop a branch at the first level-up instead of expanding past it.
    #[serde(default)]
    pub halt_on_level_up: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: Self::default_horizon(),
            halt_on_level_up: false,
        }
    }
}

impl ForecastConfig {
    #[must_use]
    pub const fn default_horizon() -> usize {
        DEFAULT_HORIZON
    }

    #[must_use]
    pub const fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidInput`] when the JSON does not parse
    /// and [`ForecastError::InvalidConfig`] when a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ForecastError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ForecastError::invalid("config", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate bounds before any simulation work.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::InvalidConfig`] when the horizon is zero or
    /// exceeds the supported lookahead.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(1..=MAX_HORIZON).contains(&self.horizon) {
            return Err(ForecastError::InvalidConfig {
                field: "horizon",
                min: 1,
                max: MAX_HORIZON,
                value: self.horizon,
            });
        }
        Ok(())
    }
}
