//! Monitor configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below.

use crate::alerts::DEFAULT_CROSSING_THRESHOLDS;
use crate::error::ClearAirError;
use crate::forecast::DEFAULT_DAILY_POINTS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default personal alert level ("alert me when AQI exceeds")
pub const DEFAULT_ALERT_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// AQI levels whose crossing raises an alert, strictly increasing
    pub crossing_thresholds: Vec<u32>,
    /// Personal alert level; `None` disables the personal alert
    pub alert_threshold: Option<u32>,
    /// Directory holding the stored user profile
    pub profile_dir: Option<PathBuf>,
    /// Length of the daily forecast (1-7)
    pub daily_forecast_days: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            crossing_thresholds: DEFAULT_CROSSING_THRESHOLDS.to_vec(),
            alert_threshold: Some(DEFAULT_ALERT_THRESHOLD),
            profile_dir: None,
            daily_forecast_days: DEFAULT_DAILY_POINTS,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ClearAirError> {
        let config: MonitorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, ClearAirError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ClearAirError> {
        if self
            .crossing_thresholds
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(ClearAirError::ConfigError(
                "crossing_thresholds must be strictly increasing".to_string(),
            ));
        }
        if !(1..=7).contains(&self.daily_forecast_days) {
            return Err(ClearAirError::ConfigError(format!(
                "daily_forecast_days must be between 1 and 7, got {}",
                self.daily_forecast_days
            )));
        }
        Ok(())
    }
}
