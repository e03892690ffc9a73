// Engine settings, loaded from a JSON file or the embedded defaults
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::EngineError;
use crate::prediction::ForecastOptions;

pub const CONFIG_ENV_VAR: &str = "FORECAST_CONFIG";

const EMBEDDED_DEFAULTS: &str = include_str!("../../config/default.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub horizon_years: i32,
    pub short_horizon_days: i64,
    pub cache_ttl_seconds: u64,
    pub default_market_cap: f64,
    pub default_coin_name: String,
    pub chart_intervals: usize,
    pub chart_history_days: i64,
    pub quick_window: usize,
    pub min_observations: usize,
    // Fixes the random source for reproducible runs
    pub rng_seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            horizon_years: 30,
            short_horizon_days: 14,
            cache_ttl_seconds: 26 * 60 * 60,
            default_market_cap: 1e9,
            default_coin_name: "Unknown".to_string(),
            chart_intervals: 40,
            chart_history_days: 30,
            quick_window: 50,
            min_observations: 10,
            rng_seed: None,
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Failed to read settings file '{}': {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn embedded() -> Self {
        match Self::from_json_str(EMBEDDED_DEFAULTS) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Embedded settings rejected, using built-in defaults");
                Self::default()
            }
        }
    }

    /// Explicit path first, then `FORECAST_CONFIG`, then the embedded defaults.
    pub fn load(path: Option<&str>) -> Result<Self, EngineError> {
        let from_env = std::env::var(CONFIG_ENV_VAR).ok();
        match path.map(str::to_string).or(from_env) {
            Some(path) => {
                tracing::info!(path = %path, "Loading engine settings");
                Self::from_file(path)
            }
            None => Ok(Self::embedded()),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0..=100).contains(&self.horizon_years) {
            return Err(EngineError::ConfigError(format!(
                "horizonYears must be between 0 and 100, got {}",
                self.horizon_years
            )));
        }
        if self.short_horizon_days <= 0 {
            return Err(EngineError::ConfigError(format!(
                "shortHorizonDays must be positive, got {}",
                self.short_horizon_days
            )));
        }
        if self.chart_history_days <= 0 {
            return Err(EngineError::ConfigError(format!(
                "chartHistoryDays must be positive, got {}",
                self.chart_history_days
            )));
        }
        if self.chart_intervals == 0 {
            return Err(EngineError::ConfigError("chartIntervals must be positive".to_string()));
        }
        if self.quick_window == 0 {
            return Err(EngineError::ConfigError("quickWindow must be positive".to_string()));
        }
        if self.min_observations == 0 {
            return Err(EngineError::ConfigError("minObservations must be positive".to_string()));
        }
        if !(self.default_market_cap.is_finite() && self.default_market_cap > 0.0) {
            return Err(EngineError::ConfigError(format!(
                "defaultMarketCap must be a positive number, got {}",
                self.default_market_cap
            )));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn forecast_options(&self) -> ForecastOptions {
        ForecastOptions {
            horizon_years: self.horizon_years,
            short_horizon_days: self.short_horizon_days,
            chart_intervals: self.chart_intervals,
            chart_history_days: self.chart_history_days,
        }
    }
}
