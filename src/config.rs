//! Configuration management module
//!
//! Layers environment variables (prefix `ENVMON_`, `__` between sections)
//! over built-in defaults, e.g. `ENVMON_SERVER__PORT=3000` or
//! `ENVMON_CLOCK__TODAY=2024-01-15`.

use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

/// Server configuration settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Defaults applied when a request leaves a generator parameter out
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    pub temp_range: f64,
    pub hum_range: f64,
    pub daily_days: u32,
    pub daily_trend: f64,
    pub hourly_hours: u32,
}

/// Clock settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockSettings {
    /// Pin "today" at startup (`YYYY-MM-DD` or a date-time)
    pub today: Option<String>,
}

/// Marker storage settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// JSON file holding the last-generated-day marker; in-memory when unset
    pub marker_path: Option<PathBuf>,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub clock: ClockSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_environment(Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("ENVMON")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_environment(environment: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("generator.temp_range", 5.0)?
            .set_default("generator.hum_range", 12.0)?
            .set_default("generator.daily_days", 30)?
            .set_default("generator.daily_trend", 0.02)?
            .set_default("generator.hourly_hours", 24)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            temp_range: 5.0,
            hum_range: 12.0,
            daily_days: 30,
            daily_trend: 0.02,
            hourly_hours: 24,
        }
    }
}
