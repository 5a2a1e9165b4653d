//! Data models for generated series and related structures
//!
//! Defines the core data structures used throughout the application.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::profiles::DeviceKind;

/// Chronological series of temperature/humidity pairs
///
/// `labels`, `temps` and `hums` always have the same length and index `i`
/// refers to the same instant in all three.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    /// Celsius, one decimal, within [0, 40]
    pub temps: Vec<f64>,
    /// Percent, within [20, 90]
    pub hums: Vec<u8>,
}

impl TimeSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            temps: Vec::with_capacity(capacity),
            hums: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: String, temp: f64, hum: u8) {
        self.labels.push(label);
        self.temps.push(temp);
        self.hums.push(hum);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Parameters for a day-by-day series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeriesParams {
    pub days: u32,
    pub base_temp: f64,
    /// Temperature noise amplitude
    pub temp_range: f64,
    pub base_hum: f64,
    /// Humidity noise amplitude
    pub hum_range: f64,
    /// Linear drift per elapsed day (humidity drifts at half this rate)
    #[serde(default)]
    pub trend: f64,
    pub device_id: String,
}

/// Parameters for an hour-by-hour series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlySeriesParams {
    pub hours: u32,
    pub base_temp: f64,
    pub temp_range: f64,
    pub base_hum: f64,
    pub hum_range: f64,
    pub device_id: String,
}

/// Single "current" reading for a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayReading {
    pub temp: f64,
    pub hum: u8,
    /// RFC 3339, millisecond precision
    pub timestamp: String,
}

/// Comfort classification shown next to a reading (non-diagnostic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComfortStatus {
    Optimal,
    Warning,
}

/// Reading enriched for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReading {
    pub sensor_id: String,
    #[serde(flatten)]
    pub reading: TodayReading,
    pub status: ComfortStatus,
    pub kind: DeviceKind,
    pub suggestions: Vec<&'static str>,
}

/// Regeneration check response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegenerationStatus {
    pub regenerate: bool,
    pub today: NaiveDate,
}

/// Body of a clock override request; `null` restores wall-clock time
#[derive(Debug, Serialize, Deserialize)]
pub struct ClockOverride {
    pub today: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub today: NaiveDate,
    pub clock_overridden: bool,
}
