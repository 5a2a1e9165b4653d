//! Application state management
//!
//! Central state container for the service: the clock every generator call
//! reads "now" from, the last-generated-day marker store, and the generator
//! defaults taken from configuration.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::clock::{ClockError, OverridableClock};
use crate::config::GeneratorSettings;
use crate::regeneration::{self, MarkerStore, MemoryMarkerStore};

/// Central application state
pub struct AppState {
    /// Source of "now" for every generator call
    clock: OverridableClock,
    /// Persisted last-generated-day marker
    markers: Box<dyn MarkerStore>,
    /// Defaults for parameters a request leaves out
    defaults: GeneratorSettings,
    /// Application start time
    start_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state with an in-memory marker store
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryMarkerStore::new()), GeneratorSettings::default())
    }

    pub fn with_store(markers: Box<dyn MarkerStore>, defaults: GeneratorSettings) -> Self {
        info!(?defaults, "Initializing application state");
        Self {
            clock: OverridableClock::new(),
            markers,
            defaults,
            start_time: Utc::now(),
        }
    }

    pub fn clock(&self) -> &OverridableClock {
        &self.clock
    }

    pub fn defaults(&self) -> &GeneratorSettings {
        &self.defaults
    }

    /// Pin or release "today" for all subsequent generation
    pub fn override_today(&mut self, value: Option<&str>) -> Result<(), ClockError> {
        self.clock.override_today(value)?;
        info!(
            value = value.unwrap_or("wall-clock"),
            "Clock override updated"
        );
        Ok(())
    }

    /// Whether the day rolled over since the last check; records today
    pub fn needs_regeneration(&mut self) -> bool {
        regeneration::needs_regeneration(&self.clock, &mut *self.markers)
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
