//! Environmental Monitoring demo backend (envmon)
//!
//! Deterministic, seeded temperature and humidity series for dashboards and
//! history charts when no sensor hardware is connected. The same device and
//! day always produce the same values, so refreshing a chart never jitters.
//!
//! The generator core (`seed`, `series`, `clock`, `regeneration`) has no I/O
//! of its own; `handlers` exposes it over HTTP.

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod profiles;
pub mod regeneration;
pub mod seed;
pub mod series;
pub mod state;
pub mod validation;
