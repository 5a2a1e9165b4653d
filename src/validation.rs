//! Input validation module
//!
//! Validates request parameters before they reach the generators. The
//! generators themselves clamp rather than fail, so this is where bad input
//! turns into a 400.

use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Request parameter bounds
pub struct RequestConstraints;

impl RequestConstraints {
    pub const SENSOR_ID_MAX_LEN: usize = 64;
}

/// Run derived `validator` rules and flatten failures into one message
pub fn validate_request<T: Validate>(input: &T) -> AppResult<()> {
    if let Err(validation_errors) = input.validate() {
        let message = describe(&validation_errors);
        warn!(errors = %message, "Request validation failed");
        return Err(AppError::ValidationError(message));
    }

    debug!("Request validation passed");
    Ok(())
}

/// Range rules compare false against NaN, so non-finite numbers are turned
/// away here before the derived rules run
pub fn validate_finite(fields: &[(&str, Option<f64>)]) -> AppResult<()> {
    let rejected: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_some_and(|v| !v.is_finite()))
        .map(|(field, _)| *field)
        .collect();

    if rejected.is_empty() {
        return Ok(());
    }

    let message = rejected
        .iter()
        .map(|field| format!("{}: must be a finite number", field))
        .collect::<Vec<_>>()
        .join("; ");
    warn!(errors = %message, "Request validation failed");
    Err(AppError::ValidationError(message))
}

/// Sensor ids are folded into seeds, so they only need to be non-blank and
/// reasonably short
pub fn validate_sensor_id(sensor_id: &str) -> AppResult<()> {
    if sensor_id.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Sensor id must not be blank".to_string(),
        ));
    }

    if sensor_id.chars().count() > RequestConstraints::SENSOR_ID_MAX_LEN {
        return Err(AppError::ValidationError(format!(
            "Sensor id longer than {} characters",
            RequestConstraints::SENSOR_ID_MAX_LEN
        )));
    }

    Ok(())
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let msgs: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, msgs.join(", "))
        })
        .collect();

    messages.sort();
    messages.join("; ")
}
