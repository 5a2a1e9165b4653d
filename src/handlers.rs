//! HTTP request handlers
//!
//! REST API serving generated series to dashboard and history clients.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::clock::{format_timestamp, Clock};
use crate::error::{AppError, AppResult};
use crate::models::{
    ClockOverride, DailySeriesParams, DeviceReading, HealthCheck, HourlySeriesParams,
    RegenerationStatus, TodayReading,
};
use crate::profiles::{
    comfort_status, demo_devices, find_demo_device, suggestions, DemoDevice, DeviceKind,
    DeviceProfile,
};
use crate::series::{aggregate_weekly, gen_hourly_series, gen_series, last_n_days, today_data};
use crate::state::AppState;
use crate::validation::{validate_finite, validate_request, validate_sensor_id};

type SharedState = web::Data<Arc<RwLock<AppState>>>;

/// Configure all application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            // Health check
            .route("/health", web::get().to(health_check))
            // Dashboard
            .route("/devices", web::get().to(list_devices))
            .route("/devices/{sensor_id}/today", web::get().to(get_today))
            // History
            .route(
                "/devices/{sensor_id}/series/daily",
                web::get().to(get_daily_series),
            )
            .route(
                "/devices/{sensor_id}/series/hourly",
                web::get().to(get_hourly_series),
            )
            // Day tracking
            .route("/regeneration", web::get().to(check_regeneration))
            .route("/clock", web::get().to(get_clock))
            .route("/clock/override", web::put().to(override_clock)),
    )
    .default_service(web::route().to(not_found));
}

/// Health check endpoint
///
/// GET /api/health
pub async fn health_check(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;

    let health = HealthCheck {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        today: state.clock().today(),
        clock_overridden: state.clock().is_overridden(),
    };

    Ok(HttpResponse::Ok().json(health))
}

#[derive(Serialize)]
struct DashboardDevice {
    #[serde(flatten)]
    device: DemoDevice,
    latest: DeviceReading,
}

/// Demo devices with today's reading
///
/// GET /api/devices
pub async fn list_devices(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;

    let devices: Vec<DashboardDevice> = demo_devices()
        .into_iter()
        .map(|device| {
            let kind = DeviceKind::classify(&device.sensor_id, &device.name);
            let latest = device_reading(&device.sensor_id, kind, kind.profile(), state.clock());
            DashboardDevice { device, latest }
        })
        .collect();

    Ok(HttpResponse::Ok().json(devices))
}

/// Baseline selection shared by all per-device endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct TodayQuery {
    pub name: Option<String>,
    #[validate(range(min = -20.0, max = 60.0))]
    pub base_temp: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub base_hum: Option<f64>,
}

/// Today's reading for one device
///
/// GET /api/devices/{sensor_id}/today?name=&base_temp=&base_hum=
pub async fn get_today(
    state: SharedState,
    path: web::Path<String>,
    query: web::Query<TodayQuery>,
) -> Result<HttpResponse, AppError> {
    let sensor_id = path.into_inner();
    validate_sensor_id(&sensor_id)?;
    validate_finite(&[("base_temp", query.base_temp), ("base_hum", query.base_hum)])?;
    validate_request(&*query)?;

    let (kind, profile) =
        resolve_profile(&sensor_id, query.name.as_deref(), query.base_temp, query.base_hum);

    let state = state.read().await;
    Ok(HttpResponse::Ok().json(device_reading(&sensor_id, kind, profile, state.clock())))
}

/// Query parameters for a daily series
#[derive(Debug, Deserialize, Validate)]
pub struct DailyQuery {
    pub name: Option<String>,
    #[validate(range(min = -20.0, max = 60.0))]
    pub base_temp: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub base_hum: Option<f64>,
    #[validate(range(min = 1, max = 366))]
    pub days: Option<u32>,
    #[validate(range(min = -1.0, max = 1.0))]
    pub trend: Option<f64>,
    /// Keep only the trailing N days
    #[validate(range(min = 1, max = 366))]
    pub last: Option<u32>,
    /// Average into 7-day buckets
    pub weekly: Option<bool>,
}

/// Daily series
///
/// GET /api/devices/{sensor_id}/series/daily?days=30&trend=0.02&last=7&weekly=false
pub async fn get_daily_series(
    state: SharedState,
    path: web::Path<String>,
    query: web::Query<DailyQuery>,
) -> Result<HttpResponse, AppError> {
    let sensor_id = path.into_inner();
    validate_sensor_id(&sensor_id)?;
    validate_finite(&[
        ("base_temp", query.base_temp),
        ("base_hum", query.base_hum),
        ("trend", query.trend),
    ])?;
    validate_request(&*query)?;

    let (_, profile) =
        resolve_profile(&sensor_id, query.name.as_deref(), query.base_temp, query.base_hum);

    let state = state.read().await;
    let defaults = state.defaults();
    let params = DailySeriesParams {
        days: query.days.unwrap_or(defaults.daily_days),
        base_temp: profile.base_temp,
        temp_range: defaults.temp_range,
        base_hum: profile.base_hum,
        hum_range: defaults.hum_range,
        trend: query.trend.unwrap_or(defaults.daily_trend),
        device_id: sensor_id,
    };

    let mut series = gen_series(&params, state.clock());
    if let Some(n) = query.last {
        series = last_n_days(&series, n as usize);
    }
    if query.weekly.unwrap_or(false) {
        series = aggregate_weekly(&series);
    }

    debug!(
        device_id = %params.device_id,
        points = series.len(),
        "Serving daily series"
    );

    Ok(HttpResponse::Ok().json(series))
}

/// Query parameters for an hourly series
#[derive(Debug, Deserialize, Validate)]
pub struct HourlyQuery {
    pub name: Option<String>,
    #[validate(range(min = -20.0, max = 60.0))]
    pub base_temp: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub base_hum: Option<f64>,
    #[validate(range(min = 1, max = 168))]
    pub hours: Option<u32>,
}

/// Hourly series
///
/// GET /api/devices/{sensor_id}/series/hourly?hours=24
pub async fn get_hourly_series(
    state: SharedState,
    path: web::Path<String>,
    query: web::Query<HourlyQuery>,
) -> Result<HttpResponse, AppError> {
    let sensor_id = path.into_inner();
    validate_sensor_id(&sensor_id)?;
    validate_finite(&[("base_temp", query.base_temp), ("base_hum", query.base_hum)])?;
    validate_request(&*query)?;

    let (_, profile) =
        resolve_profile(&sensor_id, query.name.as_deref(), query.base_temp, query.base_hum);

    let state = state.read().await;
    let defaults = state.defaults();
    let params = HourlySeriesParams {
        hours: query.hours.unwrap_or(defaults.hourly_hours),
        base_temp: profile.base_temp,
        temp_range: defaults.temp_range,
        base_hum: profile.base_hum,
        hum_range: defaults.hum_range,
        device_id: sensor_id,
    };

    Ok(HttpResponse::Ok().json(gen_hourly_series(&params, state.clock())))
}

/// Whether the day rolled over since the last check
///
/// GET /api/regeneration
pub async fn check_regeneration(state: SharedState, req: HttpRequest) -> Result<HttpResponse, AppError> {
    let correlation_id = extract_correlation_id(&req);

    let mut state = state.write().await;
    let regenerate = state.needs_regeneration();
    let today = state.clock().today();

    info!(
        correlation_id = %correlation_id,
        regenerate,
        today = %today,
        "Regeneration check"
    );

    Ok(HttpResponse::Ok().json(RegenerationStatus { regenerate, today }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockState {
    pub now: String,
    pub today: NaiveDate,
    pub overridden: bool,
}

/// Effective clock
///
/// GET /api/clock
pub async fn get_clock(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;
    Ok(HttpResponse::Ok().json(clock_state(&state)))
}

/// Pin or release "today"
///
/// PUT /api/clock/override  {"today": "2024-01-15"} | {"today": null}
pub async fn override_clock(
    state: SharedState,
    body: web::Json<ClockOverride>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let correlation_id = extract_correlation_id(&req);

    let mut state = state.write().await;
    state.override_today(body.today.as_deref())?;

    info!(
        correlation_id = %correlation_id,
        today = ?body.today,
        "Clock override applied"
    );

    Ok(HttpResponse::Ok().json(clock_state(&state)))
}

async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("No route for {}", req.path())))
}

fn clock_state(state: &AppState) -> ClockState {
    let clock = state.clock();
    ClockState {
        now: format_timestamp(clock.now()),
        today: clock.today(),
        overridden: clock.is_overridden(),
    }
}

/// Demo catalogue name if known, then explicit baselines win over the profile
fn resolve_profile(
    sensor_id: &str,
    name: Option<&str>,
    base_temp: Option<f64>,
    base_hum: Option<f64>,
) -> (DeviceKind, DeviceProfile) {
    let catalogue_name = find_demo_device(sensor_id).map(|d| d.name);
    let name = name.or(catalogue_name.as_deref()).unwrap_or_default();
    let kind = DeviceKind::classify(sensor_id, name);
    let profile = kind.profile();

    let profile = DeviceProfile {
        base_temp: base_temp.unwrap_or(profile.base_temp),
        base_hum: base_hum.unwrap_or(profile.base_hum),
    };
    (kind, profile)
}

fn device_reading(
    sensor_id: &str,
    kind: DeviceKind,
    profile: DeviceProfile,
    clock: &dyn Clock,
) -> DeviceReading {
    let reading: TodayReading = today_data(sensor_id, profile.base_temp, profile.base_hum, clock);
    let hum = reading.hum as f64;

    DeviceReading {
        sensor_id: sensor_id.to_string(),
        status: comfort_status(reading.temp, hum),
        suggestions: suggestions(reading.temp, hum, kind),
        kind,
        reading,
    }
}

/// Extract or generate correlation ID from request headers
fn extract_correlation_id(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Correlation-ID")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
