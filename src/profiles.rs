//! Demo devices and their baseline profiles
//!
//! Two demo sensors are seeded for every new account: one indoors, one
//! outdoors. Each device kind gets its own baseline so the dashboard shows
//! distinguishable readings.

use serde::{Deserialize, Serialize};

use crate::models::ComfortStatus;

/// Device as listed on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoDevice {
    pub sensor_id: String,
    pub name: String,
    pub location_name: String,
    pub battery_level: u8,
    pub is_active: bool,
}

/// Where a device is installed; picks the baseline and the advice given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Indoor,
    Outdoor,
}

impl DeviceKind {
    /// Indoor for sensor ids containing `001` or names mentioning "office";
    /// outdoor otherwise.
    pub fn classify(sensor_id: &str, name: &str) -> Self {
        if sensor_id.contains("001") || name.to_lowercase().contains("office") {
            Self::Indoor
        } else {
            Self::Outdoor
        }
    }

    pub fn profile(self) -> DeviceProfile {
        match self {
            Self::Indoor => DeviceProfile::OFFICE,
            Self::Outdoor => DeviceProfile::OUTDOOR,
        }
    }
}

/// Baseline around which a device's readings are generated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub base_temp: f64,
    pub base_hum: f64,
}

impl DeviceProfile {
    pub const OFFICE: Self = Self {
        base_temp: 22.0,
        base_hum: 45.0,
    };

    pub const OUTDOOR: Self = Self {
        base_temp: 18.0,
        base_hum: 55.0,
    };
}

/// Comfort thresholds
pub struct ComfortBounds;

impl ComfortBounds {
    pub const TEMP_MIN: f64 = 18.0;
    pub const TEMP_MAX: f64 = 26.0;
    pub const HUM_MIN: f64 = 30.0;
    pub const HUM_MAX: f64 = 60.0;
}

/// Classify a reading against the comfort band (non-diagnostic)
pub fn comfort_status(temp: f64, hum: f64) -> ComfortStatus {
    let temp_ok = (ComfortBounds::TEMP_MIN..=ComfortBounds::TEMP_MAX).contains(&temp);
    let hum_ok = (ComfortBounds::HUM_MIN..=ComfortBounds::HUM_MAX).contains(&hum);

    if temp_ok && hum_ok {
        ComfortStatus::Optimal
    } else {
        ComfortStatus::Warning
    }
}

const MAX_SUGGESTIONS: usize = 5;

/// Comfort tips for a reading: temperature band, humidity band, then advice
/// specific to where the device sits. At most five, in that order.
pub fn suggestions(temp: f64, hum: f64, kind: DeviceKind) -> Vec<&'static str> {
    let mut tips = Vec::with_capacity(MAX_SUGGESTIONS);

    if temp < 16.0 {
        tips.push("It is quite cold. Wear a thick jacket and keep socks on indoors.");
        tips.push("Consider closing windows and using a heater if you feel uncomfortable.");
    } else if temp < 20.0 {
        tips.push("The temperature is a bit cool. A light sweater or hoodie is recommended.");
    } else if temp <= 26.0 {
        tips.push("The temperature is comfortable for working and studying.");
    } else if temp <= 30.0 {
        tips.push("It feels warm. Drink more water and consider using a fan or AC.");
    } else if temp > 30.0 {
        tips.push("It is very hot. Avoid intense activities and stay hydrated.");
    }

    if hum < 40.0 {
        tips.push("The air is rather dry. You may feel dry throat or skin.");
        tips.push("Consider using a humidifier or placing a cup of water in the room.");
    } else if hum <= 60.0 {
        tips.push("Humidity is in a healthy range. Good for long indoor stays.");
    } else if hum <= 75.0 {
        tips.push("Humidity is a bit high. Open the window for 5-10 minutes if possible.");
    } else if hum > 75.0 {
        tips.push("Humidity is very high. Watch out for mold and condensation.");
    }

    match kind {
        DeviceKind::Indoor => {
            tips.push("A tidy and well-ventilated room can further improve comfort.");
        }
        DeviceKind::Outdoor if temp < 10.0 => {
            tips.push("For outdoor activities, wear a hat and gloves if you stay outside for long.");
        }
        DeviceKind::Outdoor if temp > 28.0 => {
            tips.push("Avoid staying under direct sunlight for too long around noon.");
        }
        DeviceKind::Outdoor => {}
    }

    tips.truncate(MAX_SUGGESTIONS);
    tips
}

/// Demo catalogue
pub fn demo_devices() -> Vec<DemoDevice> {
    vec![
        DemoDevice {
            sensor_id: "DEMO-001".to_string(),
            name: "Office Sensor".to_string(),
            location_name: "XJTLU-TC-C4019".to_string(),
            battery_level: 85,
            is_active: true,
        },
        DemoDevice {
            sensor_id: "DEMO-002".to_string(),
            name: "Outdoor Sensor".to_string(),
            location_name: "Campus Entrance".to_string(),
            battery_level: 92,
            is_active: true,
        },
    ]
}

/// Look up a demo device by sensor id (case-insensitive)
pub fn find_demo_device(sensor_id: &str) -> Option<DemoDevice> {
    demo_devices()
        .into_iter()
        .find(|d| d.sensor_id.eq_ignore_ascii_case(sensor_id))
}
