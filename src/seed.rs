//! Seed derivation for the demo data generator
//!
//! Turns a calendar date (optionally with an hour) and a device identifier
//! into a reproducible seed in `[0, 1)`, and turns a seed into a noise sample.
//!
//! The device id is folded into the date hash with 32-bit wraparound
//! arithmetic. Changing that arithmetic changes every generated value, so
//! series shown to users before and after an upgrade would no longer match.

use chrono::{Datelike, NaiveDate};

/// Linear congruential step applied to the folded hash
const LCG_MULTIPLIER: i64 = 9301;
const LCG_INCREMENT: i64 = 49297;
const LCG_MODULUS: i64 = 233_280;

/// Seed for one device on one calendar day
pub fn seed_from_date(date: NaiveDate, device_id: &str) -> f64 {
    let base = date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64;
    normalize(fold_device_id(base, device_id))
}

/// Seed for one device at one hour of a calendar day
pub fn seed_from_date_hour(date: NaiveDate, hour: u32, device_id: &str) -> f64 {
    let base = date.year() as i64 * 10_000_000
        + date.month() as i64 * 100_000
        + date.day() as i64 * 1000
        + hour as i64;
    normalize(fold_device_id(base, device_id))
}

/// Fractional part of `sin(seed) * 10000`, always in `[0, 1)`
pub fn pseudo_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

/// `hash = (hash << 5) - hash + unit` over UTF-16 code units.
///
/// The shift sees only the low 32 bits of `hash`, while the subtraction uses
/// the full value. That only matters on the first step of the hourly variant,
/// whose base does not fit in 32 bits. Every step truncates back to `i32`.
fn fold_device_id(base: i64, device_id: &str) -> i64 {
    device_id.encode_utf16().fold(base, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        (shifted - hash + unit as i64) as i32 as i64
    })
}

fn normalize(hash: i64) -> f64 {
    let stepped = (hash.abs() * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
    stepped as f64 / LCG_MODULUS as f64
}
