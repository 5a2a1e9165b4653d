//! Deterministic demo series generation
//!
//! Produces plausible temperature/humidity series for a device without any
//! sensor hardware. Every value is a function of (date, hour, device id,
//! parameters), so asking twice for the same day yields the same chart.
//!
//! Composition per point:
//! - Daily: baseline + seasonal wave + seeded noise + accumulated trend
//! - Hourly: baseline + diurnal wave + seeded noise
//! - Humidity runs against the diurnal wave (warm afternoons are drier)

use chrono::{Datelike, Days, Duration, Timelike};
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::debug;

use crate::clock::{format_timestamp, Clock};
use crate::models::{DailySeriesParams, HourlySeriesParams, TimeSeries, TodayReading};
use crate::seed::{pseudo_random, seed_from_date, seed_from_date_hour};

pub const TEMP_MIN: f64 = 0.0;
pub const TEMP_MAX: f64 = 40.0;
pub const HUM_MIN: f64 = 20.0;
pub const HUM_MAX: f64 = 90.0;

/// Amplitudes used for single "current" readings
pub const TODAY_TEMP_RANGE: f64 = 5.0;
pub const TODAY_HUM_RANGE: f64 = 12.0;

/// Seasonal wave cycles per year. Seven keeps short windows visibly wavy.
const SEASONAL_CYCLES_PER_YEAR: f64 = 7.0;

const WEEK: usize = 7;

/// `days` points ending at the clock's today, oldest first
pub fn gen_series(params: &DailySeriesParams, clock: &dyn Clock) -> TimeSeries {
    let today = clock.today();
    let mut series = TimeSeries::with_capacity(params.days as usize);

    for offset in (0..params.days).rev() {
        let Some(date) = today.checked_sub_days(Days::new(offset as u64)) else {
            continue;
        };

        let seed = seed_from_date(date, &params.device_id);
        let seasonal =
            (date.ordinal() as f64 / 365.0 * TAU * SEASONAL_CYCLES_PER_YEAR).sin();
        let elapsed = (params.days - offset) as f64;

        let temp = params.base_temp
            + seasonal * params.temp_range * 0.3
            + (pseudo_random(seed * 1000.0) - 0.5) * params.temp_range
            + params.trend * elapsed;

        let hum = params.base_hum
            + seasonal * params.hum_range * 0.2
            + (pseudo_random(seed * 2000.0) - 0.5) * params.hum_range
            + params.trend * 0.5 * elapsed;

        series.push(
            format!("{}/{}", date.month(), date.day()),
            clamp_temp(temp),
            clamp_hum(hum),
        );
    }

    debug!(
        device_id = %params.device_id,
        days = params.days,
        end = %today,
        "Generated daily series"
    );

    series
}

/// `hours` points ending at the clock's current hour, oldest first
pub fn gen_hourly_series(params: &HourlySeriesParams, clock: &dyn Clock) -> TimeSeries {
    let now = clock.now();
    let mut series = TimeSeries::with_capacity(params.hours as usize);

    for offset in (0..params.hours).rev() {
        let Some(instant) = now.checked_sub_signed(Duration::hours(offset as i64)) else {
            continue;
        };

        let hour = instant.hour();
        let seed = seed_from_date_hour(instant.date(), hour, &params.device_id);
        // Minimum before dawn, maximum mid-afternoon
        let diurnal = (hour as f64 / 24.0 * TAU - FRAC_PI_2).sin();

        let temp = params.base_temp
            + diurnal * params.temp_range * 0.4
            + (pseudo_random(seed * 1000.0) - 0.5) * params.temp_range * 0.4;

        let hum = params.base_hum - diurnal * params.hum_range * 0.3
            + (pseudo_random(seed * 2000.0) - 0.5) * params.hum_range * 0.3;

        series.push(format!("{:02}:00", hour), clamp_temp(temp), clamp_hum(hum));
    }

    debug!(
        device_id = %params.device_id,
        hours = params.hours,
        end = %now,
        "Generated hourly series"
    );

    series
}

/// Averages consecutive 7-point chunks; each chunk keeps its first label.
pub fn aggregate_weekly(series: &TimeSeries) -> TimeSeries {
    let mut weekly = TimeSeries::with_capacity(series.len().div_ceil(WEEK));

    for ((labels, temps), hums) in series
        .labels
        .chunks(WEEK)
        .zip(series.temps.chunks(WEEK))
        .zip(series.hums.chunks(WEEK))
    {
        let count = temps.len() as f64;
        let avg_temp = temps.iter().sum::<f64>() / count;
        let avg_hum = hums.iter().map(|&h| h as f64).sum::<f64>() / count;

        weekly.push(labels[0].clone(), round_tenth(avg_temp), avg_hum.round() as u8);
    }

    weekly
}

/// Trailing `n` points (all of them if the series is shorter)
pub fn last_n_days(series: &TimeSeries, n: usize) -> TimeSeries {
    let start = series.len().saturating_sub(n);
    TimeSeries {
        labels: series.labels[start..].to_vec(),
        temps: series.temps[start..].to_vec(),
        hums: series.hums[start..].to_vec(),
    }
}

/// Today's single point for a device, with the clock's timestamp
pub fn today_data(
    device_id: &str,
    base_temp: f64,
    base_hum: f64,
    clock: &dyn Clock,
) -> TodayReading {
    let series = gen_series(
        &DailySeriesParams {
            days: 1,
            base_temp,
            temp_range: TODAY_TEMP_RANGE,
            base_hum,
            hum_range: TODAY_HUM_RANGE,
            trend: 0.0,
            device_id: device_id.to_string(),
        },
        clock,
    );

    TodayReading {
        temp: series.temps.first().copied().unwrap_or_else(|| clamp_temp(base_temp)),
        hum: series.hums.first().copied().unwrap_or_else(|| clamp_hum(base_hum)),
        timestamp: format_timestamp(clock.now()),
    }
}

/// NaN lands on the lower bound; infinities clamp like any other value
fn clamp_temp(value: f64) -> f64 {
    if value.is_nan() {
        return TEMP_MIN;
    }
    round_tenth(value.clamp(TEMP_MIN, TEMP_MAX))
}

fn clamp_hum(value: f64) -> u8 {
    if value.is_nan() {
        return HUM_MIN as u8;
    }
    value.clamp(HUM_MIN, HUM_MAX).round() as u8
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use proptest::prelude::*;

    fn office_daily(days: u32) -> DailySeriesParams {
        DailySeriesParams {
            days,
            base_temp: 22.0,
            temp_range: 5.0,
            base_hum: 45.0,
            hum_range: 12.0,
            trend: 0.0,
            device_id: "office".to_string(),
        }
    }

    fn office_hourly(hours: u32) -> HourlySeriesParams {
        HourlySeriesParams {
            hours,
            base_temp: 22.0,
            temp_range: 5.0,
            base_hum: 45.0,
            hum_range: 12.0,
            device_id: "office".to_string(),
        }
    }

    fn clock(value: &str) -> FixedClock {
        FixedClock::parse(value).unwrap()
    }

    #[test]
    fn test_three_day_series_for_office() {
        let series = gen_series(&office_daily(3), &clock("2024-01-15"));

        assert_eq!(series.labels, vec!["1/13", "1/14", "1/15"]);
        assert_eq!(series.temps, vec![24.4, 21.8, 22.4]);
        assert_eq!(series.hums, vec![48, 48, 52]);
    }

    #[test]
    fn test_series_is_stable_across_calls() {
        let clock = clock("2024-01-15");
        let first = gen_series(&office_daily(30), &clock);
        let second = gen_series(&office_daily(30), &clock);
        assert_eq!(first, second);
    }

    #[test]
    fn test_day_change_shifts_window() {
        let jan_15 = gen_series(&office_daily(3), &clock("2024-01-15"));
        let jan_16 = gen_series(&office_daily(3), &clock("2024-01-16"));

        assert_eq!(jan_16.labels, vec!["1/14", "1/15", "1/16"]);
        // Overlapping days keep their values
        assert_eq!(jan_15.temps[1..], jan_16.temps[..2]);
        assert_eq!(jan_15.hums[1..], jan_16.hums[..2]);
    }

    #[test]
    fn test_labels_cross_month_and_year() {
        let series = gen_series(&office_daily(3), &clock("2024-01-01"));
        assert_eq!(series.labels, vec!["12/30", "12/31", "1/1"]);
    }

    #[test]
    fn test_devices_get_different_series() {
        let clock = clock("2024-01-15");
        let office = gen_series(&office_daily(7), &clock);
        let outdoor = gen_series(
            &DailySeriesParams {
                device_id: "outdoor".to_string(),
                ..office_daily(7)
            },
            &clock,
        );
        assert_ne!(office.temps, outdoor.temps);
    }

    #[test]
    fn test_trend_accumulates_with_elapsed_days() {
        let clock = clock("2024-01-15");
        let flat = gen_series(&office_daily(10), &clock);
        let rising = gen_series(
            &DailySeriesParams {
                trend: 0.2,
                ..office_daily(10)
            },
            &clock,
        );

        // Oldest point carries one step, newest carries ten
        assert!((rising.temps[0] - flat.temps[0] - 0.2).abs() < 0.11);
        assert!((rising.temps[9] - flat.temps[9] - 2.0).abs() < 0.11);
    }

    #[test]
    fn test_zero_days_is_empty() {
        let series = gen_series(&office_daily(0), &clock("2024-01-15"));
        assert!(series.is_empty());
    }

    #[test]
    fn test_extreme_baselines_are_clamped() {
        let clock = clock("2024-07-01");
        let hot = gen_series(
            &DailySeriesParams {
                base_temp: 80.0,
                base_hum: 150.0,
                ..office_daily(5)
            },
            &clock,
        );
        assert!(hot.temps.iter().all(|&t| t == TEMP_MAX));
        assert!(hot.hums.iter().all(|&h| h == 90));

        let cold = gen_series(
            &DailySeriesParams {
                base_temp: -30.0,
                base_hum: -10.0,
                ..office_daily(5)
            },
            &clock,
        );
        assert!(cold.temps.iter().all(|&t| t == TEMP_MIN));
        assert!(cold.hums.iter().all(|&h| h == 20));
    }

    #[test]
    fn test_non_finite_inputs_stay_in_range() {
        let clock = clock("2024-01-15");

        let nan = gen_series(
            &DailySeriesParams {
                base_temp: f64::NAN,
                base_hum: f64::NAN,
                ..office_daily(3)
            },
            &clock,
        );
        assert_eq!(nan.temps, vec![TEMP_MIN; 3]);
        assert_eq!(nan.hums, vec![20; 3]);

        let nan_trend = gen_series(
            &DailySeriesParams {
                trend: f64::NAN,
                ..office_daily(3)
            },
            &clock,
        );
        assert_eq!(nan_trend.temps, vec![TEMP_MIN; 3]);
        assert_eq!(nan_trend.hums, vec![20; 3]);

        let infinite = gen_series(
            &DailySeriesParams {
                base_temp: f64::INFINITY,
                base_hum: f64::NEG_INFINITY,
                ..office_daily(3)
            },
            &clock,
        );
        assert_eq!(infinite.temps, vec![TEMP_MAX; 3]);
        assert_eq!(infinite.hums, vec![20; 3]);

        let hourly = gen_hourly_series(
            &HourlySeriesParams {
                base_hum: f64::NAN,
                ..office_hourly(4)
            },
            &clock,
        );
        assert!(hourly.hums.iter().all(|&h| h == 20));

        let today = today_data("office", 22.0, f64::NAN, &clock);
        assert_eq!(today.hum, 20);
        assert!(today.temp.is_finite());
    }

    #[test]
    fn test_hourly_series_shape() {
        let series = gen_hourly_series(&office_hourly(24), &clock("2024-01-15T14:30:00"));

        assert_eq!(series.len(), 24);
        assert_eq!(series.labels.first().unwrap(), "15:00");
        assert_eq!(series.labels.last().unwrap(), "14:00");
        assert_eq!(series.labels[9], "00:00");
        assert_ne!(series.temps[0], series.temps[12]);
    }

    #[test]
    fn test_hourly_diurnal_direction() {
        let series = gen_hourly_series(&office_hourly(24), &clock("2024-01-15T23:00:00"));

        // 00:00 sits at index 0, 15:00 at index 15
        assert_eq!(series.labels[0], "00:00");
        assert!(series.temps[15] > series.temps[3]);
        assert!(series.hums[15] < series.hums[3]);
    }

    #[test]
    fn test_hourly_seed_uses_each_points_own_day() {
        let late = gen_hourly_series(&office_hourly(3), &clock("2024-01-16T01:00:00"));
        let earlier = gen_hourly_series(&office_hourly(1), &clock("2024-01-15T23:00:00"));

        assert_eq!(late.labels, vec!["23:00", "00:00", "01:00"]);
        assert_eq!(late.temps[0], earlier.temps[0]);
    }

    #[test]
    fn test_aggregate_weekly_chunks() {
        let series = gen_series(&office_daily(30), &clock("2024-01-15"));
        let weekly = aggregate_weekly(&series);

        assert_eq!(weekly.len(), 5);
        for (k, label) in weekly.labels.iter().enumerate() {
            assert_eq!(label, &series.labels[k * 7]);
        }

        // Last chunk holds only the final two days
        let tail_avg = (series.temps[28] + series.temps[29]) / 2.0;
        assert!((weekly.temps[4] - tail_avg).abs() < 0.051);
    }

    #[test]
    fn test_aggregate_weekly_averages() {
        let mut series = TimeSeries::default();
        for (i, temp) in [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 30.0].iter().enumerate() {
            series.push(format!("1/{}", i + 1), *temp, 40 + i as u8);
        }

        let weekly = aggregate_weekly(&series);
        assert_eq!(weekly.labels, vec!["1/1", "1/8"]);
        assert_eq!(weekly.temps, vec![23.0, 30.0]);
        assert_eq!(weekly.hums, vec![43, 47]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate_weekly(&TimeSeries::default()).is_empty());
    }

    #[test]
    fn test_last_n_days() {
        let series = gen_series(&office_daily(30), &clock("2024-01-15"));

        let week = last_n_days(&series, 7);
        assert_eq!(week.len(), 7);
        assert_eq!(week.labels.last().unwrap(), "1/15");
        assert_eq!(week.temps[..], series.temps[23..]);

        assert_eq!(last_n_days(&series, 100), series);
        assert!(last_n_days(&series, 0).is_empty());
    }

    #[test]
    fn test_today_data_is_idempotent_under_fixed_clock() {
        let clock = clock("2024-01-15");
        let first = today_data("office", 22.0, 45.0, &clock);
        let second = today_data("office", 22.0, 45.0, &clock);

        assert_eq!(first.temp, second.temp);
        assert_eq!(first.hum, second.hum);
        assert_eq!(first.timestamp, "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_today_data_matches_last_series_point() {
        let clock = clock("2024-01-15");
        let reading = today_data("office", 22.0, 45.0, &clock);

        // Same amplitudes; a one-day window has no trend
        assert_eq!(reading.temp, 22.4);
        assert_eq!(reading.hum, 52);
    }

    proptest! {
        #[test]
        fn prop_daily_values_within_bounds(
            days in 1u32..120,
            base_temp in -20.0f64..60.0,
            base_hum in 0.0f64..100.0,
            trend in -1.0f64..1.0,
            day_of_year in 1u32..366,
            device_id in "[A-Za-z0-9-]{0,12}",
        ) {
            let date = chrono::NaiveDate::from_yo_opt(2023, day_of_year).unwrap();
            let clock = FixedClock(date.and_hms_opt(12, 0, 0).unwrap());
            let series = gen_series(
                &DailySeriesParams {
                    days,
                    base_temp,
                    temp_range: 5.0,
                    base_hum,
                    hum_range: 12.0,
                    trend,
                    device_id,
                },
                &clock,
            );

            prop_assert_eq!(series.labels.len(), days as usize);
            prop_assert_eq!(series.temps.len(), days as usize);
            prop_assert_eq!(series.hums.len(), days as usize);
            for &t in &series.temps {
                prop_assert!((TEMP_MIN..=TEMP_MAX).contains(&t));
            }
            for &h in &series.hums {
                prop_assert!((20..=90).contains(&h));
            }
        }

        #[test]
        fn prop_hourly_values_within_bounds(
            hours in 1u32..200,
            base_temp in -20.0f64..60.0,
            base_hum in 0.0f64..100.0,
            minute_of_year in 0i64..525_600,
            device_id in "[A-Za-z0-9-]{0,12}",
        ) {
            let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            let clock = FixedClock(start + Duration::minutes(minute_of_year));
            let series = gen_hourly_series(
                &HourlySeriesParams {
                    hours,
                    base_temp,
                    temp_range: 5.0,
                    base_hum,
                    hum_range: 12.0,
                    device_id,
                },
                &clock,
            );

            prop_assert_eq!(series.len(), hours as usize);
            prop_assert_eq!(series.temps.len(), hours as usize);
            for &t in &series.temps {
                prop_assert!((TEMP_MIN..=TEMP_MAX).contains(&t));
            }
            for &h in &series.hums {
                prop_assert!((20..=90).contains(&h));
            }
        }

        #[test]
        fn prop_weekly_aggregation_conserves_points(len in 0usize..100) {
            let mut series = TimeSeries::default();
            for i in 0..len {
                series.push(format!("p{}", i), 20.0 + (i % 5) as f64, 50);
            }

            let weekly = aggregate_weekly(&series);
            prop_assert_eq!(weekly.len(), len.div_ceil(7));
            for (k, label) in weekly.labels.iter().enumerate() {
                prop_assert_eq!(label, &series.labels[7 * k]);
            }
        }
    }
}
