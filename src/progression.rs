//! Long-run progress: improvement rate, projected attempts to the next target,
//! personal-best recency and solve frequency.

use crate::solve::Solve;
use crate::trend::LinearFit;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fewest valid solves an improvement rate is reported for.
pub const IMPROVEMENT_MIN_SOLVES: usize = 10;

/// Milestones in whole seconds, largest first.
pub const TARGET_THRESHOLDS: [u32; 22] = [
    60, 55, 50, 45, 40, 35, 30, 25, 20, 18, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5,
];

const SECONDS_PER_DAY: u64 = 86_400;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Seconds gained (negative) or lost per 100 attempts, from an OLS fit over
/// chronological millisecond times.
pub fn improvement_rate(times_ms: &[f64]) -> Option<f64> {
    if times_ms.len() < IMPROVEMENT_MIN_SOLVES {
        return None;
    }
    LinearFit::fit(times_ms).map(|fit| fit.slope * 100.0 / 1000.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub target_seconds: u32,
    pub seconds_to_improve: f64,
    pub solves_needed: u64,
}

/// Attempts needed to reach the next milestone below `average_seconds` at the
/// current rate. Only defined while improving.
pub fn project(average_seconds: f64, rate: f64) -> Option<Projection> {
    if !(rate < 0.0) {
        return None;
    }
    let target = TARGET_THRESHOLDS
        .iter()
        .copied()
        .find(|&t| f64::from(t) < average_seconds)?;
    let seconds_to_improve = average_seconds - f64::from(target);
    let solves_needed = (seconds_to_improve / rate.abs() * 100.0).ceil() as u64;
    Some(Projection {
        target_seconds: target,
        seconds_to_improve,
        solves_needed,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PbRecency {
    /// Whole days between `now` and the PB, never negative
    pub days_since: u64,
    /// Valid solves recorded strictly after the PB
    pub solves_since: usize,
}

impl PbRecency {
    pub fn measure<Tz: TimeZone>(best: &Solve, valid: &[&Solve], now: &DateTime<Tz>) -> Self {
        let days_since = now.timestamp().abs_diff(best.timestamp) / SECONDS_PER_DAY;
        let solves_since = valid
            .iter()
            .filter(|s| s.timestamp > best.timestamp)
            .count();
        Self {
            days_since,
            solves_since,
        }
    }
}

/// Week label `{year}-W{n}`.
///
/// `n = ceil((days since local Jan 1 + weekday of Jan 1 + 1) / 7)`, counting
/// days fractionally and weekdays from Sunday = 0. Not ISO-8601 numbering.
pub fn week_key<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let local = at.naive_local();
    let year = local.year();

    let wall_clock_ms = i64::from(local.ordinal0()) * MILLIS_PER_DAY as i64
        + i64::from(local.num_seconds_from_midnight()) * 1000
        + i64::from(local.nanosecond() / 1_000_000);
    // real elapsed time; wall clock only when local midnight on Jan 1 does not exist
    let elapsed_ms = NaiveDate::from_yo_opt(year, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|jan1| at.timezone().from_local_datetime(&jan1).earliest())
        .map_or(wall_clock_ms, |start| {
            at.timestamp_millis() - start.timestamp_millis()
        });

    let elapsed_days = elapsed_ms as f64 / MILLIS_PER_DAY;
    let jan1_weekday = (i64::from(local.weekday().num_days_from_sunday())
        - i64::from(local.ordinal0()))
    .rem_euclid(7);
    let week = ((elapsed_days + jan1_weekday as f64 + 1.0) / 7.0).ceil() as i64;
    format!("{year}-W{week}")
}

/// Valid solve counts per local calendar day and per week key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolveFrequency {
    pub daily: BTreeMap<NaiveDate, usize>,
    pub weekly: BTreeMap<String, usize>,
}

impl SolveFrequency {
    pub fn count<Tz: TimeZone>(valid: &[&Solve], tz: &Tz) -> Self {
        let mut frequency = Self::default();
        for at in valid.iter().filter_map(|s| s.recorded_at()) {
            let local = at.with_timezone(tz);
            *frequency.daily.entry(local.date_naive()).or_insert(0) += 1;
            *frequency.weekly.entry(week_key(&local)).or_insert(0) += 1;
        }
        frequency
    }

    pub fn busiest_day(&self) -> Option<(NaiveDate, usize)> {
        // first of the maxima, i.e. the earliest date
        self.daily
            .iter()
            .fold(None, |best: Option<(NaiveDate, usize)>, (&day, &n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((day, n)),
            })
    }
}

/// `Utc` instant from epoch seconds, for callers that build `now` by hand.
pub fn instant(timestamp: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0).single()
}
