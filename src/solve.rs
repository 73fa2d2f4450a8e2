use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

use crate::event::EventKind;

/// Duration of a single attempt in milliseconds, or one of the DNF/DNS sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimeValue(i64);

impl TimeValue {
    pub const DNF: TimeValue = TimeValue(-1);
    pub const DNS: TimeValue = TimeValue(-2);

    pub fn from_millis(ms: i64) -> Self {
        TimeValue(ms)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// Only strictly positive times take part in averages.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    pub fn is_dnf(self) -> bool {
        self == Self::DNF
    }

    pub fn is_dns(self) -> bool {
        self == Self::DNS
    }

    pub fn seconds(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&crate::format::format_time(self.0 as f64))
    }
}

/// One timed attempt as recorded by the timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solve {
    /// `"{session}-{position}"`, unique within the owning session
    pub id: String,
    pub time: TimeValue,
    /// Raw penalty code from the export; `time` already reflects a DNF
    pub penalty: i64,
    pub scramble: String,
    pub comment: String,
    /// Unix epoch seconds
    pub timestamp: i64,
    /// `timestamp` as a UTC instant; `None` when it is out of chrono's range
    pub date: Option<DateTime<Utc>>,
}

impl Solve {
    pub fn new(
        id: String,
        time: TimeValue,
        penalty: i64,
        scramble: String,
        comment: String,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            time,
            penalty,
            scramble,
            comment,
            timestamp,
            date: Utc.timestamp_opt(timestamp, 0).single(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.time.is_valid()
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    /// Calendar date of the attempt as seen from `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.recorded_at().map(|at| at.with_timezone(tz).date_naive())
    }
}

/// A practice session: solves kept in export order, never empty once ingested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: u32,
    pub name: String,
    pub scramble_type: String,
    pub solves: Vec<Solve>,
}

impl Session {
    pub fn default_name(id: u32) -> String {
        format!("Session {id}")
    }

    pub fn valid_solves(&self) -> impl Iterator<Item = &Solve> {
        self.solves.iter().filter(|s| s.is_valid())
    }

    /// Valid solves ordered by timestamp, ties kept in export order.
    pub fn chronological_valid(&self) -> Vec<&Solve> {
        chronological(self.valid_solves())
    }

    pub fn event(&self) -> EventKind {
        EventKind::classify(&self.scramble_type, &self.name)
    }
}

/// Stable sort by timestamp ascending.
pub fn chronological<'a, I>(solves: I) -> Vec<&'a Solve>
where
    I: IntoIterator<Item = &'a Solve>,
{
    let mut sorted: Vec<&Solve> = solves.into_iter().collect();
    sorted.sort_by_key(|s| s.timestamp);
    sorted
}

/// Every solve across `sessions`, in session then export order.
pub fn all_solves(sessions: &[Session]) -> impl Iterator<Item = &Solve> {
    sessions.iter().flat_map(|s| s.solves.iter())
}

/// Valid solves in millisecond form, in the order given.
pub fn millis_of(solves: &[&Solve]) -> Vec<f64> {
    solves.iter().map(|s| s.time.millis() as f64).collect()
}
