use crate::event::EventKind;
use crate::progression::{self, PbRecency, Projection, SolveFrequency};
use crate::rolling::{self, AverageOf};
use crate::solve::{self, Session, Solve, TimeValue};
use crate::util::{mean, median};
use chrono::{DateTime, TimeZone};
use itertools::Itertools;
use serde::Serialize;

/// How many of the latest solves a record carries for display.
pub const RECENT_SOLVES: usize = 10;

/// Headline statistics for a scope of one or more sessions.
///
/// Times are milliseconds. Everything is absent (and `total_solves` zero)
/// when the scope has no valid solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub total_solves: usize,
    pub valid_solves: usize,
    pub best_single: Option<Solve>,
    pub worst_single: Option<Solve>,
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub best_ao5: Option<f64>,
    pub best_ao12: Option<f64>,
    pub best_ao100: Option<f64>,
    pub current_ao5: Option<f64>,
    pub current_ao12: Option<f64>,
    pub recent_solves: Vec<Solve>,
    /// Seconds per 100 solves, negative while improving
    pub improvement_rate: Option<f64>,
    pub projection: Option<Projection>,
    pub pb_recency: Option<PbRecency>,
    pub frequency: SolveFrequency,
}

impl StatsRecord {
    /// Compute the record for `sessions` as of `now`. Calendar buckets use
    /// the time zone `now` carries.
    pub fn compute<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> Self {
        let all: Vec<&Solve> = solve::all_solves(sessions).collect();
        let chronological = solve::chronological(all.iter().copied());
        let valid: Vec<&Solve> = chronological
            .iter()
            .copied()
            .filter(|s| s.is_valid())
            .collect();

        if valid.is_empty() {
            return Self::default();
        }

        let by_time: Vec<&Solve> = all
            .iter()
            .copied()
            .filter(|s| s.is_valid())
            .sorted_by_key(|s| s.time)
            .collect();
        let best_single = by_time.first().copied();
        let worst_single = by_time.last().copied();

        let sorted_ms: Vec<f64> = by_time.iter().map(|s| s.time.millis() as f64).collect();
        let average = mean(&sorted_ms);
        let median = median(&sorted_ms);

        let valid_ms = solve::millis_of(&valid);
        let raw_times: Vec<TimeValue> = chronological.iter().map(|s| s.time).collect();

        let improvement_rate = progression::improvement_rate(&valid_ms);
        let projection = match (average, improvement_rate) {
            (Some(avg), Some(rate)) => progression::project(avg / 1000.0, rate),
            _ => None,
        };

        let recent_solves = all
            .iter()
            .sorted_by_key(|s| std::cmp::Reverse(s.timestamp))
            .take(RECENT_SOLVES)
            .map(|s| (*s).clone())
            .collect();

        Self {
            total_solves: all.len(),
            valid_solves: valid.len(),
            best_single: best_single.cloned(),
            worst_single: worst_single.cloned(),
            average,
            median,
            best_ao5: rolling::best(&valid_ms, AverageOf::Five),
            best_ao12: rolling::best(&valid_ms, AverageOf::Twelve),
            best_ao100: rolling::best(&valid_ms, AverageOf::Hundred),
            current_ao5: rolling::current_average(&raw_times, AverageOf::Five),
            current_ao12: rolling::current_average(&raw_times, AverageOf::Twelve),
            recent_solves,
            improvement_rate,
            projection,
            pb_recency: best_single.map(|best| PbRecency::measure(best, &valid, now)),
            frequency: SolveFrequency::count(&valid, &now.timezone()),
        }
    }

    pub fn best_average(&self, kind: AverageOf) -> Option<f64> {
        match kind {
            AverageOf::Five => self.best_ao5,
            AverageOf::Twelve => self.best_ao12,
            AverageOf::Hundred => self.best_ao100,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.valid_solves == 0
    }
}

/// One line of a session listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: u32,
    pub name: String,
    pub event: EventKind,
    pub solve_count: usize,
    pub best: Option<TimeValue>,
}

impl SessionSummary {
    pub fn of(session: &Session) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            event: session.event(),
            solve_count: session.solves.len(),
            best: session.valid_solves().map(|s| s.time).min(),
        }
    }
}
