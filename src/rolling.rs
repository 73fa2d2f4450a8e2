//! Trimmed "average of N" over consecutive solves.
//!
//! Every function here works on times that have already had DNF/DNS removed,
//! except [`current_average`], which looks at the raw tail of a session.

use crate::solve::TimeValue;
use crate::util::mean;
use serde::Serialize;
use std::iter;

/// The window sizes the engine knows how to trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
pub enum AverageOf {
    #[strum(serialize = "ao5")]
    Five,
    #[strum(serialize = "ao12")]
    Twelve,
    #[strum(serialize = "ao100")]
    Hundred,
}

impl AverageOf {
    pub const ALL: [AverageOf; 3] = [AverageOf::Five, AverageOf::Twelve, AverageOf::Hundred];

    pub fn size(self) -> usize {
        match self {
            AverageOf::Five => 5,
            AverageOf::Twelve => 12,
            AverageOf::Hundred => 100,
        }
    }

    /// Elements dropped from each end of the sorted window.
    pub fn trim(self) -> usize {
        match self {
            AverageOf::Five | AverageOf::Twelve => 1,
            // 5% of the window from each side
            AverageOf::Hundred => self.size() * 5 / 100,
        }
    }
}

/// Mean of `window` after dropping the `trim` smallest and `trim` largest values.
///
/// Duplicates count individually: exactly `trim` values go from each end.
/// `None` when trimming would leave nothing.
pub fn trimmed_mean(window: &[f64], trim: usize) -> Option<f64> {
    if window.len() <= trim * 2 {
        return None;
    }
    let mut sorted = window.to_vec();
    sorted.sort_by(f64::total_cmp);
    mean(&sorted[trim..sorted.len() - trim])
}

/// Trimmed mean of a full window of `kind.size()` values.
pub fn average_of(window: &[f64], kind: AverageOf) -> Option<f64> {
    if window.len() != kind.size() {
        return None;
    }
    trimmed_mean(window, kind.trim())
}

/// One entry per input position: the average of the `N` values ending there,
/// or `None` while fewer than `N` values have been seen.
pub fn trailing(times: &[f64], kind: AverageOf) -> Vec<Option<f64>> {
    let n = kind.size();
    let warmup = times.len().min(n - 1);
    iter::repeat(None)
        .take(warmup)
        .chain(times.windows(n).map(|w| average_of(w, kind)))
        .collect()
}

/// Lowest average over every `N`-sized window of `times`.
pub fn best(times: &[f64], kind: AverageOf) -> Option<f64> {
    times
        .windows(kind.size())
        .filter_map(|w| average_of(w, kind))
        .min_by(f64::total_cmp)
}

/// Average of the last `N` attempts as recorded, DNF/DNS included.
///
/// A failed attempt anywhere in that tail means there is no current average.
pub fn current_average(times: &[TimeValue], kind: AverageOf) -> Option<f64> {
    let n = kind.size();
    if times.len() < n {
        return None;
    }
    let tail = &times[times.len() - n..];
    if !tail.iter().all(|t| t.is_valid()) {
        return None;
    }
    let millis: Vec<f64> = tail.iter().map(|t| t.millis() as f64).collect();
    average_of(&millis, kind)
}
