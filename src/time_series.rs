use crate::rolling::{self, AverageOf};
use crate::solve::Session;
use crate::trend::{Dispersion, LinearFit};
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

/// One solve on the session chart, with every overlay precomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// 1-based solve number in chronological order
    pub index: usize,
    pub time_seconds: f64,
    pub date: Option<NaiveDate>,
    pub scramble: String,
    pub trend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ao5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ao12: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ao100: Option<f64>,
    pub mean: f64,
    pub std_upper: f64,
    pub std_lower: f64,
}

impl ChartPoint {
    pub fn average(&self, kind: AverageOf) -> Option<f64> {
        match kind {
            AverageOf::Five => self.ao5,
            AverageOf::Twelve => self.ao12,
            AverageOf::Hundred => self.ao100,
        }
    }
}

/// Chronological chart of a single session's valid solves, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub session_id: u32,
    pub points: Vec<ChartPoint>,
    pub regression: LinearFit,
    pub dispersion: Dispersion,
}

impl ChartSeries {
    /// `None` unless the session has at least two valid solves.
    pub fn for_session<Tz: TimeZone>(session: &Session, tz: &Tz) -> Option<Self> {
        let solves = session.chronological_valid();
        let times: Vec<f64> = solves.iter().map(|s| s.time.seconds()).collect();

        let regression = LinearFit::fit(&times)?;
        let dispersion = Dispersion::of(&times)?;
        let ao5 = rolling::trailing(&times, AverageOf::Five);
        let ao12 = rolling::trailing(&times, AverageOf::Twelve);
        let ao100 = rolling::trailing(&times, AverageOf::Hundred);

        let points = solves
            .iter()
            .enumerate()
            .map(|(i, solve)| ChartPoint {
                index: i + 1,
                time_seconds: times[i],
                date: solve.date_in(tz),
                scramble: solve.scramble.clone(),
                trend: regression.at(i as f64),
                ao5: ao5[i],
                ao12: ao12[i],
                ao100: ao100[i],
                mean: dispersion.mean,
                std_upper: dispersion.upper(),
                std_lower: dispersion.lower(),
            })
            .collect();

        Some(Self {
            session_id: session.id,
            points,
            regression,
            dispersion,
        })
    }

    /// Y-axis bounds covering every solve and overlay.
    pub fn bounds(&self) -> (f64, f64) {
        self.points
            .iter()
            .flat_map(|p| {
                [p.time_seconds, p.trend, p.std_upper, p.std_lower]
                    .into_iter()
                    .chain(AverageOf::ALL.into_iter().filter_map(move |k| p.average(k)))
            })
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::fixtures::session;
    use crate::trend::TrendDirection;
    use chrono::Utc;

    #[test]
    fn test_series_needs_two_valid_solves() {
        let s = session(1, &[10_000, -1, -2], 1_700_000_000);
        assert_eq!(ChartSeries::for_session(&s, &Utc), None);

        let all_dnf = session(2, &[-1, -1, -1, -1, -1, -1], 1_700_000_000);
        assert_eq!(ChartSeries::for_session(&all_dnf, &Utc), None);
    }

    #[test]
    fn test_two_point_series() {
        let s = session(1, &[10_000, 9_500], 1_700_000_000);
        let chart = ChartSeries::for_session(&s, &Utc).unwrap();

        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.regression.slope, -0.5);
        assert_eq!(chart.regression.intercept, 10.0);
        assert_eq!(chart.regression.direction(), TrendDirection::Improving);
        assert_eq!(chart.points[0].index, 1);
        assert_eq!(chart.points[0].trend, 10.0);
        assert_eq!(chart.points[1].trend, 9.5);
        assert_eq!(chart.points[1].ao5, None);
        assert_eq!(chart.dispersion.mean, 9.75);
        assert_eq!(chart.points[0].std_upper, 10.0);
        assert_eq!(chart.points[0].std_lower, 9.5);
    }

    #[test]
    fn test_overlays_follow_chronological_valid_order() {
        let times = [10_000, -1, 11_000, 9_000, 12_000, 8_000, 10_000];
        let s = session(1, &times, 1_700_000_000);
        let chart = ChartSeries::for_session(&s, &Utc).unwrap();

        assert_eq!(chart.points.len(), 6);
        assert_eq!(chart.points[3].ao5, None);
        assert_eq!(chart.points[4].ao5, Some(10.0));
        assert_eq!(chart.points[4].average(AverageOf::Five), Some(10.0));
        assert!(chart.points.iter().all(|p| p.ao12.is_none()));
        assert!(chart
            .points
            .iter()
            .all(|p| p.mean == chart.dispersion.mean));
    }

    #[test]
    fn test_bounds_cover_overlays() {
        let s = session(1, &[10_000, 20_000, 15_000], 1_700_000_000);
        let chart = ChartSeries::for_session(&s, &Utc).unwrap();
        let (lo, hi) = chart.bounds();
        assert!(lo <= 10.0);
        assert!(hi >= 20.0);
        assert!(lo <= chart.points[0].std_lower);
    }

    #[test]
    fn test_serializes_camel_case_without_missing_averages() {
        let s = session(1, &[10_000, 9_500], 1_700_000_000);
        let chart = ChartSeries::for_session(&s, &Utc).unwrap();
        let json = serde_json::to_value(&chart).unwrap();
        let point = &json["points"][0];
        assert_eq!(point["timeSeconds"], 10.0);
        assert_eq!(point["date"], "2023-11-14");
        assert!(point.get("ao5").is_none());
        assert!(point.get("stdUpper").is_some());
    }
}
