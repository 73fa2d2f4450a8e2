// End-to-end checks through the public API: a csTimer export is ingested,
// then stats and chart series are computed from the resulting sessions.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use serde_json::json;
use solvestat::{
    event::EventKind,
    ingest::{self, Dataset},
    report::Report,
    rolling::AverageOf,
    stats::StatsRecord,
    time_series::ChartSeries,
    IngestError, TimeValue,
};

const START: i64 = 1_700_000_000;

fn attempt(penalty: i64, ms: i64, n: i64, ts: i64) -> serde_json::Value {
    json!([[penalty, ms], format!("R U F #{n}"), "", ts])
}

fn export() -> String {
    let one = [
        12_000, 11_000, 13_000, 10_000, 9_000, 15_000, 11_500, 10_500, 9_500, 12_500, 11_000,
        10_000,
    ];
    let mut session1: Vec<_> = one
        .iter()
        .enumerate()
        .map(|(i, &ms)| attempt(0, ms, i as i64, START + i as i64 * 60))
        .collect();
    // sixth attempt is a DNF; the stored time must be ignored
    session1[5] = attempt(-1, 15_000, 5, START + 300);

    let session2: Vec<_> = [4_000, 3_500, 3_000, 5_000, 4_500]
        .iter()
        .enumerate()
        .map(|(i, &ms)| attempt(0, ms, i as i64, START + 100_000 + i as i64 * 30))
        .collect();

    let meta = json!({
        "1": {"name": 1, "opt": {}},
        "2": {"name": "2x2 practice", "opt": {"scrType": "222so"}}
    });

    json!({
        "session1": session1,
        "session2": session2,
        "session3": [],
        "session0": [[[0, 1], "", "", START]],
        "sessionX": [[[0, 1], "", "", START]],
        "properties": {"sessionData": meta.to_string()}
    })
    .to_string()
}

fn sessions() -> Vec<solvestat::Session> {
    ingest::parse_str(&export()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn ingest_keeps_numbered_non_empty_sessions() {
    let sessions = sessions();
    let ids: Vec<u32> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);

    assert_eq!(sessions[0].name, "Session 1");
    assert_eq!(sessions[0].event(), EventKind::ThreeByThree);
    assert_eq!(sessions[1].name, "2x2 practice");
    assert_eq!(sessions[1].event(), EventKind::TwoByTwo);

    assert_eq!(sessions[0].solves[5].time, TimeValue::DNF);
    assert_eq!(sessions[0].solves[5].id, "1-5");
}

#[test]
fn ingest_rejects_non_object_export() {
    assert_matches!(ingest::parse_str("[1, 2]"), Err(IngestError::NotAnObject));
    assert_matches!(ingest::parse_str("{"), Err(IngestError::Json(_)));
}

#[test]
fn reload_keeps_previous_sessions_on_error() {
    let mut data = Dataset::new(sessions());
    assert!(data.reload("not json").is_err());
    assert_eq!(data.sessions().len(), 2);
    assert!(data.session(2).is_some());
}

#[test]
fn stats_across_every_session() {
    let now = Utc.timestamp_opt(START + 200_000, 0).unwrap();
    let stats = StatsRecord::compute(&sessions(), &now);

    assert_eq!(stats.total_solves, 17);
    assert_eq!(stats.valid_solves, 16);
    assert_eq!(stats.best_single.as_ref().unwrap().id, "2-2");
    assert_eq!(stats.worst_single.as_ref().unwrap().time.millis(), 13_000);

    let average = stats.average.unwrap();
    let median = stats.median.unwrap();
    assert!(3_000.0 <= average && average <= 13_000.0);
    assert!(3_000.0 <= median && median <= 13_000.0);

    // newest first, so the 2x2 session leads
    assert_eq!(stats.recent_solves.len(), 10);
    assert_eq!(stats.recent_solves[0].id, "2-4");
}

#[test]
fn stats_are_idempotent() {
    let sessions = sessions();
    let now = Utc.timestamp_opt(START + 200_000, 0).unwrap();
    assert_eq!(
        StatsRecord::compute(&sessions, &now),
        StatsRecord::compute(&sessions, &now)
    );
}

#[test]
fn best_averages_skip_dnf_attempts() {
    let sessions = sessions();
    let now = Utc.timestamp_opt(START + 200_000, 0).unwrap();
    let stats = StatsRecord::compute(&sessions[..1], &now);

    assert_eq!(stats.valid_solves, 11);
    assert!(stats.best_ao5.is_some());
    assert!(stats.best_ao12.is_none());
    assert!(stats.best_ao100.is_none());
    // the tail of the session holds no DNF
    assert!(stats.current_ao5.is_some());
    assert!(stats.current_ao12.is_none());
    assert!(stats.improvement_rate.is_some());
}

#[test]
fn chart_for_session() {
    let sessions = sessions();
    let chart = ChartSeries::for_session(&sessions[0], &Utc).unwrap();

    assert_eq!(chart.session_id, 1);
    assert_eq!(chart.points.len(), 11);
    assert_eq!(chart.points[0].index, 1);
    assert_eq!(chart.points[10].index, 11);

    assert!(chart.points[..4].iter().all(|p| p.ao5.is_none()));
    // 12, 11, 13, 10, 9 with the extremes dropped
    assert!(close(chart.points[4].ao5.unwrap(), 11.0));
    assert!(chart.points.iter().all(|p| p.ao12.is_none()));
    assert!(chart
        .points
        .iter()
        .all(|p| close(p.trend, chart.regression.at((p.index - 1) as f64))));

    let (lo, hi) = chart.bounds();
    assert!(lo <= 9.0 && hi >= 13.0);
}

#[test]
fn report_for_unknown_session() {
    let now = Utc.timestamp_opt(START + 200_000, 0).unwrap();
    assert!(Report::build(&sessions(), Some(9), &now, false).is_none());
}

#[test]
fn report_for_single_session_carries_chart() {
    let now = Utc.timestamp_opt(START + 200_000, 0).unwrap();
    let report = Report::build(&sessions(), Some(2), &now, true).unwrap();

    assert_eq!(report.scope, "2x2 practice");
    assert_eq!(report.stats.total_solves, 5);
    assert_eq!(report.sessions.len(), 2);
    assert_eq!(report.chart.as_ref().map(|c| c.session_id), Some(2));
    assert_eq!(report.stats.best_average(AverageOf::Five), Some(4_000.0));
}
