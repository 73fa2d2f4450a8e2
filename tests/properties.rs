use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use solvestat::{
    format::format_time,
    rolling::{self, AverageOf},
    stats::StatsRecord,
    time_series::ChartSeries,
    Session, Solve, TimeValue,
};

const START: i64 = 1_600_000_000;

fn session_from(times: &[i64]) -> Session {
    Session {
        id: 1,
        name: Session::default_name(1),
        scramble_type: "333".to_string(),
        solves: times
            .iter()
            .enumerate()
            .map(|(i, &ms)| {
                Solve::new(
                    format!("1-{i}"),
                    TimeValue::from_millis(ms),
                    if ms == -1 { -1 } else { 0 },
                    String::new(),
                    String::new(),
                    START + i as i64 * 45,
                )
            })
            .collect(),
    }
}

fn attempt_time() -> impl Strategy<Value = i64> {
    prop_oneof![
        8 => 1_000i64..120_000,
        1 => Just(-1i64),
        1 => Just(-2i64),
    ]
}

proptest! {
    #[test]
    fn best_single_bounds_everything(times in prop::collection::vec(attempt_time(), 1..150)) {
        let now = Utc.timestamp_opt(START + 1_000_000, 0).unwrap();
        let stats = StatsRecord::compute(&[session_from(&times)], &now);

        if let Some(best) = &stats.best_single {
            let best = best.time.millis() as f64;
            let worst = stats.worst_single.as_ref().unwrap().time.millis() as f64;
            prop_assert!(best <= stats.average.unwrap());
            prop_assert!(stats.average.unwrap() <= worst);
            prop_assert!(best <= stats.median.unwrap() && stats.median.unwrap() <= worst);
            for kind in AverageOf::ALL {
                if let Some(avg) = stats.best_average(kind) {
                    prop_assert!(best <= avg && avg <= worst);
                }
            }
        } else {
            prop_assert_eq!(stats.total_solves, 0);
        }
    }

    #[test]
    fn compute_is_idempotent(times in prop::collection::vec(attempt_time(), 0..60)) {
        let sessions = [session_from(&times)];
        let now = Utc.timestamp_opt(START + 1_000_000, 0).unwrap();
        prop_assert_eq!(
            StatsRecord::compute(&sessions, &now),
            StatsRecord::compute(&sessions, &now)
        );
    }

    #[test]
    fn trimmed_mean_stays_inside_window(window in prop::collection::vec(1.0f64..100.0, 3..40)) {
        let avg = rolling::trimmed_mean(&window, 1).unwrap();
        let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(lo - 1e-9 <= avg && avg <= hi + 1e-9);
    }

    #[test]
    fn trailing_series_matches_input_length(times in prop::collection::vec(1.0f64..60.0, 0..120)) {
        for kind in AverageOf::ALL {
            let series = rolling::trailing(&times, kind);
            prop_assert_eq!(series.len(), times.len());
            let defined = series.iter().filter(|v| v.is_some()).count();
            prop_assert_eq!(defined, times.len().saturating_sub(kind.size() - 1));
        }
    }

    #[test]
    fn chart_has_one_point_per_valid_solve(times in prop::collection::vec(attempt_time(), 0..80)) {
        let session = session_from(&times);
        let valid = times.iter().filter(|&&t| t > 0).count();
        match ChartSeries::for_session(&session, &Utc) {
            Some(chart) => {
                prop_assert_eq!(chart.points.len(), valid);
                for (i, p) in chart.points.iter().enumerate() {
                    prop_assert_eq!(p.index, i + 1);
                }
            }
            None => prop_assert!(valid < 2),
        }
    }

    #[test]
    fn format_time_shapes(ms in 1i64..3_600_000) {
        let text = format_time(ms as f64);
        if ms < 60_000 {
            prop_assert!(!text.contains(':'));
        } else {
            prop_assert!(text.contains(':'));
        }
        prop_assert!(text.ends_with(|c: char| c.is_ascii_digit()));
    }
}

#[test]
fn format_time_sentinels() {
    assert_eq!(format_time(-1.0), "DNF");
    assert_eq!(format_time(-2.0), "DNS");
}
