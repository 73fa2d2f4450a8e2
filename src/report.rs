//! Rendering of computed statistics for the command line.

use crate::config::Config;
use crate::format::{format_number, format_optional_time, format_time};
use crate::rolling::AverageOf;
use crate::solve::Session;
use crate::stats::{SessionSummary, StatsRecord};
use crate::time_series::ChartSeries;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;
use time_humanize::{Accuracy, HumanTime, Tense};

const ALL_SESSIONS: &str = "All sessions";

/// Everything one invocation prints, in a serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub scope: String,
    /// Unix seconds the record was computed at
    pub generated_at: i64,
    pub stats: StatsRecord,
    pub sessions: Vec<SessionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartSeries>,
}

impl Report {
    /// Stats for the selected session, or for every session when `selected`
    /// is `None`. Returns `None` if the selected session does not exist.
    pub fn build<Tz: TimeZone>(
        sessions: &[Session],
        selected: Option<u32>,
        now: &DateTime<Tz>,
        with_chart: bool,
    ) -> Option<Self> {
        let (scope, scoped, chart) = match selected {
            Some(id) => {
                let session = sessions.iter().find(|s| s.id == id)?;
                let chart = if with_chart {
                    ChartSeries::for_session(session, &now.timezone())
                } else {
                    None
                };
                (session.name.clone(), std::slice::from_ref(session), chart)
            }
            None => (ALL_SESSIONS.to_string(), sessions, None),
        };

        Some(Self {
            scope,
            generated_at: now.timestamp(),
            stats: StatsRecord::compute(scoped, now),
            sessions: sessions.iter().map(SessionSummary::of).collect(),
            chart,
        })
    }
}

fn pb_age(seconds: u64) -> String {
    let elapsed = Duration::from_secs(seconds);
    HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past)
}

fn preview(scramble: &str, width: usize) -> String {
    if scramble.chars().count() <= width {
        scramble.to_string()
    } else {
        let head: String = scramble.chars().take(width).collect();
        format!("{head}...")
    }
}

pub fn write_text<W: Write>(report: &Report, cfg: &Config, out: &mut W) -> io::Result<()> {
    let stats = &report.stats;
    writeln!(
        out,
        "{} - {} solves ({} valid)",
        report.scope, stats.total_solves, stats.valid_solves
    )?;
    writeln!(out)?;

    if stats.is_empty() {
        writeln!(out, "  no valid solves yet")?;
    } else {
        write_headline(report, cfg, out)?;
    }

    writeln!(out)?;
    writeln!(out, "Sessions")?;
    for s in &report.sessions {
        writeln!(
            out,
            "  {:>3}  {:<24} {:<16} {:>6} solves  PB {}",
            s.id,
            s.name,
            s.event.to_string(),
            s.solve_count,
            s.best.map(|t| t.to_string()).unwrap_or_else(|| "—".to_string())
        )?;
    }

    if !stats.recent_solves.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent solves")?;
        let best = stats.best_single.as_ref().map(|s| s.time);
        for (i, solve) in stats.recent_solves.iter().take(cfg.recent_rows).enumerate() {
            let marker = if Some(solve.time) == best { "*" } else { " " };
            let date = solve
                .recorded_at()
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            writeln!(
                out,
                "  {:>2}{} {:>9}  {:<width$}  {}",
                i + 1,
                marker,
                solve.time,
                preview(&solve.scramble, cfg.scramble_preview),
                date,
                width = cfg.scramble_preview + 3
            )?;
        }
    }

    if let Some(chart) = &report.chart {
        writeln!(out)?;
        write_chart_summary(chart, out)?;
    }
    Ok(())
}

fn write_headline<W: Write>(report: &Report, cfg: &Config, out: &mut W) -> io::Result<()> {
    let stats = &report.stats;

    if let Some(best) = &stats.best_single {
        let date = best
            .recorded_at()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "  PB single    {:>9}  ({}, {})  {}",
            best.time,
            date,
            pb_age(report.generated_at.abs_diff(best.timestamp)),
            preview(&best.scramble, cfg.scramble_preview)
        )?;
    }
    if let Some(worst) = &stats.worst_single {
        writeln!(out, "  Worst single {:>9}", worst.time)?;
    }
    writeln!(out, "  Mean         {:>9}", format_optional_time(stats.average))?;
    writeln!(out, "  Median       {:>9}", format_optional_time(stats.median))?;

    for kind in AverageOf::ALL {
        let current = match kind {
            AverageOf::Five => Some(stats.current_ao5),
            AverageOf::Twelve => Some(stats.current_ao12),
            AverageOf::Hundred => None,
        };
        let label = format!("Best {kind}");
        match current {
            Some(current) => writeln!(
                out,
                "  {:<12} {:>9}  current {}",
                label,
                format_optional_time(stats.best_average(kind)),
                format_optional_time(current)
            )?,
            None => writeln!(
                out,
                "  {:<12} {:>9}",
                label,
                format_optional_time(stats.best_average(kind))
            )?,
        }
    }

    match stats.improvement_rate {
        Some(rate) => {
            let direction = if rate < 0.0 { "improving" } else { "slowing" };
            writeln!(
                out,
                "  Trend        {direction}, {} s per 100 solves",
                format_number(Some(rate))
            )?;
        }
        None => writeln!(out, "  Trend        not enough solves yet")?,
    }

    if let Some(p) = &stats.projection {
        writeln!(
            out,
            "  Next target  sub-{} in ~{} solves ({} s to go)",
            p.target_seconds,
            p.solves_needed,
            format_number(Some(p.seconds_to_improve))
        )?;
    }
    if let Some(r) = &stats.pb_recency {
        writeln!(
            out,
            "  Since PB     {} days, {} solves",
            r.days_since, r.solves_since
        )?;
    }
    if let Some((day, count)) = stats.frequency.busiest_day() {
        writeln!(out, "  Busiest day  {day} ({count} solves)")?;
    }
    Ok(())
}

fn write_chart_summary<W: Write>(chart: &ChartSeries, out: &mut W) -> io::Result<()> {
    let (lo, hi) = chart.bounds();
    let fit = &chart.regression;
    writeln!(out, "Chart ({} points)", chart.points.len())?;
    writeln!(
        out,
        "  Trend        {}, {} ms/solve",
        fit.direction(),
        format_number(Some((fit.slope * 1000.0).abs()))
    )?;
    writeln!(
        out,
        "  Mean         {}s  std dev {}s",
        format_number(Some(chart.dispersion.mean)),
        format_number(Some(chart.dispersion.std_dev))
    )?;
    writeln!(
        out,
        "  Range        {} - {}",
        format_time(lo * 1000.0),
        format_time(hi * 1000.0)
    )?;
    Ok(())
}

pub fn write_json<W: Write>(report: &Report, out: &mut W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    index: usize,
    date: String,
    time_seconds: f64,
    trend: f64,
    ao5: Option<f64>,
    ao12: Option<f64>,
    ao100: Option<f64>,
    mean: f64,
    std_upper: f64,
    std_lower: f64,
    scramble: &'a str,
}

/// One CSV row per chart point, header included.
pub fn write_chart_csv<W: Write>(chart: &ChartSeries, out: W) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for p in &chart.points {
        writer.serialize(CsvRow {
            index: p.index,
            date: p.date.map(|d| d.to_string()).unwrap_or_default(),
            time_seconds: p.time_seconds,
            trend: p.trend,
            ao5: p.ao5,
            ao12: p.ao12,
            ao100: p.ao100,
            mean: p.mean,
            std_upper: p.std_upper,
            std_lower: p.std_lower,
            scramble: &p.scramble,
        })?;
    }
    writer.flush()?;
    Ok(())
}
