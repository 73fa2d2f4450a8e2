const DNF_MS: f64 = -1.0;
const DNS_MS: f64 = -2.0;

/// Render a millisecond time the way timers display it: `"9.32"` below a
/// minute, `"1:05.32"` from a minute on, `"DNF"`/`"DNS"` for the sentinels.
pub fn format_time(ms: f64) -> String {
    if ms == DNF_MS {
        return "DNF".to_string();
    }
    if ms == DNS_MS {
        return "DNS".to_string();
    }
    if ms < 60_000.0 {
        return format!("{:.2}", ms / 1000.0);
    }

    // Split on whole centiseconds so 119_999 ms becomes 2:00.00 rather than 1:60.00
    let centis = (ms / 10.0).round() as i64;
    let minutes = centis / 6000;
    let seconds = (centis % 6000) as f64 / 100.0;
    format!("{minutes}:{seconds:05.2}")
}

/// `format_time` for values that may be missing.
pub fn format_optional_time(ms: Option<f64>) -> String {
    ms.map(format_time).unwrap_or_else(|| "—".to_string())
}

/// Two decimal places, or an em dash when there is nothing to show.
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "—".to_string(),
    }
}
