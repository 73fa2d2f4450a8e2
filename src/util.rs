//! Descriptive statistics over plain `f64` samples.

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation (divides by the count, not count - 1).
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let centre = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = centre - value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    Some(variance.sqrt())
}

/// Middle of an ascending slice; the mean of the two central values for even lengths.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let count = sorted.len();
    match count {
        0 => None,
        odd if odd % 2 == 1 => Some(sorted[count / 2]),
        _ => Some((sorted[count / 2 - 1] + sorted[count / 2]) / 2.0),
    }
}
