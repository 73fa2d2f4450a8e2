use crate::util::{mean, std_dev};
use serde::Serialize;

/// Direction of a fitted line: times going down means the solver is getting faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    #[strum(serialize = "improving")]
    Improving,
    #[strum(serialize = "slowing")]
    Slowing,
}

/// Ordinary least squares fit of `y` against the position `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// `None` for fewer than two points.
    pub fn fit(ys: &[f64]) -> Option<Self> {
        if ys.len() < 2 {
            return None;
        }

        let n = ys.len() as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
        for (i, &y) in ys.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        Some(Self { slope, intercept })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn direction(&self) -> TrendDirection {
        if self.slope < 0.0 {
            TrendDirection::Improving
        } else {
            TrendDirection::Slowing
        }
    }
}

/// Population mean and standard deviation of a series, with the ±1σ band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispersion {
    pub mean: f64,
    pub std_dev: f64,
}

impl Dispersion {
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            std_dev: std_dev(values)?,
        })
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.std_dev
    }

    pub fn lower(&self) -> f64 {
        self.mean - self.std_dev
    }
}
