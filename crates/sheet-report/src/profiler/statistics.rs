//! Descriptive statistics over cleaned numeric values.

use serde::{Deserialize, Serialize};

/// Quantile of sorted values with linear interpolation between ranks.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub fn calculate_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }
    let mean = mean(values).unwrap_or(0.0);
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Moment skewness using the sample standard deviation. Zero when the values
/// do not vary.
pub fn calculate_skewness(values: &[f64]) -> f64 {
    let std = calculate_std(values);
    if std == 0.0 || values.is_empty() {
        return 0.0;
    }
    let mean = mean(values).unwrap_or(0.0);
    let n = values.len() as f64;
    values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n
}

/// Pearson correlation of paired values. `None` when either side is constant
/// or fewer than three pairs exist.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 3 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    let r = cov / (vx.sqrt() * vy.sqrt());
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

/// Count/mean/std/min/quartiles/max of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    /// Describe the values, failing if any statistic is not finite.
    pub fn from_values(values: &[f64]) -> Result<Self, String> {
        if values.is_empty() {
            return Err("no values".to_string());
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let describe = Self {
            count: values.len(),
            mean: mean(values).unwrap_or(f64::NAN),
            std: calculate_std(values),
            min: sorted[0],
            q1: quantile(&sorted, 0.25).unwrap_or(f64::NAN),
            median: quantile(&sorted, 0.5).unwrap_or(f64::NAN),
            q3: quantile(&sorted, 0.75).unwrap_or(f64::NAN),
            max: sorted[sorted.len() - 1],
        };

        let all_finite = [
            describe.mean,
            describe.std,
            describe.min,
            describe.q1,
            describe.median,
            describe.q3,
            describe.max,
        ]
        .iter()
        .all(|v| v.is_finite());

        if all_finite {
            Ok(describe)
        } else {
            Err("values overflow the floating point range".to_string())
        }
    }
}

/// One histogram bar covering `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram. Constant data yields a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let width = (max - min) / bins as f64;
    if width == 0.0 || !width.is_finite() {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}
