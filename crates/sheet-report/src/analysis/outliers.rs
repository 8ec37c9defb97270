//! IQR outlier detection.

use crate::config::ReportConfig;
use crate::profiler::statistics::quantile;
use crate::table::CleanedColumn;
use serde::{Deserialize, Serialize};

/// Quartiles and the normal range derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierFences {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierFences {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Outliers found in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub fences: OutlierFences,
    /// Row positions of the outlying values.
    pub rows: Vec<usize>,
    pub values: Vec<f64>,
    /// Non-missing values the fences were computed from.
    pub checked: usize,
}

impl ColumnOutliers {
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn fraction(&self) -> f64 {
        if self.checked == 0 {
            0.0
        } else {
            self.count() as f64 / self.checked as f64
        }
    }
}

/// Flags values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy)]
pub struct OutlierDetector {
    multiplier: f64,
    min_values: usize,
}

impl OutlierDetector {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            multiplier: config.iqr_multiplier,
            min_values: config.outlier_min_values,
        }
    }

    pub fn min_values(&self) -> usize {
        self.min_values
    }

    /// Fences for the values, or `None` with fewer than the minimum count.
    pub fn fences(&self, values: &[f64]) -> Option<OutlierFences> {
        if values.len() < self.min_values {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile(&sorted, 0.25)?;
        let q3 = quantile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(OutlierFences {
            q1,
            q3,
            iqr,
            lower: q1 - self.multiplier * iqr,
            upper: q3 + self.multiplier * iqr,
        })
    }

    pub fn detect(&self, column: &CleanedColumn) -> Option<ColumnOutliers> {
        let indexed: Vec<(usize, f64)> = column
            .values
            .iter()
            .enumerate()
            .filter_map(|(row, v)| v.as_ref().and_then(|v| v.as_f64()).map(|n| (row, n)))
            .collect();
        let values: Vec<f64> = indexed.iter().map(|(_, v)| *v).collect();
        let fences = self.fences(&values)?;

        let (rows, values): (Vec<usize>, Vec<f64>) = indexed
            .into_iter()
            .filter(|(_, v)| !fences.contains(*v))
            .unzip();

        Some(ColumnOutliers {
            fences,
            rows,
            values,
            checked: column.non_null_count(),
        })
    }
}
