//! Pairwise correlation between numeric columns.

use crate::profiler::statistics::pearson;
use crate::table::CleanedTable;
use crate::types::ColumnType;
use serde::{Deserialize, Serialize};

/// A pair of numeric columns whose values move together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

/// Pearson correlation over rows where both columns have a value.
pub fn correlation_between(table: &CleanedTable, first: usize, second: usize) -> Option<f64> {
    let a = table.columns.get(first)?;
    let b = table.columns.get(second)?;
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .values
        .iter()
        .zip(&b.values)
        .filter_map(|(x, y)| {
            let x = x.as_ref()?.as_f64()?;
            let y = y.as_ref()?.as_f64()?;
            Some((x, y))
        })
        .unzip();
    pearson(&xs, &ys)
}

/// Column pairs with `|r|` at or above the threshold, strongest first.
pub fn strong_correlations(table: &CleanedTable, threshold: f64) -> Vec<CorrelationPair> {
    let numeric: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.inferred_type == ColumnType::Numeric)
        .map(|(i, _)| i)
        .collect();

    let mut pairs = Vec::new();
    for (pos, &i) in numeric.iter().enumerate() {
        for &j in &numeric[pos + 1..] {
            if let Some(r) = correlation_between(table, i, j)
                && r.abs() >= threshold
            {
                pairs.push(CorrelationPair {
                    first: table.columns[i].name.clone(),
                    second: table.columns[j].name.clone(),
                    coefficient: r,
                });
            }
        }
    }

    pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    pairs
}
