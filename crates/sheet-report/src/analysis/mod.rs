//! Dataset-level findings that drive the recommendations section.
//!
//! [`DataAnalyzer`] computes duplicates, IQR outliers, strong correlations,
//! skewness and a date/value trend from a [`CleanedTable`]. The resulting
//! [`AnalysisResults`] is plain data and may also be loaded from JSON produced
//! elsewhere.

mod correlation;
mod outliers;

pub use correlation::{CorrelationPair, correlation_between, strong_correlations};
pub use outliers::{ColumnOutliers, OutlierDetector, OutlierFences};

use crate::config::ReportConfig;
use crate::error::{Result, ResultExt};
use crate::i18n::{MessageKey, tr};
use crate::profiler::statistics::{calculate_skewness, calculate_std, mean};
use crate::table::CleanedTable;
use crate::types::{CellValue, ColumnType};
use crate::utils::format_percent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Direction of a numeric column over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Findings about a dataset. Every field is optional so partial results
/// from other tools deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResults {
    pub duplicate_rows: Option<usize>,
    /// Outlier row positions keyed by column identifier.
    pub outliers: BTreeMap<String, Vec<usize>>,
    pub strong_correlations: Vec<CorrelationPair>,
    /// Skewness of each numeric column keyed by column identifier.
    pub skewness: BTreeMap<String, f64>,
    pub trend: Option<TrendDirection>,
    pub insights: Vec<String>,
}

impl AnalysisResults {
    /// True when there is nothing to base specific recommendations on.
    pub fn is_empty(&self) -> bool {
        self.duplicate_rows.is_none()
            && self.outliers.is_empty()
            && self.strong_correlations.is_empty()
            && self.skewness.is_empty()
            && self.trend.is_none()
            && self.insights.is_empty()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(crate::error::ReportError::from)
            .context(format!("Reading analysis file {}", path.display()))?;
        let results = serde_json::from_str(&content)
            .map_err(crate::error::ReportError::from)
            .context(format!("Parsing analysis file {}", path.display()))?;
        Ok(results)
    }

    pub fn total_outliers(&self) -> usize {
        self.outliers.values().map(Vec::len).sum()
    }
}

/// Computes [`AnalysisResults`] from a cleaned table.
pub struct DataAnalyzer<'a> {
    config: &'a ReportConfig,
}

impl<'a> DataAnalyzer<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, table: &CleanedTable) -> AnalysisResults {
        info!(
            "Analyzing {} rows across {} columns",
            table.row_count,
            table.column_count()
        );

        let detector = OutlierDetector::new(self.config);
        let mut outliers = BTreeMap::new();
        let mut skewness = BTreeMap::new();

        for column in table.columns_of(ColumnType::Numeric) {
            if let Some(found) = detector.detect(column)
                && found.count() > 0
            {
                outliers.insert(column.name.clone(), found.rows);
            }
            let values = column.numbers();
            if values.len() >= 3 {
                let skew = calculate_skewness(&values);
                if skew.is_finite() {
                    skewness.insert(column.name.clone(), skew);
                }
            }
        }

        let mut results = AnalysisResults {
            duplicate_rows: Some(count_duplicate_rows(table)),
            outliers,
            strong_correlations: strong_correlations(
                table,
                self.config.strong_correlation_threshold,
            ),
            skewness,
            trend: detect_trend(table),
            insights: Vec::new(),
        };
        results.insights = self.insights(table, &results);

        debug!(
            duplicates = ?results.duplicate_rows,
            outlier_columns = results.outliers.len(),
            correlations = results.strong_correlations.len(),
            trend = ?results.trend,
            "Analysis complete"
        );
        results
    }

    fn insights(&self, table: &CleanedTable, results: &AnalysisResults) -> Vec<String> {
        let lang = self.config.language;
        let mut insights = vec![tr(
            lang,
            MessageKey::InsightShape,
            &[
                ("rows", table.row_count.to_string()),
                ("columns", table.column_count().to_string()),
            ],
        )];

        let missing = table.total_missing_cells();
        if missing > 0 && table.total_cells() > 0 {
            insights.push(tr(
                lang,
                MessageKey::InsightMissing,
                &[
                    ("count", missing.to_string()),
                    (
                        "percent",
                        format_percent(missing as f64 / table.total_cells() as f64),
                    ),
                ],
            ));
        }

        if let Some(duplicates) = results.duplicate_rows.filter(|d| *d > 0) {
            insights.push(tr(
                lang,
                MessageKey::InsightDuplicates,
                &[("count", duplicates.to_string())],
            ));
        }

        let outlier_total = results.total_outliers();
        if outlier_total > 0 {
            insights.push(tr(
                lang,
                MessageKey::InsightOutliers,
                &[("count", outlier_total.to_string())],
            ));
        }

        if !results.strong_correlations.is_empty() {
            insights.push(tr(
                lang,
                MessageKey::InsightCorrelations,
                &[("count", results.strong_correlations.len().to_string())],
            ));
        }

        let numeric = table.columns_of(ColumnType::Numeric).count();
        if numeric > 0 {
            insights.push(tr(
                lang,
                MessageKey::InsightNumericColumns,
                &[("count", numeric.to_string())],
            ));
        }
        let text = table.columns_of(ColumnType::Categorical).count();
        if text > 0 {
            insights.push(tr(
                lang,
                MessageKey::InsightTextColumns,
                &[("count", text.to_string())],
            ));
        }

        insights
    }
}

/// Rows identical to an earlier row across every column.
pub fn count_duplicate_rows(table: &CleanedTable) -> usize {
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(table.row_count);
    let mut duplicates = 0;
    for row in 0..table.row_count {
        let key: Vec<Option<String>> = table
            .columns
            .iter()
            .map(|c| {
                c.values
                    .get(row)
                    .and_then(|v| v.as_ref().map(CellValue::to_canonical_string))
            })
            .collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Trend of the first numeric column ordered by the first datetime column.
///
/// Fits a least-squares line through the values in date order. A total
/// change under a tenth of a standard deviation counts as flat.
pub fn detect_trend(table: &CleanedTable) -> Option<TrendDirection> {
    let dates = table.columns_of(ColumnType::Datetime).next()?;
    let numbers = table.columns_of(ColumnType::Numeric).next()?;

    let mut points: Vec<(chrono::NaiveDateTime, f64)> = dates
        .values
        .iter()
        .zip(&numbers.values)
        .filter_map(|(d, v)| match (d, v) {
            (Some(CellValue::Date(d)), Some(v)) => v.as_f64().map(|v| (*d, v)),
            _ => None,
        })
        .collect();
    if points.len() < 3 {
        return None;
    }
    points.sort_by_key(|(d, _)| *d);

    let ys: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
    let mx = mean(&xs)?;
    let my = mean(&ys)?;
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;

    let total_change = slope * (ys.len() - 1) as f64;
    let spread = calculate_std(&ys);
    if !total_change.is_finite() || spread == 0.0 || total_change.abs() < 0.1 * spread {
        Some(TrendDirection::Flat)
    } else if total_change > 0.0 {
        Some(TrendDirection::Up)
    } else {
        Some(TrendDirection::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{cleaned_table as cleaned, english};

    #[test]
    fn test_duplicate_rows() {
        let config = ReportConfig::default();
        let table = cleaned(
            vec![
                ("a", vec!["1", "2", "1", "1"]),
                ("b", vec!["x", "y", "x", "z"]),
            ],
            &config,
        );
        assert_eq!(count_duplicate_rows(&table), 1);
    }

    #[test]
    fn test_trend_up_and_down() {
        let config = ReportConfig::default();
        let up = cleaned(
            vec![
                ("date", vec!["2020-01-03", "2020-01-01", "2020-01-02", "2020-01-04"]),
                ("sales", vec!["30", "10", "20", "40"]),
            ],
            &config,
        );
        assert_eq!(detect_trend(&up), Some(TrendDirection::Up));

        let down = cleaned(
            vec![
                ("date", vec!["2020-01-01", "2020-01-02", "2020-01-03", "2020-01-04"]),
                ("sales", vec!["40", "30", "20", "10"]),
            ],
            &config,
        );
        assert_eq!(detect_trend(&down), Some(TrendDirection::Down));
    }

    #[test]
    fn test_trend_needs_dates() {
        let config = ReportConfig::default();
        let table = cleaned(vec![("sales", vec!["1", "2", "3", "4"])], &config);
        assert_eq!(detect_trend(&table), None);
    }

    #[test]
    fn test_analyze_collects_findings() {
        let config = english();
        let table = cleaned(
            vec![
                ("price", vec!["1", "2", "3", "4", "100", "2"]),
                ("qty", vec!["2", "4", "6", "8", "200", "4"]),
            ],
            &config,
        );
        let results = DataAnalyzer::new(&config).analyze(&table);
        assert_eq!(results.duplicate_rows, Some(1));
        assert_eq!(results.outliers.get("price"), Some(&vec![4]));
        assert_eq!(results.strong_correlations.len(), 1);
        assert!(results.skewness["price"] > 1.0);
        assert!(!results.is_empty());
        assert!(results.insights[0].contains("6 rows"));
    }

    #[test]
    fn test_empty_results() {
        assert!(AnalysisResults::default().is_empty());
        let parsed: AnalysisResults = serde_json::from_str("{\"trend\": \"up\"}").unwrap();
        assert_eq!(parsed.trend, Some(TrendDirection::Up));
        assert!(!parsed.is_empty());
    }
}
