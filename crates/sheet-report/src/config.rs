//! Configuration for a report request.
//!
//! A [`ReportConfig`] is built once when a report is requested and passed by
//! reference through preprocessing and rendering. Nothing in the pipeline
//! reads process-wide settings.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};

/// Configuration for cleaning and section rendering.
///
/// Use [`ReportConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_report::{Language, ReportConfig};
///
/// let config = ReportConfig::builder()
///     .language(Language::English)
///     .day_first(false)
///     .preview_rows(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Language of titles and messages.
    /// Default: Hebrew
    pub language: Language,

    /// Interpret ambiguous `01/02/2020` as 1 February.
    /// Default: true
    pub day_first: bool,

    /// Treat `12,5` (single comma, one or two trailing digits) as a decimal comma.
    /// Default: true
    pub decimal_comma: bool,

    /// Share of non-missing values that must parse as numbers for a numeric column.
    /// A column is numeric when the share is strictly greater than this.
    /// Default: 0.5
    pub numeric_success_threshold: f64,

    /// Same rule for datetime columns.
    /// Default: 0.5
    pub datetime_success_threshold: f64,

    /// Distinct non-missing values may be at most this share of the row count
    /// for a text column to count as categorical.
    /// Default: 0.5
    pub categorical_unique_ratio: f64,

    /// Rows shown in the preview section.
    /// Default: 10
    pub preview_rows: usize,

    /// Values listed per categorical column before grouping the rest as "other".
    /// Default: 10
    pub top_categories: usize,

    /// Columns drawn in one chart panel.
    /// Default: 6
    pub max_chart_columns: usize,

    /// Histogram bin count.
    /// Default: 10
    pub histogram_bins: usize,

    /// Minimum non-null values for IQR outlier detection.
    /// Default: 4
    pub outlier_min_values: usize,

    /// IQR fence multiplier.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Outlier values listed per column.
    /// Default: 5
    pub max_listed_outliers: usize,

    /// Missing share above which a column is flagged as highly incomplete.
    /// Default: 0.2
    pub high_missing_threshold: f64,

    /// Absolute Pearson coefficient above which a pair is "strongly correlated".
    /// Default: 0.7
    pub strong_correlation_threshold: f64,

    /// Absolute skewness above which a column is flagged as skewed.
    /// Default: 1.0
    pub skew_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            day_first: true,
            decimal_comma: true,
            numeric_success_threshold: 0.5,
            datetime_success_threshold: 0.5,
            categorical_unique_ratio: 0.5,
            preview_rows: 10,
            top_categories: 10,
            max_chart_columns: 6,
            histogram_bins: 10,
            outlier_min_values: 4,
            iqr_multiplier: 1.5,
            max_listed_outliers: 5,
            high_missing_threshold: 0.2,
            strong_correlation_threshold: 0.7,
            skew_threshold: 1.0,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let ratios = [
            ("numeric_success_threshold", self.numeric_success_threshold),
            ("datetime_success_threshold", self.datetime_success_threshold),
            ("categorical_unique_ratio", self.categorical_unique_ratio),
            ("high_missing_threshold", self.high_missing_threshold),
            (
                "strong_correlation_threshold",
                self.strong_correlation_threshold,
            ),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        // IQR needs two quartiles from distinct halves of the sample.
        if self.outlier_min_values < 4 {
            return Err(ConfigValidationError::TooFewOutlierValues(
                self.outlier_min_values,
            ));
        }

        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        if !(self.skew_threshold.is_finite() && self.skew_threshold >= 0.0) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "skew_threshold".to_string(),
                value: self.skew_threshold,
            });
        }

        let counts = [
            ("preview_rows", self.preview_rows),
            ("top_categories", self.top_categories),
            ("max_chart_columns", self.max_chart_columns),
            ("histogram_bins", self.histogram_bins),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid outlier minimum: {0} (must be at least 4)")]
    TooFewOutlierValues(usize),

    #[error("Invalid IQR multiplier: {0} (must be positive)")]
    InvalidMultiplier(f64),

    #[error("'{0}' must be at least 1")]
    ZeroCount(String),
}

impl From<ConfigValidationError> for crate::error::ReportError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::ReportError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    language: Option<Language>,
    day_first: Option<bool>,
    decimal_comma: Option<bool>,
    numeric_success_threshold: Option<f64>,
    datetime_success_threshold: Option<f64>,
    categorical_unique_ratio: Option<f64>,
    preview_rows: Option<usize>,
    top_categories: Option<usize>,
    max_chart_columns: Option<usize>,
    histogram_bins: Option<usize>,
    outlier_min_values: Option<usize>,
    iqr_multiplier: Option<f64>,
    max_listed_outliers: Option<usize>,
    high_missing_threshold: Option<f64>,
    strong_correlation_threshold: Option<f64>,
    skew_threshold: Option<f64>,
}

impl ReportConfigBuilder {
    /// Set the report language.
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Prefer day-first interpretation of ambiguous dates.
    pub fn day_first(mut self, enabled: bool) -> Self {
        self.day_first = Some(enabled);
        self
    }

    /// Enable or disable the decimal-comma heuristic.
    pub fn decimal_comma(mut self, enabled: bool) -> Self {
        self.decimal_comma = Some(enabled);
        self
    }

    /// Set the numeric classification threshold (0.0 - 1.0).
    pub fn numeric_success_threshold(mut self, threshold: f64) -> Self {
        self.numeric_success_threshold = Some(threshold);
        self
    }

    /// Set the datetime classification threshold (0.0 - 1.0).
    pub fn datetime_success_threshold(mut self, threshold: f64) -> Self {
        self.datetime_success_threshold = Some(threshold);
        self
    }

    /// Set the categorical cardinality ceiling as a share of the row count.
    pub fn categorical_unique_ratio(mut self, ratio: f64) -> Self {
        self.categorical_unique_ratio = Some(ratio);
        self
    }

    /// Set how many rows the preview shows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set how many values are listed per categorical column.
    pub fn top_categories(mut self, n: usize) -> Self {
        self.top_categories = Some(n);
        self
    }

    /// Set how many columns one chart panel holds.
    pub fn max_chart_columns(mut self, n: usize) -> Self {
        self.max_chart_columns = Some(n);
        self
    }

    /// Set the histogram bin count.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the minimum sample size for outlier detection.
    pub fn outlier_min_values(mut self, n: usize) -> Self {
        self.outlier_min_values = Some(n);
        self
    }

    /// Set the IQR fence multiplier.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set how many outlier values are listed per column.
    pub fn max_listed_outliers(mut self, n: usize) -> Self {
        self.max_listed_outliers = Some(n);
        self
    }

    /// Set the missing share that counts as high.
    pub fn high_missing_threshold(mut self, threshold: f64) -> Self {
        self.high_missing_threshold = Some(threshold);
        self
    }

    /// Set the strong correlation threshold.
    pub fn strong_correlation_threshold(mut self, threshold: f64) -> Self {
        self.strong_correlation_threshold = Some(threshold);
        self
    }

    /// Set the skewness threshold.
    pub fn skew_threshold(mut self, threshold: f64) -> Self {
        self.skew_threshold = Some(threshold);
        self
    }

    /// Build the configuration, validating all settings.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            language: self.language.unwrap_or(defaults.language),
            day_first: self.day_first.unwrap_or(defaults.day_first),
            decimal_comma: self.decimal_comma.unwrap_or(defaults.decimal_comma),
            numeric_success_threshold: self
                .numeric_success_threshold
                .unwrap_or(defaults.numeric_success_threshold),
            datetime_success_threshold: self
                .datetime_success_threshold
                .unwrap_or(defaults.datetime_success_threshold),
            categorical_unique_ratio: self
                .categorical_unique_ratio
                .unwrap_or(defaults.categorical_unique_ratio),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            top_categories: self.top_categories.unwrap_or(defaults.top_categories),
            max_chart_columns: self.max_chart_columns.unwrap_or(defaults.max_chart_columns),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            outlier_min_values: self
                .outlier_min_values
                .unwrap_or(defaults.outlier_min_values),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            max_listed_outliers: self
                .max_listed_outliers
                .unwrap_or(defaults.max_listed_outliers),
            high_missing_threshold: self
                .high_missing_threshold
                .unwrap_or(defaults.high_missing_threshold),
            strong_correlation_threshold: self
                .strong_correlation_threshold
                .unwrap_or(defaults.strong_correlation_threshold),
            skew_threshold: self.skew_threshold.unwrap_or(defaults.skew_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}
