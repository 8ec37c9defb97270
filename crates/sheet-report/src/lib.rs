//! Spreadsheet Report Library
//!
//! Turns a messy, hand-maintained table into a cleaned typed table and a
//! fixed list of seven report sections that always carry content.
//!
//! # Overview
//!
//! - **Preprocessing**: column type inference (numeric, datetime, categorical,
//!   empty) and value normalization for currency, thousands separators,
//!   accounting negatives, percentages, decimal commas and mixed date formats
//! - **Sections**: preview, missing values, categorical and numeric
//!   distributions, statistical summary, outliers and recommendations
//! - **Guaranteed content**: every section has a rich path and a fallback
//!   path; a failing chart or computation never removes a section
//! - **Hebrew first**: all report text is available in Hebrew (default) and
//!   English
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_report::{DataAnalyzer, RawTable, ReportConfig, preprocess, render_sections};
//!
//! let raw = RawTable::from_rows(&["שם", "משכורת"], rows)?;
//! let config = ReportConfig::default();
//!
//! let table = preprocess(&raw, &config)?;
//! let analysis = DataAnalyzer::new(&config).analyze(&table);
//!
//! for section in render_sections(&table, Some(&analysis), &config)? {
//!     println!("{}\n{}\n", section.title, section.body_text);
//! }
//! ```
//!
//! # Charts
//!
//! Charts are drawn through the [`charts::ChartRenderer`] trait. The crate
//! ships [`charts::VegaLiteChartRenderer`]; pass any renderer to
//! [`render_sections_with_charts`]. A renderer error sends only the affected
//! section to text-only fallback content.
//!
//! # Errors
//!
//! The entry points fail only when the table itself is unusable: it has no
//! columns, or its columns have different lengths.

pub mod analysis;
pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod i18n;
pub mod profiler;
pub mod reporting;
pub mod sections;
pub mod table;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use analysis::{AnalysisResults, DataAnalyzer, TrendDirection};
pub use charts::{ChartRef, ChartRenderer, ChartSpec, VegaLiteChartRenderer};
pub use cleaner::ValueNormalizer;
pub use config::{ConfigValidationError, ReportConfig, ReportConfigBuilder};
pub use error::{ReportError, Result as ReportResult, ResultExt, SectionFailure};
pub use i18n::Language;
pub use profiler::TablePreprocessor;
pub use reporting::{ColumnSummary, ReportDocument, ReportGenerator};
pub use sections::SectionRenderer;
pub use table::{CleanedColumn, CleanedTable, RawColumn, RawTable};
pub use types::{CellValue, ColumnType, NumericUnit, RawCell, SectionKey, SectionResult, TextTable};

/// Classify and clean every column of a raw table.
///
/// Row count and column order are preserved. Fails only for a table with
/// no columns.
pub fn preprocess(raw: &RawTable, config: &ReportConfig) -> error::Result<CleanedTable> {
    TablePreprocessor::new(config).preprocess(raw)
}

/// Render the seven report sections without charts.
pub fn render_sections(
    table: &CleanedTable,
    analysis: Option<&AnalysisResults>,
    config: &ReportConfig,
) -> error::Result<Vec<SectionResult>> {
    SectionRenderer::new(config).render_sections(table, analysis)
}

/// Render the seven report sections, drawing charts through `charts`.
pub fn render_sections_with_charts(
    table: &CleanedTable,
    analysis: Option<&AnalysisResults>,
    config: &ReportConfig,
    charts: &dyn ChartRenderer,
) -> error::Result<Vec<SectionResult>> {
    SectionRenderer::new(config)
        .with_charts(charts)
        .render_sections(table, analysis)
}

static_assertions::assert_impl_all!(ReportConfig: Send, Sync);
static_assertions::assert_impl_all!(CleanedTable: Send, Sync);
static_assertions::assert_impl_all!(AnalysisResults: Send, Sync);
static_assertions::assert_impl_all!(SectionResult: Send, Sync);
static_assertions::assert_impl_all!(VegaLiteChartRenderer: Send, Sync, ChartRenderer);
