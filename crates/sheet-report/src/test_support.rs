//! Shared fixtures for unit tests.

use crate::config::ReportConfig;
use crate::profiler::TablePreprocessor;
use crate::table::{CleanedTable, RawColumn, RawTable};
use crate::types::RawCell;

/// Preprocess text columns given as `(header, cells)`.
pub(crate) fn cleaned_table(columns: Vec<(&str, Vec<&str>)>, config: &ReportConfig) -> CleanedTable {
    let raw = RawTable::new(
        columns
            .into_iter()
            .map(|(name, cells)| RawColumn::new(name, cells.into_iter().map(RawCell::from).collect()))
            .collect(),
    )
    .unwrap();
    TablePreprocessor::new(config).preprocess(&raw).unwrap()
}

pub(crate) fn english() -> ReportConfig {
    ReportConfig::builder()
        .language(crate::i18n::Language::English)
        .build()
        .unwrap()
}
