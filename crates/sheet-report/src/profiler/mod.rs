//! Table preprocessing: column typing and value cleaning.
//!
//! This module provides functionality for:
//! - Column type inference (numeric, datetime, categorical, empty)
//! - Converting raw cells into typed values under the inferred type
//! - Missing and unparsable bookkeeping per column
//! - Descriptive statistics used by the report sections

pub mod statistics;
mod type_inference;

pub use type_inference::{Classification, ColumnClassifier};

use crate::cleaner::{Parsed, ValueNormalizer, display_name, unique_identifiers};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::table::{CleanedColumn, CleanedTable, RawColumn, RawTable};
use crate::types::{CellValue, ColumnType, UnitCounts};
use tracing::{debug, info};

/// Turns a [`RawTable`] into a [`CleanedTable`].
///
/// Rows are never dropped or reordered and every input column yields exactly
/// one output column.
pub struct TablePreprocessor<'a> {
    config: &'a ReportConfig,
    normalizer: ValueNormalizer,
}

impl<'a> TablePreprocessor<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            normalizer: ValueNormalizer::new(config),
        }
    }

    pub fn preprocess(&self, raw: &RawTable) -> Result<CleanedTable> {
        if raw.column_count() == 0 {
            return Err(ReportError::NoColumns);
        }

        info!(
            "Preprocessing table: {} rows, {} columns",
            raw.row_count(),
            raw.column_count()
        );

        let classifier = ColumnClassifier::new(self.config);
        let identifiers = unique_identifiers(raw.columns().iter().map(|c| c.name.as_str()));

        let columns = raw
            .columns()
            .iter()
            .zip(identifiers)
            .map(|(column, identifier)| {
                let classification = classifier.classify(&column.cells);
                debug!(
                    column = %column.name,
                    inferred = %classification.inferred_type,
                    numeric_ratio = classification.numeric_ratio(),
                    datetime_ratio = classification.datetime_ratio(),
                    distinct = classification.distinct,
                    "Classified column"
                );
                self.clean_column(column, identifier, classification.inferred_type)
            })
            .collect();

        Ok(CleanedTable {
            columns,
            row_count: raw.row_count(),
        })
    }

    fn clean_column(
        &self,
        column: &RawColumn,
        identifier: String,
        inferred_type: ColumnType,
    ) -> CleanedColumn {
        let mut values = Vec::with_capacity(column.cells.len());
        let mut missing_count = 0;
        let mut unparsable_count = 0;
        let mut unit_counts = UnitCounts::default();

        for cell in &column.cells {
            let parsed = match inferred_type {
                ColumnType::Numeric => self.normalizer.parse_number(cell).map(|n| {
                    unit_counts.record(n.unit);
                    CellValue::Number(n)
                }),
                ColumnType::Datetime => self.normalizer.parse_datetime(cell).map(CellValue::Date),
                ColumnType::Categorical | ColumnType::Empty => {
                    match self.normalizer.text_value(cell) {
                        Some(text) => Parsed::Value(CellValue::Text(text)),
                        None => Parsed::Missing,
                    }
                }
            };

            match parsed {
                Parsed::Value(v) => values.push(Some(v)),
                Parsed::Missing => {
                    missing_count += 1;
                    values.push(None);
                }
                Parsed::Unparsable => {
                    unparsable_count += 1;
                    values.push(None);
                }
            }
        }

        let rows = column.cells.len();
        let fraction = |count: usize| {
            if rows == 0 {
                0.0
            } else {
                count as f64 / rows as f64
            }
        };

        if unparsable_count > 0 {
            debug!(
                column = %column.name,
                unparsable = unparsable_count,
                "Values could not be parsed under the inferred type"
            );
        }

        CleanedColumn {
            name: identifier,
            display_name: display_name(&column.name),
            inferred_type,
            values,
            missing_count,
            unparsable_count,
            missing_fraction: fraction(missing_count),
            unparsable_fraction: fraction(unparsable_count),
            unit_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NumericUnit, RawCell};

    fn raw(columns: Vec<(&str, Vec<&str>)>) -> RawTable {
        RawTable::new(
            columns
                .into_iter()
                .map(|(name, cells)| {
                    RawColumn::new(name, cells.into_iter().map(RawCell::from).collect())
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_columns_is_error() {
        let config = ReportConfig::default();
        let table = RawTable::new(vec![]).unwrap();
        let result = TablePreprocessor::new(&config).preprocess(&table);
        assert!(matches!(result, Err(ReportError::NoColumns)));
    }

    #[test]
    fn test_shape_preserved() {
        let config = ReportConfig::default();
        let table = raw(vec![
            ("Salary", vec!["₪8,500", "(500)", "", "abc", "1,200"]),
            ("Notes", vec!["a", "b", "c", "d", "e"]),
        ]);
        let cleaned = TablePreprocessor::new(&config).preprocess(&table).unwrap();
        assert_eq!(cleaned.row_count, 5);
        assert_eq!(cleaned.columns.len(), 2);
        assert!(cleaned.columns.iter().all(|c| c.values.len() == 5));
    }

    #[test]
    fn test_missing_and_unparsable_counted_separately() {
        let config = ReportConfig::default();
        let table = raw(vec![(
            "Salary",
            vec!["₪8,500", "(₪500)", "", "abc", "1,200"],
        )]);
        let cleaned = TablePreprocessor::new(&config).preprocess(&table).unwrap();
        let col = &cleaned.columns[0];
        assert_eq!(col.inferred_type, ColumnType::Numeric);
        assert_eq!(col.missing_count, 1);
        assert_eq!(col.unparsable_count, 1);
        assert!((col.missing_fraction - 0.2).abs() < 1e-12);
        assert!((col.unparsable_fraction - 0.2).abs() < 1e-12);
        assert_eq!(col.numbers(), vec![8500.0, -500.0, 1200.0]);
        assert_eq!(col.dominant_unit(), NumericUnit::Currency('₪'));
    }

    #[test]
    fn test_identifiers_and_display_names() {
        let config = ReportConfig::default();
        let table = raw(vec![
            ("שם מלא", vec!["a"]),
            ("שם מלא", vec!["b"]),
            ("\u{200F}Price ($)", vec!["1"]),
        ]);
        let cleaned = TablePreprocessor::new(&config).preprocess(&table).unwrap();
        let names: Vec<&str> = cleaned.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["שם_מלא", "שם_מלא_2", "Price"]);
        assert_eq!(cleaned.columns[2].display_name, "Price ($)");
    }

    #[test]
    fn test_zero_rows() {
        let config = ReportConfig::default();
        let table = raw(vec![("a", vec![]), ("b", vec![])]);
        let cleaned = TablePreprocessor::new(&config).preprocess(&table).unwrap();
        assert_eq!(cleaned.row_count, 0);
        assert!(cleaned.columns.iter().all(|c| c.inferred_type == ColumnType::Empty));
        assert!(cleaned.columns.iter().all(|c| c.missing_fraction == 0.0));
    }

    #[test]
    fn test_reclassifying_cleaned_table_is_stable() {
        let config = ReportConfig::default();
        let table = raw(vec![
            ("amount", vec!["₪8,500", "(500)", "", "abc", "15%"]),
            ("when", vec!["15/01/2020", "2020-02-01", "x", "", "01.03.2020"]),
            ("status", vec!["on", "off", "on", "on", "off"]),
            ("notes", vec!["one", "two", "three", "four", "five"]),
        ]);
        let preprocessor = TablePreprocessor::new(&config);
        let first = preprocessor.preprocess(&table).unwrap();
        let second = preprocessor.preprocess(&first.to_raw().unwrap()).unwrap();
        let types = |t: &CleanedTable| {
            t.columns
                .iter()
                .map(|c| c.inferred_type)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            types(&first),
            vec![
                ColumnType::Numeric,
                ColumnType::Datetime,
                ColumnType::Categorical,
                ColumnType::Empty
            ]
        );
        assert_eq!(types(&first), types(&second));
    }
}
