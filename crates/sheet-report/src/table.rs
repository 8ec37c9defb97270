//! Raw and cleaned tables, plus conversions to and from polars.

use crate::error::{ReportError, Result, ResultExt};
use crate::types::{CellValue, ColumnType, NumericUnit, RawCell, UnitCounts};
use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Raw table
// ============================================================================

/// A named column of raw cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<RawCell>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, cells: Vec<RawCell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// A rectangular table exactly as ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<RawColumn>,
    row_count: usize,
}

impl RawTable {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(ReportError::RaggedTable {
                column: bad.name.clone(),
                expected: row_count,
                actual: bad.cells.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Build a table from a header and row-major data.
    ///
    /// Short rows are padded with nulls; rows wider than the header are an error.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<RawCell>>) -> Result<Self> {
        let mut columns: Vec<RawColumn> = headers
            .iter()
            .map(|h| RawColumn::new(*h, Vec::with_capacity(rows.len())))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > headers.len() {
                return Err(ReportError::RaggedTable {
                    column: format!("row {}", row_idx + 1),
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            let mut cells = row.into_iter();
            for col in columns.iter_mut() {
                col.cells.push(cells.next().unwrap_or_default());
            }
        }
        Self::new(columns)
    }

    /// Convert a polars DataFrame, keeping numbers as numbers and everything
    /// else as text.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns = Vec::with_capacity(df.width());
        for name in df.get_column_names() {
            let series = df
                .column(name.as_str())
                .context(format!("Reading column '{}'", name))?
                .as_materialized_series()
                .clone();
            let cells = series_to_cells(&series)
                .context(format!("Converting column '{}'", name))?;
            columns.push(RawColumn::new(name.as_str(), cells));
        }
        Self::new(columns)
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

fn series_to_cells(series: &Series) -> PolarsResult<Vec<RawCell>> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            Ok(floats
                .f64()?
                .into_iter()
                .map(|v| v.map(RawCell::Number).unwrap_or(RawCell::Null))
                .collect())
        }
        DtypeCategory::String
        | DtypeCategory::Boolean
        | DtypeCategory::Datetime
        | DtypeCategory::Other => {
            let strings = series.cast(&DataType::String)?;
            Ok(strings
                .str()?
                .into_iter()
                .map(|v| v.map(RawCell::from).unwrap_or(RawCell::Null))
                .collect())
        }
    }
}

// ============================================================================
// Cleaned table
// ============================================================================

/// A typed column produced by preprocessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedColumn {
    /// Normalized identifier, unique within the table.
    pub name: String,
    /// Original header for display.
    pub display_name: String,
    pub inferred_type: ColumnType,
    pub values: Vec<Option<CellValue>>,
    /// Cells that were absent or a missing marker.
    pub missing_count: usize,
    /// Cells present but not parseable under the inferred type.
    pub unparsable_count: usize,
    pub missing_fraction: f64,
    pub unparsable_fraction: f64,
    #[serde(default)]
    pub unit_counts: UnitCounts,
}

impl CleanedColumn {
    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Finite numeric values in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values
            .iter()
            .flatten()
            .filter_map(CellValue::as_f64)
            .collect()
    }

    /// The unit most parsed values carried. Currency wins ties with plain
    /// numbers so amounts keep their symbol.
    pub fn dominant_unit(&self) -> NumericUnit {
        let counts = &self.unit_counts;
        if counts.percent > counts.plain && counts.percent >= counts.currency {
            return NumericUnit::Percent;
        }
        if counts.currency > 0 && counts.currency >= counts.plain {
            let symbol = self.values.iter().flatten().find_map(|v| match v {
                CellValue::Number(n) => match n.unit {
                    NumericUnit::Currency(c) => Some(c),
                    _ => None,
                },
                _ => None,
            });
            if let Some(symbol) = symbol {
                return NumericUnit::Currency(symbol);
            }
        }
        NumericUnit::Plain
    }

    /// Value frequencies, most frequent first, ties broken alphabetically.
    pub fn value_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in self.values.iter().flatten() {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted
    }

    pub fn distinct_count(&self) -> usize {
        self.value_counts().len()
    }

    fn to_series(&self) -> Series {
        match self.inferred_type {
            ColumnType::Numeric => {
                let values: Vec<Option<f64>> = self
                    .values
                    .iter()
                    .map(|v| v.as_ref().and_then(CellValue::as_f64))
                    .collect();
                Series::new(self.name.as_str().into(), values)
            }
            _ => {
                let values: Vec<Option<String>> = self
                    .values
                    .iter()
                    .map(|v| v.as_ref().map(CellValue::to_canonical_string))
                    .collect();
                Series::new(self.name.as_str().into(), values)
            }
        }
    }
}

/// The typed, cleaned table every section reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedTable {
    pub columns: Vec<CleanedColumn>,
    pub row_count: usize,
}

impl CleanedTable {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns_of(&self, kind: ColumnType) -> impl Iterator<Item = &CleanedColumn> {
        self.columns.iter().filter(move |c| c.inferred_type == kind)
    }

    /// Look a column up by identifier or by its original header.
    pub fn find_column(&self, name: &str) -> Option<&CleanedColumn> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.display_name == name))
    }

    /// Cells that are null after cleaning (missing or unparsable).
    pub fn total_null_cells(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len() - c.non_null_count())
            .sum()
    }

    pub fn total_missing_cells(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }

    pub fn total_cells(&self) -> usize {
        self.row_count * self.columns.len()
    }

    /// Render cleaned values back into a raw table under the original
    /// headers. Preprocessing the result yields the same column types.
    pub fn to_raw(&self) -> Result<RawTable> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let cells = c
                    .values
                    .iter()
                    .map(|v| match v {
                        None => RawCell::Null,
                        Some(CellValue::Number(n)) => RawCell::Number(n.value),
                        Some(other) => RawCell::Text(other.to_canonical_string()),
                    })
                    .collect();
                RawColumn::new(c.display_name.clone(), cells)
            })
            .collect();
        RawTable::new(columns)
    }

    /// Export as a polars DataFrame keyed by the normalized identifiers.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = self.columns.iter().map(|c| c.to_series().into()).collect();
        DataFrame::new(columns).context("Building cleaned DataFrame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumberValue;

    #[test]
    fn test_ragged_columns_rejected() {
        let result = RawTable::new(vec![
            RawColumn::new("a", vec![RawCell::from(1i64), RawCell::from(2i64)]),
            RawColumn::new("b", vec![RawCell::from(1i64)]),
        ]);
        match result {
            Err(ReportError::RaggedTable {
                column,
                expected,
                actual,
            }) => {
                assert_eq!(column, "b");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ragged error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_rows() {
        let table = RawTable::from_rows(
            &["x", "y"],
            vec![
                vec![RawCell::from("1"), RawCell::from("a")],
                vec![RawCell::Null, RawCell::from("b")],
            ],
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.columns()[1].cells[1], RawCell::from("b"));
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = RawTable::from_rows(&["x", "y"], vec![vec![RawCell::from("1")]]).unwrap();
        assert_eq!(table.columns()[1].cells, vec![RawCell::Null]);
    }

    #[test]
    fn test_from_rows_rejects_wide_rows() {
        let result = RawTable::from_rows(
            &["x"],
            vec![vec![RawCell::from("1"), RawCell::from("2")]],
        );
        assert!(matches!(result, Err(ReportError::RaggedTable { .. })));
    }

    #[test]
    fn test_from_dataframe_keeps_numbers() {
        let df = df! {
            "amount" => [Some(1.5), None, Some(3.0)],
            "label" => [Some("a"), Some("b"), None],
        }
        .unwrap();
        let table = RawTable::from_dataframe(&df).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns()[0].cells[0], RawCell::Number(1.5));
        assert_eq!(table.columns()[0].cells[1], RawCell::Null);
        assert_eq!(table.columns()[1].cells[1], RawCell::from("b"));
        assert_eq!(table.columns()[1].cells[2], RawCell::Null);
    }

    fn column(values: Vec<Option<CellValue>>) -> CleanedColumn {
        CleanedColumn {
            name: "c".to_string(),
            display_name: "C".to_string(),
            inferred_type: ColumnType::Categorical,
            values,
            missing_count: 0,
            unparsable_count: 0,
            missing_fraction: 0.0,
            unparsable_fraction: 0.0,
            unit_counts: UnitCounts::default(),
        }
    }

    #[test]
    fn test_value_counts_order() {
        let text = |s: &str| Some(CellValue::Text(s.to_string()));
        let col = column(vec![text("b"), text("a"), text("b"), None, text("c"), text("a")]);
        let counts = col.value_counts();
        assert_eq!(counts[0], ("a".to_string(), 2));
        assert_eq!(counts[1], ("b".to_string(), 2));
        assert_eq!(counts[2], ("c".to_string(), 1));
        assert_eq!(col.distinct_count(), 3);
        assert_eq!(col.non_null_count(), 5);
    }

    #[test]
    fn test_dominant_unit_currency() {
        let mut col = column(vec![
            Some(CellValue::Number(NumberValue {
                value: 10.0,
                unit: NumericUnit::Currency('$'),
            })),
            Some(CellValue::Number(NumberValue::plain(5.0))),
        ]);
        col.unit_counts = UnitCounts {
            plain: 1,
            percent: 0,
            currency: 1,
        };
        assert_eq!(col.dominant_unit(), NumericUnit::Currency('$'));
    }

    #[test]
    fn test_to_dataframe_shape() {
        let mut numeric = column(vec![Some(CellValue::Number(NumberValue::plain(1.0))), None]);
        numeric.name = "n".to_string();
        numeric.inferred_type = ColumnType::Numeric;
        let text = column(vec![None, Some(CellValue::Text("x".to_string()))]);
        let table = CleanedTable {
            columns: vec![numeric, text],
            row_count: 2,
        };
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("n").unwrap().dtype(), &DataType::Float64);
    }
}
