//! Cell-level value normalization.
//!
//! This module provides functionality for:
//! - Recognizing missing-value markers
//! - Parsing messy numeric text (currency, separators, percent, accounting negatives)
//! - Parsing dates in ISO, day-first and month-first layouts
//! - Normalizing column headers into unique identifiers

mod converters;
mod dates;
mod sanitizers;

pub use sanitizers::{
    MISSING_MARKERS, display_name, is_missing_marker, normalize_column_name, unique_identifiers,
};

use crate::config::ReportConfig;
use crate::types::{CellValue, NumberValue, RawCell};
use chrono::NaiveDateTime;

/// Outcome of parsing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Value(T),
    /// Absent, or a recognized missing marker.
    Missing,
    /// Present but not valid for the requested kind.
    Unparsable,
}

impl<T> Parsed<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Parsed::Value(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Parsed::Missing)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Value(v) => Parsed::Value(f(v)),
            Parsed::Missing => Parsed::Missing,
            Parsed::Unparsable => Parsed::Unparsable,
        }
    }
}

/// What a cell should be parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Numeric,
    Datetime,
}

/// Stateless cell parser configured with locale preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueNormalizer {
    day_first: bool,
    decimal_comma: bool,
}

impl Default for ValueNormalizer {
    fn default() -> Self {
        Self {
            day_first: true,
            decimal_comma: true,
        }
    }
}

impl ValueNormalizer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            day_first: config.day_first,
            decimal_comma: config.decimal_comma,
        }
    }

    pub fn with_options(day_first: bool, decimal_comma: bool) -> Self {
        Self {
            day_first,
            decimal_comma,
        }
    }

    /// Parse a cell as the requested kind.
    pub fn normalize(&self, cell: &RawCell, target: TargetKind) -> Parsed<CellValue> {
        match target {
            TargetKind::Numeric => self.parse_number(cell).map(CellValue::Number),
            TargetKind::Datetime => self.parse_datetime(cell).map(CellValue::Date),
        }
    }

    pub fn parse_number(&self, cell: &RawCell) -> Parsed<NumberValue> {
        match cell {
            RawCell::Null => Parsed::Missing,
            RawCell::Number(v) => converters::accept_number(*v),
            RawCell::Text(s) => converters::parse_number_text(s, self.decimal_comma),
        }
    }

    /// Numbers are never dates; a numeric-looking date column is numeric.
    pub fn parse_datetime(&self, cell: &RawCell) -> Parsed<NaiveDateTime> {
        match cell {
            RawCell::Null => Parsed::Missing,
            RawCell::Number(v) if v.is_nan() => Parsed::Missing,
            RawCell::Number(_) => Parsed::Unparsable,
            RawCell::Text(s) => dates::parse_date_text(s, self.day_first),
        }
    }

    pub fn is_missing(&self, cell: &RawCell) -> bool {
        match cell {
            RawCell::Null => true,
            RawCell::Number(v) => v.is_nan(),
            RawCell::Text(s) => is_missing_marker(&sanitizers::clean_cell_text(s)),
        }
    }

    /// Cleaned display text of a non-missing cell.
    pub fn text_value(&self, cell: &RawCell) -> Option<String> {
        if self.is_missing(cell) {
            return None;
        }
        match cell {
            RawCell::Null => None,
            RawCell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                Some(format!("{:.0}", v))
            }
            RawCell::Number(v) => Some(v.to_string()),
            RawCell::Text(s) => Some(sanitizers::clean_cell_text(s)),
        }
    }
}
