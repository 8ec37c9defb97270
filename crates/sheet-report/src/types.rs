use crate::charts::ChartRef;
use crate::i18n::{Language, MessageKey, text};
use crate::utils::format_number;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Raw input
// ============================================================================

/// One cell exactly as it came out of the ingested file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawCell {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl RawCell {
    pub fn is_null(&self) -> bool {
        matches!(self, RawCell::Null)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<String> for RawCell {
    fn from(s: String) -> Self {
        RawCell::Text(s)
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl From<i64> for RawCell {
    fn from(v: i64) -> Self {
        RawCell::Number(v as f64)
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(RawCell::Null)
    }
}

// ============================================================================
// Cleaned values
// ============================================================================

/// How a parsed number was written in the source.
///
/// Percent values are stored as fractions (`15%` is `0.15`); use
/// [`NumberValue::display_value`] to get the figure as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumericUnit {
    #[default]
    Plain,
    Percent,
    Currency(char),
}

/// A parsed numeric cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberValue {
    pub value: f64,
    pub unit: NumericUnit,
}

impl NumberValue {
    pub fn plain(value: f64) -> Self {
        Self {
            value,
            unit: NumericUnit::Plain,
        }
    }

    /// The number as it would be written back (`0.15` percent shows as `15`).
    pub fn display_value(&self) -> f64 {
        match self.unit {
            NumericUnit::Percent => self.value * 100.0,
            _ => self.value,
        }
    }
}

impl fmt::Display for NumberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            NumericUnit::Plain => write!(f, "{}", format_number(self.value)),
            NumericUnit::Percent => write!(f, "{}%", format_number(self.display_value())),
            NumericUnit::Currency(symbol) => write!(f, "{}{}", symbol, format_number(self.value)),
        }
    }
}

/// A non-null cleaned cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Number(NumberValue),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(n.value),
            _ => None,
        }
    }

    /// Text that parses back to the same value and type.
    pub fn to_canonical_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.value.to_string(),
            CellValue::Date(d) => format_datetime(d),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => f.write_str(&format_datetime(d)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Dates at midnight print without a time part.
pub fn format_datetime(d: &NaiveDateTime) -> String {
    if d.time() == chrono::NaiveTime::MIN {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Inferred type of a cleaned column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Datetime,
    /// Entirely missing, free text, or otherwise unusable for statistics.
    Empty,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::Datetime => "datetime",
            ColumnType::Empty => "empty",
        }
    }

    /// Localized label for report text.
    pub fn label(&self, lang: Language) -> String {
        let key = match self {
            ColumnType::Numeric => MessageKey::TypeNumeric,
            ColumnType::Categorical => MessageKey::TypeCategorical,
            ColumnType::Datetime => MessageKey::TypeDatetime,
            ColumnType::Empty => MessageKey::TypeEmpty,
        };
        text(lang, key)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many parsed numbers of a column carried each unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitCounts {
    pub plain: usize,
    pub percent: usize,
    pub currency: usize,
}

impl UnitCounts {
    pub fn record(&mut self, unit: NumericUnit) {
        match unit {
            NumericUnit::Plain => self.plain += 1,
            NumericUnit::Percent => self.percent += 1,
            NumericUnit::Currency(_) => self.currency += 1,
        }
    }

    /// Percent figures next to plain numbers are ambiguous in scale.
    pub fn mixes_percent_and_plain(&self) -> bool {
        self.percent > 0 && self.plain > 0
    }
}

// ============================================================================
// Report sections
// ============================================================================

/// The fixed report sections, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Preview,
    MissingValues,
    CategoricalDistributions,
    NumericDistributions,
    StatisticalSummary,
    Outliers,
    Recommendations,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Preview,
        SectionKey::MissingValues,
        SectionKey::CategoricalDistributions,
        SectionKey::NumericDistributions,
        SectionKey::StatisticalSummary,
        SectionKey::Outliers,
        SectionKey::Recommendations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Preview => "preview",
            SectionKey::MissingValues => "missing_values",
            SectionKey::CategoricalDistributions => "categorical_distributions",
            SectionKey::NumericDistributions => "numeric_distributions",
            SectionKey::StatisticalSummary => "statistical_summary",
            SectionKey::Outliers => "outliers",
            SectionKey::Recommendations => "recommendations",
        }
    }

    pub fn title(&self, lang: Language) -> String {
        let key = match self {
            SectionKey::Preview => MessageKey::PreviewTitle,
            SectionKey::MissingValues => MessageKey::MissingTitle,
            SectionKey::CategoricalDistributions => MessageKey::CategoricalTitle,
            SectionKey::NumericDistributions => MessageKey::NumericTitle,
            SectionKey::StatisticalSummary => MessageKey::SummaryTitle,
            SectionKey::Outliers => MessageKey::OutliersTitle,
            SectionKey::Recommendations => MessageKey::RecommendationsTitle,
        };
        text(lang, key)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small table of display strings, laid out by the document assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TextTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render with space-padded columns and a ` | ` separator.
    pub fn render_plain(&self) -> String {
        let width_of = |s: &str| s.chars().count();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| width_of(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(width_of(cell));
                }
            }
        }

        let render_row = |cells: &[String]| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let pad = widths.get(i).copied().unwrap_or(0).saturating_sub(width_of(cell));
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(render_row(&self.headers));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        for row in &self.rows {
            lines.push(render_row(row));
        }
        lines.join("\n")
    }
}

/// Content of one report section.
///
/// `body_text` is never empty. `is_fallback` is set whenever the rich
/// content could not be produced; `fallback_reason` then says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub key: SectionKey,
    pub title: String,
    pub body_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TextTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartRef>,
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}
