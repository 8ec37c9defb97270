//! Column type classification.

use crate::cleaner::{Parsed, ValueNormalizer};
use crate::config::ReportConfig;
use crate::types::{ColumnType, RawCell};
use std::collections::HashSet;

/// Evidence gathered while classifying one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub inferred_type: ColumnType,
    pub non_missing: usize,
    pub numeric_successes: usize,
    pub datetime_successes: usize,
    pub distinct: usize,
}

impl Classification {
    pub fn numeric_ratio(&self) -> f64 {
        ratio(self.numeric_successes, self.non_missing)
    }

    pub fn datetime_ratio(&self) -> f64 {
        ratio(self.datetime_successes, self.non_missing)
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Decides a column's type from its raw cells.
///
/// Order of checks: all missing is `Empty`; more than the numeric threshold
/// of present values parsing as numbers is `Numeric`; likewise for dates;
/// few distinct values relative to the row count is `Categorical`;
/// anything else is `Empty`.
pub struct ColumnClassifier<'a> {
    normalizer: ValueNormalizer,
    config: &'a ReportConfig,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            normalizer: ValueNormalizer::new(config),
            config,
        }
    }

    pub fn classify(&self, cells: &[RawCell]) -> Classification {
        let mut non_missing = 0;
        let mut numeric_successes = 0;
        let mut datetime_successes = 0;
        let mut distinct: HashSet<String> = HashSet::new();

        for cell in cells {
            let Some(text) = self.normalizer.text_value(cell) else {
                continue;
            };
            non_missing += 1;
            distinct.insert(text);
            if self.normalizer.parse_number(cell).is_value() {
                numeric_successes += 1;
            }
            if matches!(self.normalizer.parse_datetime(cell), Parsed::Value(_)) {
                datetime_successes += 1;
            }
        }

        let mut classification = Classification {
            inferred_type: ColumnType::Empty,
            non_missing,
            numeric_successes,
            datetime_successes,
            distinct: distinct.len(),
        };

        if non_missing == 0 {
            return classification;
        }

        let categorical_ceiling =
            (self.config.categorical_unique_ratio * cells.len() as f64).max(1.0);

        classification.inferred_type =
            if classification.numeric_ratio() > self.config.numeric_success_threshold {
                ColumnType::Numeric
            } else if classification.datetime_ratio() > self.config.datetime_success_threshold {
                ColumnType::Datetime
            } else if classification.distinct as f64 <= categorical_ceiling {
                ColumnType::Categorical
            } else {
                ColumnType::Empty
            };

        classification
    }
}
