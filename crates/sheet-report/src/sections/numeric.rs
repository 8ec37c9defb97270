use super::{
    FallbackContent, ReportSection, RichContent, SectionContext, computation_failure, reason_line,
    skipped_line,
};
use crate::charts::{ChartKind, ChartSeries, ChartSpec};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::profiler::statistics::{Describe, histogram};
use crate::table::CleanedColumn;
use crate::types::{ColumnType, NumberValue, NumericUnit, SectionKey};

/// Descriptive statistics and histograms of the numeric columns.
pub(crate) struct NumericSection;

/// Numeric columns need this many values before they are described.
const MIN_VALUES: usize = 2;

/// Render a statistic the way the column's values were written.
pub(crate) fn in_unit(value: f64, unit: NumericUnit) -> String {
    NumberValue { value, unit }.to_string()
}

fn is_usable(column: &CleanedColumn) -> bool {
    column.inferred_type == ColumnType::Numeric && column.non_null_count() >= MIN_VALUES
}

impl NumericSection {
    /// The error is the reason statistics failed for this column.
    fn column_line(ctx: &SectionContext<'_>, column: &CleanedColumn) -> Result<String, String> {
        let describe = Describe::from_values(&column.numbers())?;
        let unit = column.dominant_unit();
        Ok(tr(
            ctx.lang(),
            MessageKey::NumericColumnLine,
            &[
                ("column", column.display_name.clone()),
                ("count", describe.count.to_string()),
                ("mean", in_unit(describe.mean, unit)),
                ("median", in_unit(describe.median, unit)),
                ("std", in_unit(describe.std, unit)),
                ("min", in_unit(describe.min, unit)),
                ("max", in_unit(describe.max, unit)),
            ],
        ))
    }

    fn histogram_series(ctx: &SectionContext<'_>, column: &CleanedColumn) -> ChartSeries {
        let unit = column.dominant_unit();
        let mut series = ChartSeries::new(column.display_name.clone());
        for bin in histogram(&column.numbers(), ctx.config.histogram_bins) {
            series.push(
                format!("{}–{}", in_unit(bin.lower, unit), in_unit(bin.upper, unit)),
                bin.count as f64,
            );
        }
        series
    }
}

impl ReportSection for NumericSection {
    fn key(&self) -> SectionKey {
        SectionKey::NumericDistributions
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let (usable, skipped): (Vec<&CleanedColumn>, Vec<&CleanedColumn>) =
            ctx.table.columns.iter().partition(|c| is_usable(c));
        if usable.is_empty() {
            return Err(SectionFailure::insufficient(
                "no numeric column with two or more values",
            ));
        }

        let lang = ctx.lang();
        let mut lines = vec![text(lang, MessageKey::NumericIntro)];
        let mut described = Vec::new();
        let mut failed = Vec::new();
        for column in usable {
            match Self::column_line(ctx, column) {
                Ok(line) => {
                    lines.push(line);
                    described.push(column);
                }
                Err(reason) => failed.push((column, reason)),
            }
        }
        if described.is_empty() {
            return Err(computation_failure(&failed));
        }

        if !failed.is_empty() || !skipped.is_empty() {
            lines.push(String::new());
            lines.extend(failed.iter().map(|(c, reason)| reason_line(c, reason, lang)));
            lines.extend(skipped.iter().map(|c| skipped_line(c, lang)));
        }

        let series = described
            .iter()
            .take(ctx.config.max_chart_columns)
            .map(|c| Self::histogram_series(ctx, c))
            .collect();

        Ok(RichContent {
            body: lines.join("\n"),
            table: None,
            chart: Some(ChartSpec {
                section: self.key(),
                kind: ChartKind::Histogram,
                title: text(lang, MessageKey::ChartHistogram),
                series,
                rtl: lang.is_rtl(),
            }),
        })
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, failure: &SectionFailure) -> FallbackContent {
        let lang = ctx.lang();
        let mut lines = Vec::new();
        if let SectionFailure::Computation(reason) = failure {
            lines.push(tr(
                lang,
                MessageKey::ComputationFailed,
                &[("reason", reason.clone())],
            ));
        }
        lines.push(text(lang, MessageKey::NoUsableNumeric));
        lines.extend(ctx.table.columns.iter().map(|c| {
            match is_usable(c).then(|| Describe::from_values(&c.numbers())) {
                Some(Err(reason)) => reason_line(c, &reason, lang),
                _ => skipped_line(c, lang),
            }
        }));
        FallbackContent::text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::table::CleanedTable;
    use crate::test_support::{cleaned_table, english};

    fn ctx<'a>(table: &'a CleanedTable, config: &'a ReportConfig) -> SectionContext<'a> {
        SectionContext {
            table,
            analysis: None,
            config,
        }
    }

    #[test]
    fn test_describes_usable_columns_and_lists_skipped() {
        let config = english();
        let table = cleaned_table(
            vec![
                ("price", vec!["1", "2", "3", "4", "100"]),
                ("city", vec!["a", "b", "a", "a", "b"]),
            ],
            &config,
        );
        let rich = NumericSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("price: count=5, mean=22, median=3"));
        assert!(rich.body.contains("min=1, max=100"));
        assert!(rich.body.contains("city: column is categorical"));
        let chart = rich.chart.unwrap();
        assert_eq!(chart.kind, ChartKind::Histogram);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.point_count(), config.histogram_bins);
    }

    #[test]
    fn test_currency_units_kept() {
        let config = english();
        let table = cleaned_table(vec![("salary", vec!["₪1,000", "₪3,000"])], &config);
        let rich = NumericSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("mean=₪2,000"));
    }

    #[test]
    fn test_no_usable_numeric_columns() {
        let config = english();
        let table = cleaned_table(
            vec![("one", vec!["5", "", ""]), ("blank", vec!["", "", ""])],
            &config,
        );
        let context = ctx(&table, &config);
        let failure = NumericSection.render_rich(&context).err().unwrap();
        assert!(failure.is_expected());
        let fallback = NumericSection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("No usable numeric columns"));
        assert!(fallback.body.contains("one: only 1 non-missing values"));
        assert!(fallback.body.contains("blank: all values are missing"));
    }

    #[test]
    fn test_overflow_is_computation_failure() {
        let config = english();
        let max = f64::MAX.to_string();
        let table = cleaned_table(vec![("huge", vec![max.as_str(), max.as_str()])], &config);
        let context = ctx(&table, &config);
        let failure = NumericSection.render_rich(&context).err().unwrap();
        assert!(matches!(failure, SectionFailure::Computation(_)));
        let fallback = NumericSection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("Statistics could not be computed"));
        assert!(
            fallback
                .body
                .contains("\nhuge: values overflow the floating point range")
        );
        assert!(!fallback.body.contains("non-missing values"));
    }

    #[test]
    fn test_failed_column_does_not_hide_healthy_ones() {
        let config = english();
        let max = f64::MAX.to_string();
        let table = cleaned_table(
            vec![
                ("price", vec!["1", "2", "3", "4", "100"]),
                ("huge", vec![max.as_str(); 5]),
            ],
            &config,
        );
        let rich = NumericSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("price: count=5, mean=22, median=3"));
        assert!(
            rich.body
                .contains("huge: values overflow the floating point range")
        );
        assert!(!rich.body.contains("non-missing values"));
        let chart = rich.chart.unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "price");
    }
}
