use super::{FallbackContent, ReportSection, RichContent, SectionContext};
use crate::charts::{ChartKind, ChartSeries, ChartSpec};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::table::CleanedColumn;
use crate::types::{ColumnType, SectionKey};
use crate::utils::format_percent;

/// Value frequencies of the categorical columns.
pub(crate) struct CategoricalSection;

fn category_line(ctx: &SectionContext<'_>, value: String, count: usize, total: usize) -> String {
    tr(
        ctx.lang(),
        MessageKey::CategoryLine,
        &[
            ("value", value),
            ("count", count.to_string()),
            ("percent", format_percent(count as f64 / total as f64)),
        ],
    )
}

impl CategoricalSection {
    /// Categorical columns with at least two distinct values.
    fn varied_columns<'a>(ctx: &SectionContext<'a>) -> Vec<&'a CleanedColumn> {
        ctx.table
            .columns_of(ColumnType::Categorical)
            .filter(|c| c.distinct_count() >= 2)
            .collect()
    }

    fn column_block(ctx: &SectionContext<'_>, column: &CleanedColumn) -> String {
        let counts = column.value_counts();
        let total = column.non_null_count();
        let top = ctx.config.top_categories;

        let mut lines = vec![tr(
            ctx.lang(),
            MessageKey::CategoricalColumnHeader,
            &[
                ("column", column.display_name.clone()),
                ("unique", counts.len().to_string()),
            ],
        )];
        for (value, count) in counts.iter().take(top) {
            lines.push(category_line(ctx, value.clone(), *count, total));
        }
        let rest: usize = counts.iter().skip(top).map(|(_, c)| c).sum();
        if rest > 0 {
            lines.push(category_line(
                ctx,
                text(ctx.lang(), MessageKey::OtherValues),
                rest,
                total,
            ));
        }
        lines.join("\n")
    }
}

impl ReportSection for CategoricalSection {
    fn key(&self) -> SectionKey {
        SectionKey::CategoricalDistributions
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let columns = Self::varied_columns(ctx);
        if columns.is_empty() {
            return Err(SectionFailure::insufficient(
                "no categorical column with two or more values",
            ));
        }

        let lang = ctx.lang();
        let mut blocks = vec![text(lang, MessageKey::CategoricalIntro)];
        blocks.extend(columns.iter().map(|c| Self::column_block(ctx, c)));

        let series = columns
            .iter()
            .take(ctx.config.max_chart_columns)
            .map(|column| {
                let mut series = ChartSeries::new(column.display_name.clone());
                for (value, count) in column.value_counts().into_iter().take(ctx.config.top_categories) {
                    series.push(value, count as f64);
                }
                series
            })
            .collect();

        Ok(RichContent {
            body: blocks.join("\n\n"),
            table: None,
            chart: Some(ChartSpec {
                section: self.key(),
                kind: ChartKind::Bar,
                title: text(lang, MessageKey::ChartCategorical),
                series,
                rtl: lang.is_rtl(),
            }),
        })
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, _failure: &SectionFailure) -> FallbackContent {
        let lang = ctx.lang();
        let mut lines = vec![text(lang, MessageKey::NoCategorical)];

        let single: Vec<String> = ctx
            .table
            .columns_of(ColumnType::Categorical)
            .filter(|c| c.distinct_count() == 1)
            .map(|c| c.display_name.clone())
            .collect();
        if !single.is_empty() {
            lines.push(tr(
                lang,
                MessageKey::CategoricalSingleValue,
                &[("columns", single.join(", "))],
            ));
        }
        FallbackContent::text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::i18n::Language;
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
    fn test_frequencies_with_other_bucket() {
        let config = ReportConfig::builder()
            .language(Language::English)
            .top_categories(2)
            .build()
            .unwrap();
        let table = cleaned_table(
            vec![(
                "city",
                vec!["a", "a", "a", "b", "b", "c", "d", "a", "b", "a"],
            )],
            &config,
        );
        let rich = CategoricalSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("city (4 unique values):"));
        assert!(rich.body.contains("  a: 5 (50.0%)"));
        assert!(rich.body.contains("  b: 3 (30.0%)"));
        assert!(rich.body.contains("  Other: 2 (20.0%)"));

        let chart = rich.chart.unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].labels, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_single_value_columns_fall_back() {
        let config = english();
        let table = cleaned_table(vec![("status", vec!["on", "on", "on", "on"])], &config);
        let context = ctx(&table, &config);
        let failure = CategoricalSection.render_rich(&context).err().unwrap();
        let fallback = CategoricalSection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("No categorical columns detected"));
        assert!(fallback.body.contains("Columns holding a single value only: status"));
    }

    #[test]
    fn test_numeric_only_table_falls_back() {
        let config = english();
        let table = cleaned_table(vec![("n", vec!["1", "2", "3"])], &config);
        let context = ctx(&table, &config);
        assert!(CategoricalSection.render_rich(&context).is_err());
        let fallback = CategoricalSection.render_fallback(&context, &SectionFailure::insufficient("x"));
        assert_eq!(fallback.body, "No categorical columns detected");
    }
}
