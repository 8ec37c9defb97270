use super::{FallbackContent, ReportSection, RichContent, SectionContext};
use crate::charts::{ChartKind, ChartSeries, ChartSpec};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::types::SectionKey;
use crate::utils::format_percent;

/// Per-column missing and unparsable counts.
pub(crate) struct MissingValuesSection;

impl MissingValuesSection {
    fn missing_lines(ctx: &SectionContext<'_>) -> Vec<String> {
        ctx.table
            .columns
            .iter()
            .filter(|c| c.missing_count > 0)
            .map(|c| {
                tr(
                    ctx.lang(),
                    MessageKey::MissingLine,
                    &[
                        ("column", c.display_name.clone()),
                        ("count", c.missing_count.to_string()),
                        ("percent", format_percent(c.missing_fraction)),
                    ],
                )
            })
            .collect()
    }

    fn unparsable_lines(ctx: &SectionContext<'_>) -> Vec<String> {
        ctx.table
            .columns
            .iter()
            .filter(|c| c.unparsable_count > 0)
            .map(|c| {
                tr(
                    ctx.lang(),
                    MessageKey::UnparsableLine,
                    &[
                        ("column", c.display_name.clone()),
                        ("count", c.unparsable_count.to_string()),
                        ("percent", format_percent(c.unparsable_fraction)),
                    ],
                )
            })
            .collect()
    }
}

impl ReportSection for MissingValuesSection {
    fn key(&self) -> SectionKey {
        SectionKey::MissingValues
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let table = ctx.table;
        if table.row_count == 0 {
            return Err(SectionFailure::insufficient("table has no rows"));
        }
        let total = table.total_missing_cells();
        if total == 0 {
            return Err(SectionFailure::insufficient("no missing values"));
        }

        let lang = ctx.lang();
        let mut lines = vec![text(lang, MessageKey::MissingFound)];
        lines.extend(Self::missing_lines(ctx));
        lines.extend(Self::unparsable_lines(ctx));
        lines.push(String::new());
        lines.push(tr(
            lang,
            MessageKey::MissingTotal,
            &[
                ("count", total.to_string()),
                ("cells", table.total_cells().to_string()),
                (
                    "percent",
                    format_percent(total as f64 / table.total_cells() as f64),
                ),
            ],
        ));

        let mut series = ChartSeries::new(text(lang, MessageKey::ChartMissing));
        for column in table.columns.iter().filter(|c| c.missing_count > 0) {
            series.push(column.display_name.clone(), column.missing_count as f64);
        }

        Ok(RichContent {
            body: lines.join("\n"),
            table: None,
            chart: Some(ChartSpec {
                section: self.key(),
                kind: ChartKind::Bar,
                title: text(lang, MessageKey::ChartMissing),
                series: vec![series],
                rtl: lang.is_rtl(),
            }),
        })
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, _failure: &SectionFailure) -> FallbackContent {
        let lang = ctx.lang();
        if ctx.table.row_count == 0 {
            return FallbackContent::text(text(lang, MessageKey::EmptyTableNothingMissing));
        }

        // Unparsable values are not missing but still worth reporting here.
        let mut lines = vec![text(lang, MessageKey::NoMissing)];
        lines.extend(Self::unparsable_lines(ctx));
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
    fn test_missing_lines_and_total() {
        let config = english();
        let table = cleaned_table(
            vec![
                ("price", vec!["10", "", "30", "n/a"]),
                ("city", vec!["a", "b", "a", "b"]),
            ],
            &config,
        );
        let rich = MissingValuesSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("price: 2 missing (50.0%)"));
        assert!(!rich.body.contains("city:"));
        assert!(rich.body.contains("Total missing: 2 of 8 cells (25.0%)"));

        let chart = rich.chart.unwrap();
        assert_eq!(chart.series[0].labels, vec!["price".to_string()]);
        assert_eq!(chart.series[0].values, vec![2.0]);
    }

    #[test]
    fn test_header_with_braces_kept_verbatim() {
        let config = english();
        let table = cleaned_table(vec![("{count} total", vec!["1", "", "3", "4"])], &config);
        let rich = MissingValuesSection.render_rich(&ctx(&table, &config)).unwrap();
        assert!(rich.body.contains("{count} total: 1 missing (25.0%)"));
        assert!(!rich.body.contains("1 total"));
    }

    #[test]
    fn test_no_missing_falls_back_with_unparsable_lines() {
        let config = english();
        let table = cleaned_table(vec![("price", vec!["10", "abc", "30", "40"])], &config);
        let context = ctx(&table, &config);
        let failure = MissingValuesSection.render_rich(&context).err().unwrap();
        assert!(failure.is_expected());
        let fallback = MissingValuesSection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("No missing values detected"));
        assert!(fallback.body.contains("price: 1 unparsable values (25.0%)"));
    }

    #[test]
    fn test_empty_table_fallback() {
        let config = english();
        let table = cleaned_table(vec![("a", vec![])], &config);
        let context = ctx(&table, &config);
        let failure = MissingValuesSection.render_rich(&context).err().unwrap();
        let fallback = MissingValuesSection.render_fallback(&context, &failure);
        assert_eq!(
            fallback.body,
            "The table is empty - there are no values to check"
        );
    }
}
