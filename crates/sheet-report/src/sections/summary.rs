use super::numeric::in_unit;
use super::{
    FallbackContent, ReportSection, RichContent, SectionContext, computation_failure, reason_line,
};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::profiler::statistics::Describe;
use crate::types::{ColumnType, SectionKey, TextTable};

/// Describe-style table over the numeric columns.
pub(crate) struct SummarySection;

const HEADER_KEYS: [MessageKey; 9] = [
    MessageKey::LabelColumn,
    MessageKey::LabelCount,
    MessageKey::LabelMean,
    MessageKey::LabelStd,
    MessageKey::LabelMin,
    MessageKey::LabelQ1,
    MessageKey::LabelMedian,
    MessageKey::LabelQ3,
    MessageKey::LabelMax,
];

impl ReportSection for SummarySection {
    fn key(&self) -> SectionKey {
        SectionKey::StatisticalSummary
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let lang = ctx.lang();
        let mut table = TextTable::new(HEADER_KEYS.iter().map(|k| text(lang, *k)).collect());

        let mut failed = Vec::new();
        for column in ctx.table.columns_of(ColumnType::Numeric) {
            let values = column.numbers();
            if values.is_empty() {
                continue;
            }
            let d = match Describe::from_values(&values) {
                Ok(d) => d,
                Err(reason) => {
                    failed.push((column, reason));
                    continue;
                }
            };
            let unit = column.dominant_unit();
            table.push_row(vec![
                column.display_name.clone(),
                d.count.to_string(),
                in_unit(d.mean, unit),
                in_unit(d.std, unit),
                in_unit(d.min, unit),
                in_unit(d.q1, unit),
                in_unit(d.median, unit),
                in_unit(d.q3, unit),
                in_unit(d.max, unit),
            ]);
        }

        if table.rows.is_empty() {
            if !failed.is_empty() {
                return Err(computation_failure(&failed));
            }
            return Err(SectionFailure::insufficient("no numeric columns"));
        }

        let mut body = format!(
            "{}\n\n{}",
            text(lang, MessageKey::SummaryIntro),
            table.render_plain()
        );
        for (column, reason) in &failed {
            body.push('\n');
            body.push_str(&reason_line(column, reason, lang));
        }

        Ok(RichContent {
            body,
            table: Some(table),
            chart: None,
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
        let intro = if ctx.table.columns_of(ColumnType::Numeric).next().is_some() {
            MessageKey::SummaryUnavailableIntro
        } else {
            MessageKey::NonNumericSummaryIntro
        };
        lines.push(text(lang, intro));

        for column in &ctx.table.columns {
            let counts = column.value_counts();
            let top = counts
                .first()
                .map(|(value, count)| format!("{} ({})", value, count))
                .unwrap_or_else(|| text(lang, MessageKey::NoValues));
            lines.push(tr(
                lang,
                MessageKey::NonNumericLine,
                &[
                    ("column", column.display_name.clone()),
                    ("kind", column.inferred_type.label(lang)),
                    ("count", column.non_null_count().to_string()),
                    ("unique", counts.len().to_string()),
                    ("top", top),
                ],
            ));
        }
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
    fn test_describe_table() {
        let config = english();
        let table = cleaned_table(
            vec![
                ("price", vec!["4", "1", "3", "2", "100"]),
                ("city", vec!["a", "b", "a", "a", "b"]),
            ],
            &config,
        );
        let rich = SummarySection.render_rich(&ctx(&table, &config)).unwrap();
        let rendered = rich.table.unwrap();
        assert_eq!(rendered.headers[0], "column");
        assert_eq!(rendered.headers.len(), 9);
        assert_eq!(rendered.rows.len(), 1);
        assert_eq!(
            rendered.rows[0],
            vec!["price", "5", "22", "43.62", "1", "2", "3", "4", "100"]
        );
        assert!(rich.body.starts_with("Descriptive statistics"));
    }

    #[test]
    fn test_failed_column_listed_under_table() {
        let config = english();
        let max = f64::MAX.to_string();
        let table = cleaned_table(
            vec![
                ("price", vec!["4", "1", "3", "2", "100"]),
                ("huge", vec![max.as_str(); 5]),
            ],
            &config,
        );
        let rich = SummarySection.render_rich(&ctx(&table, &config)).unwrap();
        assert_eq!(rich.table.unwrap().rows.len(), 1);
        assert!(
            rich.body
                .ends_with("huge: values overflow the floating point range")
        );
    }

    #[test]
    fn test_all_columns_failing_fallback_does_not_claim_no_numeric() {
        let config = english();
        let max = f64::MAX.to_string();
        let table = cleaned_table(vec![("huge", vec![max.as_str(); 3])], &config);
        let context = ctx(&table, &config);
        let failure = SummarySection.render_rich(&context).err().unwrap();
        assert!(matches!(failure, SectionFailure::Computation(_)));
        let fallback = SummarySection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("Statistics could not be computed"));
        assert!(fallback.body.contains("Numeric statistics are unavailable"));
        assert!(!fallback.body.contains("No numeric columns"));
        assert!(fallback.body.contains("huge (numeric)"));
    }

    #[test]
    fn test_non_numeric_fallback() {
        let config = english();
        let table = cleaned_table(
            vec![
                ("city", vec!["a", "b", "a", "a"]),
                ("blank", vec!["", "", "", ""]),
            ],
            &config,
        );
        let context = ctx(&table, &config);
        let failure = SummarySection.render_rich(&context).err().unwrap();
        let fallback = SummarySection.render_fallback(&context, &failure);
        assert!(fallback.body.starts_with("No numeric columns"));
        assert!(fallback.body.contains(
            "city (categorical): 4 values, 2 unique, most frequent: a (3)"
        ));
        assert!(fallback.body.contains(
            "blank (unusable): 0 values, 0 unique, most frequent: no values"
        ));
    }
}
