use super::{FallbackContent, ReportSection, RichContent, SectionContext};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, tr};
use crate::types::{SectionKey, TextTable};

/// First rows of the cleaned table.
pub(crate) struct PreviewSection;

impl PreviewSection {
    fn shape_line(ctx: &SectionContext<'_>) -> String {
        tr(
            ctx.lang(),
            MessageKey::PreviewShape,
            &[
                ("rows", ctx.table.row_count.to_string()),
                ("columns", ctx.table.column_count().to_string()),
            ],
        )
    }

    fn headers(ctx: &SectionContext<'_>) -> Vec<String> {
        ctx.table
            .columns
            .iter()
            .map(|c| c.display_name.clone())
            .collect()
    }
}

impl ReportSection for PreviewSection {
    fn key(&self) -> SectionKey {
        SectionKey::Preview
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let rows = ctx.table.row_count;
        if rows == 0 {
            return Err(SectionFailure::insufficient("table has no rows"));
        }

        let shown = rows.min(ctx.config.preview_rows);
        let mut table = TextTable::new(Self::headers(ctx));
        for row in 0..shown {
            table.push_row(
                ctx.table
                    .columns
                    .iter()
                    .map(|c| {
                        c.values
                            .get(row)
                            .and_then(|v| v.as_ref())
                            .map(|v| v.to_string())
                            .unwrap_or_default()
                    })
                    .collect(),
            );
        }

        let body = format!(
            "{}\n{}\n\n{}",
            Self::shape_line(ctx),
            tr(
                ctx.lang(),
                MessageKey::PreviewFirstRows,
                &[("count", shown.to_string())]
            ),
            table.render_plain()
        );

        Ok(RichContent {
            body,
            table: Some(table),
            chart: None,
        })
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, _failure: &SectionFailure) -> FallbackContent {
        let body = format!(
            "{}\n{}",
            tr(
                ctx.lang(),
                MessageKey::PreviewEmpty,
                &[("columns", Self::headers(ctx).join(", "))]
            ),
            Self::shape_line(ctx)
        );
        FallbackContent {
            body,
            table: Some(TextTable::new(Self::headers(ctx))),
        }
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
    fn test_preview_limits_rows() {
        let config = ReportConfig::builder()
            .language(Language::English)
            .preview_rows(2)
            .build()
            .unwrap();
        let table = cleaned_table(vec![("name", vec!["a", "b", "c"])], &config);
        let rich = PreviewSection.render_rich(&ctx(&table, &config)).unwrap();
        let rendered = rich.table.unwrap();
        assert_eq!(rendered.rows.len(), 2);
        assert!(rich.body.contains("Data shape: 3 rows, 1 columns"));
        assert!(rich.body.contains("First 2 rows"));
    }

    #[test]
    fn test_missing_cells_render_blank() {
        let config = ReportConfig::default();
        let table = cleaned_table(vec![("amount", vec!["₪8,500", ""])], &config);
        let rich = PreviewSection.render_rich(&ctx(&table, &config)).unwrap();
        let rendered = rich.table.unwrap();
        assert_eq!(rendered.rows[0], vec!["₪8,500".to_string()]);
        assert_eq!(rendered.rows[1], vec![String::new()]);
    }

    #[test]
    fn test_empty_table_fallback() {
        let config = english();
        let table = cleaned_table(vec![("a", vec![]), ("b", vec![])], &config);
        let context = ctx(&table, &config);
        let failure = PreviewSection.render_rich(&context).err().unwrap();
        let fallback = PreviewSection.render_fallback(&context, &failure);
        assert!(fallback.body.contains("The table is empty"));
        assert!(fallback.body.contains("a, b"));
    }
}
