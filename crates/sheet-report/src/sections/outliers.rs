use super::numeric::in_unit;
use super::{
    FallbackContent, ReportSection, RichContent, SectionContext, computation_failure, reason_line,
    skipped_line,
};
use crate::analysis::OutlierDetector;
use crate::charts::{ChartKind, ChartSeries, ChartSpec};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::table::CleanedColumn;
use crate::types::{ColumnType, SectionKey};
use crate::utils::format_percent;

/// IQR outliers per numeric column.
pub(crate) struct OutliersSection;

/// Share of outlying values above which the column gets a warning.
const WARNING_FRACTION: f64 = 0.1;

impl OutliersSection {
    fn too_few_line(ctx: &SectionContext<'_>, column: &CleanedColumn, min: usize) -> String {
        tr(
            ctx.lang(),
            MessageKey::OutlierTooFew,
            &[
                ("column", column.display_name.clone()),
                ("count", column.numbers().len().to_string()),
                ("min", min.to_string()),
            ],
        )
    }

    /// Report lines and outlier count, or the reason the fences failed.
    fn column_block(
        ctx: &SectionContext<'_>,
        detector: &OutlierDetector,
        column: &CleanedColumn,
    ) -> Result<(String, usize), String> {
        let lang = ctx.lang();
        let Some(found) = detector.detect(column) else {
            return Ok((Self::too_few_line(ctx, column, detector.min_values()), 0));
        };
        let fences = found.fences;
        if !fences.lower.is_finite() || !fences.upper.is_finite() {
            return Err("outlier range is not finite".to_string());
        }

        let unit = column.dominant_unit();
        let low = in_unit(fences.lower, unit);
        let high = in_unit(fences.upper, unit);

        if found.count() == 0 {
            let line = tr(
                lang,
                MessageKey::NoOutliersColumn,
                &[
                    ("column", column.display_name.clone()),
                    ("low", low),
                    ("high", high),
                ],
            );
            return Ok((line, 0));
        }

        let mut lines = vec![tr(
            lang,
            MessageKey::OutlierLine,
            &[
                ("column", column.display_name.clone()),
                ("count", found.count().to_string()),
                ("percent", format_percent(found.fraction())),
                ("low", low),
                ("high", high),
            ],
        )];

        let limit = ctx.config.max_listed_outliers;
        let mut listed: Vec<String> = found
            .values
            .iter()
            .take(limit)
            .map(|v| in_unit(*v, unit))
            .collect();
        if found.count() > limit {
            listed.push("...".to_string());
        }
        lines.push(tr(
            lang,
            MessageKey::OutlierValues,
            &[("values", listed.join(", "))],
        ));

        if found.fraction() > WARNING_FRACTION {
            lines.push(format!("  {}", text(lang, MessageKey::OutlierWarning)));
        }
        Ok((lines.join("\n"), found.count()))
    }
}

impl ReportSection for OutliersSection {
    fn key(&self) -> SectionKey {
        SectionKey::Outliers
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let detector = OutlierDetector::new(ctx.config);
        let min = detector.min_values();
        let (eligible, too_few): (Vec<&CleanedColumn>, Vec<&CleanedColumn>) = ctx
            .table
            .columns_of(ColumnType::Numeric)
            .partition(|c| c.numbers().len() >= min);
        if eligible.is_empty() {
            return Err(SectionFailure::insufficient(format!(
                "no numeric column with {} or more values",
                min
            )));
        }

        let lang = ctx.lang();
        let mut blocks = vec![text(lang, MessageKey::OutliersIntro)];
        let mut series = ChartSeries::new(text(lang, MessageKey::ChartOutliers));
        let mut failed = Vec::new();
        for column in eligible {
            match Self::column_block(ctx, &detector, column) {
                Ok((block, count)) => {
                    blocks.push(block);
                    if count > 0 {
                        series.push(column.display_name.clone(), count as f64);
                    }
                }
                Err(reason) => failed.push((column, reason)),
            }
        }
        // Only the intro: every eligible column failed
        if blocks.len() == 1 {
            return Err(computation_failure(&failed));
        }
        blocks.extend(failed.iter().map(|(c, reason)| reason_line(c, reason, lang)));
        blocks.extend(too_few.iter().map(|c| Self::too_few_line(ctx, c, min)));

        let chart = (!series.values.is_empty()).then(|| ChartSpec {
            section: self.key(),
            kind: ChartKind::Bar,
            title: text(lang, MessageKey::ChartOutliers),
            series: vec![series],
            rtl: lang.is_rtl(),
        });

        Ok(RichContent {
            body: blocks.join("\n"),
            table: None,
            chart,
        })
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, failure: &SectionFailure) -> FallbackContent {
        let lang = ctx.lang();
        let detector = OutlierDetector::new(ctx.config);
        let mut lines = Vec::new();
        if let SectionFailure::Computation(reason) = failure {
            lines.push(tr(
                lang,
                MessageKey::ComputationFailed,
                &[("reason", reason.clone())],
            ));
        }

        let numeric: Vec<&CleanedColumn> = ctx.table.columns_of(ColumnType::Numeric).collect();
        if numeric.is_empty() {
            lines.push(format!(
                "{} - {}",
                text(lang, MessageKey::OutliersInsufficient),
                text(lang, MessageKey::OutlierNoNumeric)
            ));
            lines.extend(
                ctx.table
                    .columns_of(ColumnType::Empty)
                    .map(|c| skipped_line(c, lang)),
            );
        } else {
            lines.push(text(lang, MessageKey::OutliersInsufficient));
            lines.extend(
                numeric
                    .iter()
                    .map(|c| match Self::column_block(ctx, &detector, c) {
                        Ok((block, _)) => block,
                        Err(reason) => reason_line(c, &reason, lang),
                    }),
            );
        }
        FallbackContent::text(lines.join("\n"))
    }
}
