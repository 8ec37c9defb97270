use super::{FallbackContent, ReportSection, RichContent, SectionContext, numbered};
use crate::analysis::{AnalysisResults, TrendDirection};
use crate::error::SectionFailure;
use crate::i18n::{MessageKey, text, tr};
use crate::types::{ColumnType, SectionKey};
use crate::utils::{format_coefficient, format_percent};

/// Numbered advice drawn from analysis findings and table metadata.
pub(crate) struct RecommendationsSection;

const MAX_CORRELATION_BULLETS: usize = 5;
const SMALL_DATASET_ROWS: usize = 30;
const LARGE_DATASET_ROWS: usize = 100_000;
const MANY_COLUMNS: usize = 50;

impl RecommendationsSection {
    fn display_name(ctx: &SectionContext<'_>, identifier: &str) -> String {
        ctx.table
            .find_column(identifier)
            .map(|c| c.display_name.clone())
            .unwrap_or_else(|| identifier.to_string())
    }

    fn analysis_bullets(ctx: &SectionContext<'_>, analysis: &AnalysisResults) -> Vec<String> {
        let lang = ctx.lang();
        let mut bullets = Vec::new();

        if let Some(duplicates) = analysis.duplicate_rows.filter(|d| *d > 0) {
            bullets.push(tr(
                lang,
                MessageKey::RecDuplicates,
                &[("count", duplicates.to_string())],
            ));
        }

        for pair in analysis
            .strong_correlations
            .iter()
            .take(MAX_CORRELATION_BULLETS)
        {
            bullets.push(tr(
                lang,
                MessageKey::RecStrongCorrelation,
                &[
                    ("first", Self::display_name(ctx, &pair.first)),
                    ("second", Self::display_name(ctx, &pair.second)),
                    ("value", format_coefficient(pair.coefficient)),
                ],
            ));
        }

        for (column, skew) in &analysis.skewness {
            if skew.abs() > ctx.config.skew_threshold {
                bullets.push(tr(
                    lang,
                    MessageKey::RecSkewed,
                    &[
                        ("column", Self::display_name(ctx, column)),
                        ("value", format_coefficient(*skew)),
                    ],
                ));
            }
        }

        for (column, rows) in &analysis.outliers {
            if !rows.is_empty() {
                bullets.push(tr(
                    lang,
                    MessageKey::RecOutliers,
                    &[
                        ("column", Self::display_name(ctx, column)),
                        ("count", rows.len().to_string()),
                    ],
                ));
            }
        }

        match analysis.trend {
            Some(TrendDirection::Up) => bullets.push(text(lang, MessageKey::RecTrendUp)),
            Some(TrendDirection::Down) => bullets.push(text(lang, MessageKey::RecTrendDown)),
            Some(TrendDirection::Flat) | None => {}
        }

        bullets
    }

    /// Advice that needs nothing beyond the cleaned table.
    fn metadata_bullets(ctx: &SectionContext<'_>) -> Vec<String> {
        let lang = ctx.lang();
        let config = ctx.config;
        let table = ctx.table;
        let mut bullets = Vec::new();

        for column in &table.columns {
            let name = column.display_name.clone();
            if column.inferred_type == ColumnType::Empty {
                bullets.push(tr(lang, MessageKey::RecEmptyColumn, &[("column", name)]));
                continue;
            }
            if column.missing_fraction >= config.high_missing_threshold {
                bullets.push(tr(
                    lang,
                    MessageKey::RecHighMissingColumn,
                    &[
                        ("column", name.clone()),
                        ("percent", format_percent(column.missing_fraction)),
                    ],
                ));
            } else if column.missing_count > 0 {
                bullets.push(tr(
                    lang,
                    MessageKey::RecMissingColumn,
                    &[
                        ("column", name.clone()),
                        ("percent", format_percent(column.missing_fraction)),
                    ],
                ));
            }
            if column.unparsable_count > 0 {
                bullets.push(tr(
                    lang,
                    MessageKey::RecUnparsable,
                    &[
                        ("column", name.clone()),
                        ("percent", format_percent(column.unparsable_fraction)),
                    ],
                ));
            }
            if column.unit_counts.mixes_percent_and_plain() {
                bullets.push(tr(lang, MessageKey::RecPercentMixed, &[("column", name)]));
            }
        }

        let rows = table.row_count;
        if rows > 0 && rows < SMALL_DATASET_ROWS {
            bullets.push(tr(
                lang,
                MessageKey::RecSmallDataset,
                &[("rows", rows.to_string())],
            ));
        } else if rows > LARGE_DATASET_ROWS {
            bullets.push(tr(
                lang,
                MessageKey::RecLargeDataset,
                &[("rows", rows.to_string())],
            ));
        }
        if table.column_count() > MANY_COLUMNS {
            bullets.push(tr(
                lang,
                MessageKey::RecManyColumns,
                &[("columns", table.column_count().to_string())],
            ));
        }

        bullets
    }
}

impl ReportSection for RecommendationsSection {
    fn key(&self) -> SectionKey {
        SectionKey::Recommendations
    }

    fn render_rich(&self, ctx: &SectionContext<'_>) -> Result<RichContent, SectionFailure> {
        let analysis = match ctx.analysis {
            Some(a) if !a.is_empty() => a,
            Some(_) => return Err(SectionFailure::insufficient("analysis results are empty")),
            None => return Err(SectionFailure::insufficient("no analysis results")),
        };

        let lang = ctx.lang();
        let mut bullets = Self::analysis_bullets(ctx, analysis);
        bullets.extend(Self::metadata_bullets(ctx));
        bullets.push(text(lang, MessageKey::RecCheckQuality));
        bullets.push(text(lang, MessageKey::RecVisualize));

        Ok(RichContent::text(numbered(&bullets)))
    }

    fn render_fallback(&self, ctx: &SectionContext<'_>, _failure: &SectionFailure) -> FallbackContent {
        let lang = ctx.lang();
        let mut bullets = Self::metadata_bullets(ctx);
        bullets.extend(
            [
                MessageKey::RecCheckQuality,
                MessageKey::RecBackup,
                MessageKey::RecDocument,
                MessageKey::RecVisualize,
            ]
            .into_iter()
            .map(|key| text(lang, key)),
        );
        FallbackContent::text(numbered(&bullets))
    }
}
