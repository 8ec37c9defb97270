//! Report sections and the rich/fallback renderer.
//!
//! Every section implements [`ReportSection`] with two paths. The rich path
//! may fail with a [`SectionFailure`]; the fallback path cannot fail and
//! always produces text. [`SectionRenderer`] runs the rich path, attaches a
//! chart when a [`ChartRenderer`] is configured, and switches to the
//! fallback on any failure. Callers always get all seven sections back.

mod categorical;
mod missing;
mod numeric;
mod outliers;
mod preview;
mod recommendations;
mod summary;

use crate::analysis::AnalysisResults;
use crate::charts::{ChartRef, ChartRenderer, ChartSpec};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result, SectionFailure};
use crate::i18n::{Language, MessageKey, text, tr};
use crate::table::{CleanedColumn, CleanedTable};
use crate::types::{ColumnType, SectionKey, SectionResult, TextTable};
use crate::utils::format_percent;
use tracing::{debug, info, warn};

/// Everything a section may read.
pub(crate) struct SectionContext<'a> {
    pub table: &'a CleanedTable,
    pub analysis: Option<&'a AnalysisResults>,
    pub config: &'a ReportConfig,
}

impl SectionContext<'_> {
    pub fn lang(&self) -> Language {
        self.config.language
    }
}

/// Output of a successful rich path.
#[derive(Debug)]
pub(crate) struct RichContent {
    pub body: String,
    pub table: Option<TextTable>,
    pub chart: Option<ChartSpec>,
}

impl RichContent {
    pub fn text(body: String) -> Self {
        Self {
            body,
            table: None,
            chart: None,
        }
    }
}

/// Output of a fallback path.
#[derive(Debug)]
pub(crate) struct FallbackContent {
    pub body: String,
    pub table: Option<TextTable>,
}

impl FallbackContent {
    pub fn text(body: String) -> Self {
        Self { body, table: None }
    }
}

pub(crate) trait ReportSection: Send + Sync {
    fn key(&self) -> SectionKey;

    fn render_rich(&self, ctx: &SectionContext<'_>) -> std::result::Result<RichContent, SectionFailure>;

    /// Must return non-empty text for every table.
    fn render_fallback(&self, ctx: &SectionContext<'_>, failure: &SectionFailure) -> FallbackContent;
}

static SECTIONS: [&dyn ReportSection; 7] = [
    &preview::PreviewSection,
    &missing::MissingValuesSection,
    &categorical::CategoricalSection,
    &numeric::NumericSection,
    &summary::SummarySection,
    &outliers::OutliersSection,
    &recommendations::RecommendationsSection,
];

/// Renders the fixed list of report sections.
pub struct SectionRenderer<'a> {
    config: &'a ReportConfig,
    charts: Option<&'a dyn ChartRenderer>,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            charts: None,
        }
    }

    /// Draw charts through the given renderer. Without one, rich sections
    /// are text-only.
    pub fn with_charts(mut self, renderer: &'a dyn ChartRenderer) -> Self {
        self.charts = Some(renderer);
        self
    }

    /// Render all seven sections in report order.
    ///
    /// Fails only for a table without columns.
    pub fn render_sections(
        &self,
        table: &CleanedTable,
        analysis: Option<&AnalysisResults>,
    ) -> Result<Vec<SectionResult>> {
        if table.column_count() == 0 {
            return Err(ReportError::NoColumns);
        }

        let ctx = SectionContext {
            table,
            analysis,
            config: self.config,
        };

        let results: Vec<SectionResult> = SECTIONS
            .iter()
            .map(|section| self.render_one(*section, &ctx))
            .collect();

        info!(
            "Rendered {} sections ({} fallback)",
            results.len(),
            results.iter().filter(|r| r.is_fallback).count()
        );
        Ok(results)
    }

    fn render_one(&self, section: &dyn ReportSection, ctx: &SectionContext<'_>) -> SectionResult {
        let key = section.key();
        let title = key.title(ctx.lang());

        let attempt = section.render_rich(ctx).and_then(|rich| {
            if rich.body.trim().is_empty() {
                return Err(SectionFailure::insufficient("rich content was empty"));
            }
            let chart = self.draw_chart(&rich)?;
            Ok((rich, chart))
        });

        match attempt {
            Ok((rich, chart)) => SectionResult {
                key,
                title,
                body_text: rich.body,
                table: rich.table,
                chart,
                is_fallback: false,
                fallback_reason: None,
            },
            Err(failure) => {
                if failure.is_expected() {
                    debug!(section = %key, reason = %failure, "Section falling back");
                } else {
                    warn!(section = %key, reason = %failure, "Section falling back");
                }

                let content = match &failure {
                    SectionFailure::ChartFailed { text: body, .. } => FallbackContent::text(format!(
                        "{}\n\n{}",
                        text(ctx.lang(), MessageKey::ChartUnavailable),
                        body
                    )),
                    _ => section.render_fallback(ctx, &failure),
                };

                let body_text = if content.body.trim().is_empty() {
                    tr(
                        ctx.lang(),
                        MessageKey::ComputationFailed,
                        &[("reason", failure.to_string())],
                    )
                } else {
                    content.body
                };

                SectionResult {
                    key,
                    title,
                    body_text,
                    table: content.table,
                    chart: None,
                    is_fallback: true,
                    fallback_reason: Some(failure.to_string()),
                }
            }
        }
    }

    fn draw_chart(&self, rich: &RichContent) -> std::result::Result<Option<ChartRef>, SectionFailure> {
        let (Some(spec), Some(renderer)) = (&rich.chart, self.charts) else {
            return Ok(None);
        };
        if spec.is_empty() {
            return Err(SectionFailure::ChartFailed {
                reason: "chart has no data points".to_string(),
                text: rich.body.clone(),
            });
        }
        renderer
            .render(spec)
            .map(Some)
            .map_err(|e| SectionFailure::ChartFailed {
                reason: format!("{} renderer: {:#}", renderer.name(), e),
                text: rich.body.clone(),
            })
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Why a column cannot feed numeric statistics.
pub(crate) fn skip_reason(column: &CleanedColumn, lang: Language) -> String {
    let non_null = column.non_null_count();
    match column.inferred_type {
        ColumnType::Numeric => tr(
            lang,
            MessageKey::ReasonTooFewValues,
            &[("count", non_null.to_string())],
        ),
        ColumnType::Categorical | ColumnType::Datetime => tr(
            lang,
            MessageKey::ReasonNotNumeric,
            &[("kind", column.inferred_type.label(lang))],
        ),
        ColumnType::Empty => {
            if column.values.is_empty() {
                tr(lang, MessageKey::ReasonTooFewValues, &[("count", "0".to_string())])
            } else if column.missing_count == column.values.len() {
                text(lang, MessageKey::ReasonAllMissing)
            } else if column.unparsable_count > 0 {
                tr(
                    lang,
                    MessageKey::ReasonUnparsable,
                    &[("percent", format_percent(column.unparsable_fraction))],
                )
            } else {
                text(lang, MessageKey::ReasonFreeText)
            }
        }
    }
}

/// `column: reason` line.
pub(crate) fn skipped_line(column: &CleanedColumn, lang: Language) -> String {
    reason_line(column, &skip_reason(column, lang), lang)
}

/// `column: reason` line with a reason the caller already knows, such as a
/// failed computation.
pub(crate) fn reason_line(column: &CleanedColumn, reason: &str, lang: Language) -> String {
    tr(
        lang,
        MessageKey::SkippedColumn,
        &[
            ("column", column.display_name.clone()),
            ("reason", reason.to_string()),
        ],
    )
}

/// Join per-column failures into one `Computation` reason.
pub(crate) fn computation_failure(failed: &[(&CleanedColumn, String)]) -> SectionFailure {
    SectionFailure::Computation(
        failed
            .iter()
            .map(|(column, reason)| format!("{}: {}", column.display_name, reason))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Numbered list, one item per line.
pub(crate) fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, ChartSeries};
    use crate::test_support::{cleaned_table as cleaned, english};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _spec: &ChartSpec) -> anyhow::Result<ChartRef> {
            anyhow::bail!("disk full")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl ChartRenderer for CountingRenderer {
        fn render(&self, spec: &ChartSpec) -> anyhow::Result<ChartRef> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChartRef {
                location: format!("memory://{}", spec.section),
                renderer: "counting".to_string(),
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_seven_sections_in_order() {
        let config = english();
        let table = cleaned(
            vec![
                ("price", vec!["1", "2", "3", "4", "100"]),
                ("city", vec!["a", "b", "a", "a", "b"]),
            ],
            &config,
        );
        let results = SectionRenderer::new(&config)
            .render_sections(&table, None)
            .unwrap();
        let keys: Vec<SectionKey> = results.iter().map(|r| r.key).collect();
        assert_eq!(keys, SectionKey::ALL.to_vec());
        assert!(results.iter().all(|r| !r.body_text.trim().is_empty()));
        assert!(results.iter().all(|r| !r.title.is_empty()));
    }

    #[test]
    fn test_no_columns_is_structural_error() {
        let config = english();
        let table = CleanedTable {
            columns: vec![],
            row_count: 0,
        };
        let result = SectionRenderer::new(&config).render_sections(&table, None);
        assert!(matches!(result, Err(ReportError::NoColumns)));
    }

    #[test]
    fn test_chart_failure_falls_back_with_text() {
        let config = english();
        let table = cleaned(
            vec![("price", vec!["1", "2", "3", "4", "100"])],
            &config,
        );
        let renderer = FailingRenderer;
        let results = SectionRenderer::new(&config)
            .with_charts(&renderer)
            .render_sections(&table, None)
            .unwrap();
        let numeric = &results[3];
        assert_eq!(numeric.key, SectionKey::NumericDistributions);
        assert!(numeric.is_fallback);
        assert!(numeric.chart.is_none());
        assert!(numeric.body_text.contains("chart could not be produced"));
        assert!(numeric.body_text.contains("price"));
        assert!(numeric.fallback_reason.as_deref().unwrap().contains("disk full"));
    }

    #[test]
    fn test_charts_attached_when_renderer_works() {
        let config = english();
        let table = cleaned(
            vec![
                ("price", vec!["1", "2", "", "4", "100"]),
                ("city", vec!["a", "b", "a", "a", "b"]),
            ],
            &config,
        );
        let renderer = CountingRenderer {
            calls: AtomicUsize::new(0),
        };
        let results = SectionRenderer::new(&config)
            .with_charts(&renderer)
            .render_sections(&table, None)
            .unwrap();
        assert!(results[1].chart.is_some(), "missing-values chart");
        assert!(results[2].chart.is_some(), "categorical chart");
        assert!(results[3].chart.is_some(), "histogram");
        assert!(renderer.calls.load(Ordering::SeqCst) >= 3);
        assert!(results[0].chart.is_none());
    }

    #[test]
    fn test_empty_chart_spec_is_a_failure() {
        let config = english();
        let renderer = CountingRenderer {
            calls: AtomicUsize::new(0),
        };
        let section_renderer = SectionRenderer::new(&config).with_charts(&renderer);
        let rich = RichContent {
            body: "text".to_string(),
            table: None,
            chart: Some(ChartSpec {
                section: SectionKey::MissingValues,
                kind: ChartKind::Bar,
                title: "t".to_string(),
                series: vec![ChartSeries::new("s")],
                rtl: false,
            }),
        };
        let result = section_renderer.draw_chart(&rich);
        assert!(matches!(result, Err(SectionFailure::ChartFailed { .. })));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_skip_reasons() {
        let config = english();
        let table = cleaned(
            vec![
                ("blank", vec!["", "", ""]),
                ("notes", vec!["x y", "z w", "q r"]),
                ("one", vec!["5", "", ""]),
            ],
            &config,
        );
        let lang = Language::English;
        assert_eq!(skip_reason(&table.columns[0], lang), "all values are missing");
        assert_eq!(
            skip_reason(&table.columns[1], lang),
            "free text or too many distinct values"
        );
        assert_eq!(skip_reason(&table.columns[2], lang), "only 1 non-missing values");
    }

    #[test]
    fn test_numbered() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(numbered(&items), "1. a\n2. b");
    }
}
