use crate::analysis::AnalysisResults;
use crate::charts::ChartRenderer;
use crate::config::ReportConfig;
use crate::error::{ReportError, Result, ResultExt};
use crate::i18n::Language;
use crate::profiler::TablePreprocessor;
use crate::sections::SectionRenderer;
use crate::table::{CleanedColumn, CleanedTable, RawTable};
use crate::types::{ColumnType, SectionResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// A complete report: metadata, column overview and the seven sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Name of the input the table came from
    pub input_file: String,
    pub language: Language,
    /// Shape of the cleaned table (rows, columns)
    pub shape: (usize, usize),
    pub columns: Vec<ColumnSummary>,
    /// Dataset-level insights from the analysis, when one was supplied
    pub insights: Vec<String>,
    pub sections: Vec<SectionResult>,
}

/// Per-column overview of what preprocessing found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub display_name: String,
    pub inferred_type: ColumnType,
    pub missing_count: usize,
    pub unparsable_count: usize,
    pub missing_percentage: f64,
    pub distinct_count: usize,
}

impl From<&CleanedColumn> for ColumnSummary {
    fn from(column: &CleanedColumn) -> Self {
        Self {
            name: column.name.clone(),
            display_name: column.display_name.clone(),
            inferred_type: column.inferred_type,
            missing_count: column.missing_count,
            unparsable_count: column.unparsable_count,
            missing_percentage: column.missing_fraction * 100.0,
            distinct_count: column.distinct_count(),
        }
    }
}

impl ReportDocument {
    /// Number of sections that had to use their fallback content.
    pub fn fallback_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_fallback).count()
    }

    /// Readable rendering for terminals.
    pub fn to_plain_text(&self) -> String {
        let rule = "=".repeat(80);
        let mut out = vec![
            rule.clone(),
            format!("{} ({} x {})", self.input_file, self.shape.0, self.shape.1),
            format!("Generated: {}", self.generated_at),
            rule.clone(),
        ];

        if !self.insights.is_empty() {
            out.push(String::new());
            out.extend(self.insights.iter().map(|i| format!("* {}", i)));
        }

        for section in &self.sections {
            out.push(String::new());
            out.push(section.title.clone());
            out.push("-".repeat(section.title.chars().count().max(3)));
            out.push(section.body_text.clone());
        }
        out.push(rule);
        out.join("\n")
    }
}

// ============================================================================
// Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Preprocess a raw table and build its report.
    pub fn build(
        input_name: &str,
        raw: &RawTable,
        analysis: Option<&AnalysisResults>,
        config: &ReportConfig,
        charts: Option<&dyn ChartRenderer>,
    ) -> Result<ReportDocument> {
        let table = TablePreprocessor::new(config).preprocess(raw)?;
        Self::build_from_cleaned(input_name, &table, analysis, config, charts)
    }

    /// Build a report from a table that is already preprocessed.
    pub fn build_from_cleaned(
        input_name: &str,
        table: &CleanedTable,
        analysis: Option<&AnalysisResults>,
        config: &ReportConfig,
        charts: Option<&dyn ChartRenderer>,
    ) -> Result<ReportDocument> {
        let mut renderer = SectionRenderer::new(config);
        if let Some(charts) = charts {
            renderer = renderer.with_charts(charts);
        }
        let sections = renderer.render_sections(table, analysis)?;

        Ok(ReportDocument {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_name.to_string(),
            language: config.language,
            shape: (table.row_count, table.column_count()),
            columns: table.columns.iter().map(ColumnSummary::from).collect(),
            insights: analysis.map(|a| a.insights.clone()).unwrap_or_default(),
            sections,
        })
    }

    /// Write the report as pretty JSON to `<output_dir>/<stem>_report.json`.
    pub fn write_report_to_file(&self, report: &ReportDocument, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .map_err(ReportError::from)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self.output_dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawColumn;
    use crate::test_support::english;
    use crate::types::{RawCell, SectionKey};

    fn raw_table() -> RawTable {
        RawTable::new(vec![
            RawColumn::new(
                "Salary",
                ["₪8,500", "(₪500)", "", "₪1,200"]
                    .into_iter()
                    .map(RawCell::from)
                    .collect(),
            ),
            RawColumn::new(
                "City",
                ["a", "b", "a", "a"].into_iter().map(RawCell::from).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_document() {
        let config = english();
        let report = ReportGenerator::build("demo.csv", &raw_table(), None, &config, None).unwrap();
        assert_eq!(report.shape, (4, 2));
        assert_eq!(report.sections.len(), 7);
        assert_eq!(report.sections[6].key, SectionKey::Recommendations);
        assert!(report.sections[6].is_fallback);
        assert_eq!(report.columns[0].inferred_type, ColumnType::Numeric);
        assert_eq!(report.columns[0].missing_count, 1);
        assert!((report.columns[0].missing_percentage - 25.0).abs() < 1e-9);
        assert!(report.fallback_count() >= 1);
    }

    #[test]
    fn test_plain_text_has_every_title() {
        let config = english();
        let report = ReportGenerator::build("demo.csv", &raw_table(), None, &config, None).unwrap();
        let text = report.to_plain_text();
        for section in &report.sections {
            assert!(text.contains(&section.title));
        }
        assert!(text.contains("demo.csv (4 x 2)"));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = english();
        let report = ReportGenerator::build("demo.csv", &raw_table(), None, &config, None).unwrap();
        let generator = ReportGenerator::new(dir.path().join("reports"));
        let path = generator.write_report_to_file(&report, "demo").unwrap();
        assert!(path.ends_with("demo_report.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["sections"].as_array().unwrap().len(), 7);
        assert_eq!(parsed["language"], "en");
    }
}
