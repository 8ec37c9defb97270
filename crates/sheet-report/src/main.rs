//! CLI entry point for the spreadsheet report generator.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use sheet_report::{
    AnalysisResults, ChartRenderer, CleanedTable, DataAnalyzer, Language, RawTable, ReportConfig,
    ReportDocument, ReportGenerator, VegaLiteChartRenderer, preprocess,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Separators tried in order when reading a CSV file.
const SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// CLI-compatible report language enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLanguage {
    /// Hebrew (right-to-left)
    He,
    /// English
    En,
}

impl From<CliLanguage> for Language {
    fn from(cli: CliLanguage) -> Self {
        match cli {
            CliLanguage::He => Language::Hebrew,
            CliLanguage::En => Language::English,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cleans a messy spreadsheet and writes a seven-section report",
    long_about = "Cleans a messy CSV export and builds a report whose seven sections \
                  always carry content.\n\n\
                  EXAMPLES:\n  \
                  # Hebrew report printed to the terminal\n  \
                  sheet-report -i data.csv\n\n  \
                  # English report with charts, saved as JSON\n  \
                  sheet-report -i data.csv --lang en --charts -r -o results/\n\n  \
                  # Machine-readable output\n  \
                  sheet-report -i data.csv --json | jq '.sections[].title'"
)]
struct Args {
    /// Path to the CSV file to report on
    #[arg(short, long)]
    input: String,

    /// Output directory for reports, charts and cleaned data
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Report language
    #[arg(long, value_enum, default_value = "he")]
    lang: CliLanguage,

    /// Read ambiguous dates like 03/04/2024 as month/day
    #[arg(long)]
    month_first: bool,

    /// Number of rows shown in the preview section
    #[arg(long, default_value = "10")]
    preview_rows: usize,

    /// Load precomputed analysis results from a JSON file
    #[arg(long, conflicts_with = "no_analysis")]
    analysis: Option<PathBuf>,

    /// Skip the dataset analysis (recommendations use general advice)
    #[arg(long)]
    no_analysis: bool,

    /// Write Vega-Lite charts into <output>/charts
    #[arg(long)]
    charts: bool,

    /// Write the cleaned table as <input_name>_cleaned.csv
    #[arg(long)]
    emit_cleaned: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the text report
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = ReportConfig::builder()
        .language(args.lang.into())
        .day_first(!args.month_first)
        .preview_rows(args.preview_rows)
        .build()?;

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    let raw = RawTable::from_dataframe(&data)?;
    let table = preprocess(&raw, &config)?;
    let input_stem = extract_file_stem(&args.input);

    if args.emit_cleaned {
        let path = write_cleaned_csv(&table, &args.output, &input_stem)?;
        info!("Cleaned data written to: {}", path.display());
    }

    let analysis = load_analysis(&args, &table, &config)?;

    let renderer = if args.charts {
        Some(VegaLiteChartRenderer::new(Path::new(&args.output).join("charts"))?)
    } else {
        None
    };

    let report = ReportGenerator::build_from_cleaned(
        &args.input,
        &table,
        analysis.as_ref(),
        &config,
        renderer.as_ref().map(|r| r as &dyn ChartRenderer),
    )?;

    handle_report_output(&report, &args, &input_stem)
}

/// Analysis results from `--analysis`, computed, or skipped with `--no-analysis`.
fn load_analysis(
    args: &Args,
    table: &CleanedTable,
    config: &ReportConfig,
) -> Result<Option<AnalysisResults>> {
    if args.no_analysis {
        debug!("Analysis disabled");
        return Ok(None);
    }
    if let Some(ref path) = args.analysis {
        info!("Loading analysis results from: {}", path.display());
        return Ok(Some(AnalysisResults::from_json_file(path)?));
    }
    Ok(Some(DataAnalyzer::new(config).analyze(table)))
}

/// Handle report output based on CLI flags.
///
/// Output behavior:
/// - Default: Print the text report to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file, combinable with either
fn handle_report_output(report: &ReportDocument, args: &Args, input_stem: &str) -> Result<()> {
    if report.fallback_count() > 0 {
        warn!(
            "{} of {} sections used fallback content",
            report.fallback_count(),
            report.sections.len()
        );
    }

    if args.emit_report {
        let generator = ReportGenerator::new(PathBuf::from(&args.output));
        let report_path = generator.write_report_to_file(report, input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.to_plain_text());
    }
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn write_cleaned_csv(table: &CleanedTable, output_dir: &str, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join(format!("{}_cleaned.csv", stem));
    let mut df = table.to_dataframe()?;
    let mut file = File::create(&path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(path)
}

/// Read every column as text so the cleaner sees values as written.
fn read_csv(path: &str, separator: u8) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"')),
        )
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    // Strategy 1: the first separator that splits the header into columns
    let mut first_success = None;
    for separator in SEPARATORS {
        match read_csv(path, separator) {
            Ok(df) if df.width() > 1 => {
                debug!("Loaded with separator {:?}", separator as char);
                return Ok(df);
            }
            Ok(df) => {
                first_success.get_or_insert(df);
            }
            Err(e) => {
                debug!("Loading with separator {:?} failed: {}", separator as char, e);
            }
        }
    }

    // A single-column file is still a valid table
    if let Some(df) = first_success {
        return Ok(df);
    }

    // Strategy 2: pre-clean content
    let content = std::fs::read_to_string(path)?;
    let cleaned = clean_csv_content(&content);
    let cursor = std::io::Cursor::new(cleaned);

    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| anyhow!("Could not parse {}: {}", path, e))
}

/// Clean CSV content
fn clean_csv_content(content: &str) -> String {
    content
        .trim_start_matches('\u{FEFF}')
        .replace("\"\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
