//! Chart collaborator abstraction.
//!
//! Sections describe the chart they want as a [`ChartSpec`] and hand it to
//! a [`ChartRenderer`]. The renderer decides the output format; sections only
//! keep the returned [`ChartRef`].
//!
//! # Implementing a New Renderer
//!
//! 1. Create a new file in `src/charts/` (e.g., `svg.rs`)
//! 2. Implement the [`ChartRenderer`] trait for your renderer struct
//! 3. Export the renderer in `src/charts/mod.rs`
//!
//! # Example
//!
//! ```rust,ignore
//! use sheet_report::charts::VegaLiteChartRenderer;
//!
//! let renderer = VegaLiteChartRenderer::new("out/charts")?;
//! let sections = SectionRenderer::new(&config)
//!     .with_charts(&renderer)
//!     .render_sections(&table, None)?;
//! ```

mod vega;

pub use vega::VegaLiteChartRenderer;

use crate::types::SectionKey;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Chart shapes the sections ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Histogram,
}

/// One panel of a chart: labelled bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

/// What a section wants drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub section: SectionKey,
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<ChartSeries>,
    /// Lay labels out right-to-left.
    pub rtl: bool,
}

impl ChartSpec {
    /// Number of drawable data points across all panels.
    pub fn point_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.iter().filter(|v| v.is_finite()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

/// Where a rendered chart ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRef {
    /// Path or URI of the chart artifact.
    pub location: String,
    /// Name of the renderer that produced it.
    pub renderer: String,
}

/// Trait for chart backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one renderer can serve
/// concurrent report runs.
///
/// # Error Handling
///
/// Any error sends the requesting section to its fallback content; the
/// report itself never fails because of a chart.
pub trait ChartRenderer: Send + Sync {
    /// Render the chart and return a reference to the artifact.
    fn render(&self, spec: &ChartSpec) -> Result<ChartRef>;

    /// Get the renderer name for logging.
    fn name(&self) -> &str;
}
