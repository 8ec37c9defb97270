//! Vega-Lite chart output.
//!
//! Each chart is written as a standalone Vega-Lite JSON document that any
//! Vega viewer can draw. Multi-panel charts use a facet over the series name.

use super::{ChartKind, ChartRef, ChartRenderer, ChartSpec};
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Writes `<section>.vl.json` files into an output directory.
#[derive(Debug, Clone)]
pub struct VegaLiteChartRenderer {
    output_dir: PathBuf,
}

impl VegaLiteChartRenderer {
    /// Create the renderer, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create chart directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the Vega-Lite document for a spec.
    pub fn document(spec: &ChartSpec) -> Value {
        let rows: Vec<Value> = spec
            .series
            .iter()
            .flat_map(|s| {
                s.labels
                    .iter()
                    .zip(&s.values)
                    .filter(|(_, v)| v.is_finite())
                    .enumerate()
                    .map(move |(order, (label, value))| {
                        json!({
                            "series": s.name,
                            "label": label,
                            "value": value,
                            "order": order,
                        })
                    })
            })
            .collect();

        let label_angle = match spec.kind {
            ChartKind::Histogram => -45,
            ChartKind::Bar => 0,
        };
        let label_axis = json!({
            "field": "label",
            "type": "nominal",
            "sort": { "field": "order" },
            "title": null,
            "axis": { "labelAngle": label_angle },
        });
        let value_axis = json!({ "field": "value", "type": "quantitative", "title": null });

        let (x, y) = if spec.rtl {
            // Horizontal bars read naturally in right-to-left layouts
            (
                json!({ "field": "value", "type": "quantitative", "title": null, "scale": { "reverse": true } }),
                label_axis,
            )
        } else {
            (label_axis, value_axis)
        };

        let mark = match spec.kind {
            ChartKind::Bar => json!({ "type": "bar" }),
            ChartKind::Histogram => json!({ "type": "bar", "binSpacing": 0 }),
        };

        let inner = json!({
            "mark": mark,
            "encoding": { "x": x, "y": y },
        });

        if spec.series.len() > 1 {
            json!({
                "$schema": VEGA_LITE_SCHEMA,
                "title": spec.title,
                "data": { "values": rows },
                "facet": { "field": "series", "type": "nominal", "title": null },
                "columns": 2,
                "resolve": { "scale": { "x": "independent", "y": "independent" } },
                "spec": inner,
            })
        } else {
            let mut doc = json!({
                "$schema": VEGA_LITE_SCHEMA,
                "title": spec.title,
                "data": { "values": rows },
            });
            if let (Some(obj), Some(inner)) = (doc.as_object_mut(), inner.as_object()) {
                for (k, v) in inner {
                    obj.insert(k.clone(), v.clone());
                }
            }
            doc
        }
    }
}

impl ChartRenderer for VegaLiteChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<ChartRef> {
        if spec.is_empty() {
            bail!("chart '{}' has no data points", spec.title);
        }
        let path = self
            .output_dir
            .join(format!("{}.vl.json", spec.section.as_str()));
        let document = Self::document(spec);
        let content = serde_json::to_string_pretty(&document)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;

        debug!(chart = %path.display(), points = spec.point_count(), "Wrote chart");
        Ok(ChartRef {
            location: path.display().to_string(),
            renderer: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "vega-lite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSeries;
    use crate::types::SectionKey;

    fn spec(series: Vec<ChartSeries>) -> ChartSpec {
        ChartSpec {
            section: SectionKey::CategoricalDistributions,
            kind: ChartKind::Bar,
            title: "Top values".to_string(),
            series,
            rtl: false,
        }
    }

    #[test]
    fn test_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = VegaLiteChartRenderer::new(dir.path()).unwrap();
        let mut series = ChartSeries::new("city");
        series.push("Haifa", 3.0);
        series.push("Tel Aviv", 5.0);

        let chart = renderer.render(&spec(vec![series])).unwrap();
        assert_eq!(chart.renderer, "vega-lite");
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&chart.location).unwrap()).unwrap();
        assert_eq!(written["data"]["values"].as_array().unwrap().len(), 2);
        assert_eq!(written["mark"]["type"], "bar");
    }

    #[test]
    fn test_multiple_series_facet() {
        let mut a = ChartSeries::new("a");
        a.push("x", 1.0);
        let mut b = ChartSeries::new("b");
        b.push("y", 2.0);
        let doc = VegaLiteChartRenderer::document(&spec(vec![a, b]));
        assert_eq!(doc["facet"]["field"], "series");
        assert_eq!(doc["spec"]["mark"]["type"], "bar");
    }

    #[test]
    fn test_empty_spec_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = VegaLiteChartRenderer::new(dir.path()).unwrap();
        assert!(renderer.render(&spec(vec![ChartSeries::new("empty")])).is_err());
    }
}
