//! Numeric series for the external chart renderer.
//!
//! Nothing here draws. Each [`Chart`] carries exactly what one picture needs
//! (a title, the two legend entries or the variant names, the bar heights
//! and the x-axis labels) and a [`ChartSink`] hands it over.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::aggregate::OverallStat;
use crate::align::AlignedCategory;
use crate::compare::{NormalizedComparison, VariantSeries};
use crate::percentage::CategoryPercentages;
use crate::Map;

pub const LEGEND: [&str; 2] = ["Encode", "Decode"];
pub const OVERALL_ID: &str = "overall";

/// Paired encode/decode bars per algorithm. `None` marks a bar the renderer
/// should print as `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesChart {
    pub id: String,
    pub title: String,
    pub legend: [&'static str; 2],
    pub encode: Vec<Option<f64>>,
    pub decode: Vec<Option<f64>>,
    pub names: Vec<String>,
}

/// One bar group per subject, one bar per variant, relative to `baseline`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub id: String,
    pub title: String,
    pub baseline: String,
    pub subjects: Vec<String>,
    pub series: Vec<VariantSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum Chart {
    Category(SeriesChart),
    Overall(SeriesChart),
    Comparison(ComparisonChart),
}

impl Chart {
    pub fn category(aligned: &AlignedCategory, percentages: &CategoryPercentages) -> Self {
        let bars =
            |values: &[f64]| -> Vec<Option<f64>> { values.iter().copied().map(Some).collect() };
        Chart::Category(SeriesChart {
            id: aligned.category.clone(),
            title: aligned.title().to_owned(),
            legend: LEGEND,
            encode: bars(percentages.encode.as_slice()),
            decode: bars(percentages.decode.as_slice()),
            names: aligned.algorithms.clone(),
        })
    }

    pub fn overall(stats: &[OverallStat]) -> Self {
        Chart::Overall(SeriesChart {
            id: OVERALL_ID.to_owned(),
            title: "Overall".to_owned(),
            legend: LEGEND,
            encode: stats.iter().map(|s| s.encode.map(|m| m.percentage)).collect(),
            decode: stats.iter().map(|s| s.decode.map(|m| m.percentage)).collect(),
            names: stats.iter().map(|s| s.algorithm.clone()).collect(),
        })
    }

    pub fn comparison(normalized: &NormalizedComparison) -> Self {
        Chart::Comparison(ComparisonChart {
            id: format!("compare_{}", normalized.kind),
            title: format!("{} performance comparison", normalized.kind),
            baseline: normalized.baseline.clone(),
            subjects: normalized.subjects.clone(),
            series: normalized.series.clone(),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Chart::Category(c) | Chart::Overall(c) => &c.id,
            Chart::Comparison(c) => &c.id,
        }
    }
}

pub trait ChartSink {
    fn emit(&mut self, chart: &Chart) -> io::Result<()>;
}

impl ChartSink for Vec<Chart> {
    fn emit(&mut self, chart: &Chart) -> io::Result<()> {
        self.push(chart.clone());
        Ok(())
    }
}

/// Writes each chart as `<dir>/<file>.json`: `category_<id>` for category
/// charts, the bare id for the overall and comparison charts. Refuses to
/// write two charts to the same file.
#[derive(Debug)]
pub struct JsonDirSink {
    dir: PathBuf,
    written: Map<PathBuf, String>,
}

impl JsonDirSink {
    pub fn create(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(JsonDirSink {
            dir: dir.to_owned(),
            written: Map::default(),
        })
    }

    pub fn path_for(&self, chart: &Chart) -> PathBuf {
        let stem = match chart {
            Chart::Category(c) => format!("category_{}", file_stem(&c.id)),
            Chart::Overall(c) => file_stem(&c.id),
            Chart::Comparison(c) => file_stem(&c.id),
        };
        self.dir.join(format!("{stem}.json"))
    }

    pub fn written(&self) -> usize {
        self.written.len()
    }
}

impl ChartSink for JsonDirSink {
    fn emit(&mut self, chart: &Chart) -> io::Result<()> {
        let path = self.path_for(chart);
        if let Some(previous) = self.written.get(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!(
                    "charts `{previous}` and `{}` both map to {}",
                    chart.id(),
                    path.display()
                ),
            ));
        }
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, chart)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        self.written.insert(path, chart.id().to_owned());
        Ok(())
    }
}

fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
