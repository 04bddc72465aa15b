use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::compare::{VariantSource, DEFAULT_BASELINE_VARIANT};
use crate::input;
use crate::percentage::BaselineSelection;
use crate::pipeline::Settings;
use crate::report::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Parser)]
#[command(name = "benchreport")]
#[command(about = "Compare encode/decode benchmark results against a baseline")]
pub struct Args {
    /// Benchmark results in JSON (`{"benchmarks": [...]}`)
    pub input: PathBuf,

    /// Another results file, compared against INPUT as a separate variant
    #[arg(long = "variant", value_name = "FILE")]
    pub variants: Vec<PathBuf>,

    /// Variant every other variant is normalized against
    /// (default: SonicDyn, or INPUT's run label when --variant is given)
    #[arg(long, env = "BENCHREPORT_BASELINE")]
    pub baseline: Option<String>,

    /// Per-category percentage baseline (default: alphabetically first algorithm)
    #[arg(long, value_name = "ALGORITHM")]
    pub baseline_algorithm: Option<String>,

    /// Directory receiving chart series for the renderer
    #[arg(long, env = "BENCHREPORT_CHART_DIR", value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    /// Also print one table per category
    #[arg(long)]
    pub per_category: bool,

    /// Colour the tables
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl Args {
    /// INPUT first, then every `--variant` in command line order.
    pub fn inputs(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.variants.len() + 1);
        paths.push(self.input.clone());
        paths.extend(self.variants.iter().cloned());
        paths
    }

    pub fn settings(&self) -> Settings {
        Settings {
            baseline_selection: match &self.baseline_algorithm {
                Some(name) => BaselineSelection::Named(name.clone()),
                None => BaselineSelection::FirstAfterSort,
            },
            baseline_variant: self.baseline_variant(),
            variant_source: if self.variants.is_empty() {
                VariantSource::Algorithms
            } else {
                VariantSource::Runs
            },
            per_category: self.per_category,
        }
    }

    fn baseline_variant(&self) -> String {
        if let Some(baseline) = &self.baseline {
            return baseline.clone();
        }
        if self.variants.is_empty() {
            return DEFAULT_BASELINE_VARIANT.to_owned();
        }
        input::run_labels(&self.inputs())
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_BASELINE_VARIANT.to_owned())
    }

    pub fn palette(&self) -> Palette {
        let colored = match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
        };
        if colored {
            Palette::ANSI
        } else {
            Palette::PLAIN
        }
    }
}
