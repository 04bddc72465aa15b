use std::io::{self, Write};
use std::path::PathBuf;

use log::{info, warn};

use crate::aggregate::{Accumulator, OverallStat};
use crate::align::{align, AlignedCategory};
use crate::chart::{Chart, ChartSink};
use crate::compare::{
    ComparisonTables, NormalizedComparison, Run, VariantSource, DEFAULT_BASELINE_VARIANT,
};
use crate::error::{Error, LoadError};
use crate::group::group_records;
use crate::input::{self, RunInput};
use crate::percentage::{BaselineSelection, CategoryPercentages};
use crate::record::parse_entries;
use crate::report::{self, Palette, TIME_UNIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub baseline_selection: BaselineSelection,
    pub baseline_variant: String,
    pub variant_source: VariantSource,
    pub per_category: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            baseline_selection: BaselineSelection::FirstAfterSort,
            baseline_variant: DEFAULT_BASELINE_VARIANT.to_owned(),
            variant_source: VariantSource::Algorithms,
            per_category: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryReport {
    pub aligned: AlignedCategory,
    pub percentages: CategoryPercentages,
}

/// Everything one run produced, plus what it had to skip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub categories: Vec<CategoryReport>,
    pub overall: Vec<OverallStat>,
    pub comparisons: Vec<NormalizedComparison>,
    pub diagnostics: Vec<Error>,
}

impl Report {
    fn skip(&mut self, err: Error) {
        warn!("{err}");
        self.diagnostics.push(err);
    }

    /// The overall table, preceded by one table per category when asked for.
    pub fn write_tables(
        &self,
        output: &mut dyn Write,
        palette: &Palette,
        per_category: bool,
    ) -> io::Result<()> {
        if per_category {
            for category in &self.categories {
                let rows = report::category_rows(&category.aligned, &category.percentages);
                report::write_table(output, Some(category.aligned.title()), &rows, palette)?;
            }
        }
        report::write_table(output, None, &report::overall_rows(&self.overall), palette)
    }

    /// Hands every chart to `sink`: categories, overall, then comparisons.
    pub fn emit_charts(&self, sink: &mut dyn ChartSink) -> io::Result<()> {
        for category in &self.categories {
            sink.emit(&Chart::category(&category.aligned, &category.percentages))?;
        }
        sink.emit(&Chart::overall(&self.overall))?;
        for comparison in &self.comparisons {
            sink.emit(&Chart::comparison(comparison))?;
        }
        Ok(())
    }
}

pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Pipeline { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs every stage. The first input provides the categories and the
    /// overall table; all inputs feed the cross-variant comparison.
    pub fn run(&self, inputs: Vec<RunInput>) -> Report {
        let mut report = Report::default();

        let runs: Vec<Run> = inputs
            .into_iter()
            .map(|input| {
                let (records, rejected) = parse_entries(&input.file.benchmarks);
                for err in rejected {
                    report.skip(err);
                }
                Run {
                    label: input.label,
                    records,
                }
            })
            .collect();

        if let Some(primary) = runs.first() {
            self.summarize(primary, &mut report);
        }
        self.compare(&runs, &mut report);

        info!(
            "{} categories reported, {} overall algorithms, {} comparisons, {} diagnostics",
            report.categories.len(),
            report.overall.len(),
            report.comparisons.len(),
            report.diagnostics.len()
        );
        report
    }

    fn summarize(&self, run: &Run, report: &mut Report) {
        let mut accumulator = Accumulator::new();
        for group in group_records(run.records.clone()) {
            let aligned = match align(group) {
                Ok(aligned) => aligned,
                Err(err) => {
                    report.skip(err);
                    continue;
                }
            };
            if aligned.time_unit != TIME_UNIT {
                report.skip(Error::UnexpectedTimeUnit {
                    category: aligned.category,
                    unit: aligned.time_unit,
                    expected: TIME_UNIT,
                });
                continue;
            }
            let percentages =
                match CategoryPercentages::compute(&aligned, &self.settings.baseline_selection) {
                    Ok(percentages) => percentages,
                    Err(err) => {
                        report.skip(err);
                        continue;
                    }
                };
            accumulator.add_category(&aligned, &percentages);
            report.categories.push(CategoryReport {
                aligned,
                percentages,
            });
        }
        report.overall = accumulator.finalize();
    }

    fn compare(&self, runs: &[Run], report: &mut Report) {
        let tables = ComparisonTables::build(runs, self.settings.variant_source);
        match tables.compare(&self.settings.baseline_variant) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome {
                        Ok(normalized) => report.comparisons.push(normalized),
                        Err(err) => report.skip(err),
                    }
                }
            }
            Err(err) => report.skip(err),
        }
    }
}

pub fn run_files(paths: &[PathBuf], settings: &Settings) -> Result<Report, LoadError> {
    let inputs = input::load_all(paths)?;
    Ok(Pipeline::new(settings.clone()).run(inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::BenchmarkFile;
    use crate::record::{OperationKind, RawEntry};
    use std::{fs, io::Read};

    fn entry(name: &str, cpu_time: f64, label: Option<&str>) -> RawEntry {
        RawEntry {
            name: name.to_owned(),
            cpu_time: Some(cpu_time),
            time_unit: Some("ns".to_owned()),
            label: label.map(str::to_owned),
            run_type: None,
        }
    }

    fn run_input(label: &str, entries: Vec<RawEntry>) -> RunInput {
        RunInput {
            label: label.to_owned(),
            file: BenchmarkFile {
                benchmarks: entries,
            },
        }
    }

    fn samples_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/resources/samples"))
    }

    #[test]
    fn test_process_file() {
        let _ = env_logger::try_init();

        let files = fs::read_dir(samples_dir()).unwrap();
        let mut checked = 0;
        for file in files {
            let file = file.unwrap();
            let file_path = file.path();
            let fname = file.file_name();
            let file_name = fname.to_str().unwrap();
            if !file_name.ends_with(".json") {
                continue;
            }
            let expected_output_file = format!("{}.out", file_name.strip_suffix(".json").unwrap());
            let expected_output_path = file_path.with_file_name(expected_output_file);

            let mut expected_output = String::new();
            fs::File::open(&expected_output_path)
                .unwrap()
                .read_to_string(&mut expected_output)
                .unwrap();

            let report = run_files(&[file_path.clone()], &Settings::default()).unwrap();
            let mut output = Vec::new();
            report.write_tables(&mut output, &Palette::PLAIN, false).unwrap();

            let output_str = String::from_utf8(output).unwrap();
            assert_eq!(output_str, expected_output, "Failed for file: {}", file_name);
            checked += 1;
        }
        assert!(checked > 0, "no samples found");
    }

    #[test]
    fn test_skipped_categories_are_reported() {
        let report =
            run_files(&[samples_dir().join("mismatch.json")], &Settings::default()).unwrap();

        let categories: Vec<_> = report
            .categories
            .iter()
            .map(|c| c.aligned.category.as_str())
            .collect();
        assert_eq!(categories, ["poet", "unlabeled"]);

        let skipped: Vec<_> = report
            .diagnostics
            .iter()
            .filter_map(|err| match err {
                Error::AlignmentMismatch { category, .. } => Some(category.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, ["canada", "gsoc", "lottie"]);
        assert!(report
            .diagnostics
            .iter()
            .any(|err| matches!(err, Error::MalformedName { .. })));
    }

    #[test]
    fn test_missing_baseline_keeps_tables() {
        let inputs = vec![run_input(
            "run",
            vec![
                entry("twitter/Encode_A", 100.0, Some("twitter.json")),
                entry("twitter/Encode_B", 200.0, Some("twitter.json")),
                entry("twitter/Decode_A", 100.0, Some("twitter.json")),
                entry("twitter/Decode_B", 50.0, Some("twitter.json")),
            ],
        )];
        let report = Pipeline::new(Settings::default()).run(inputs);

        assert!(report.comparisons.is_empty());
        assert_eq!(
            report.diagnostics,
            [Error::MissingBaseline {
                baseline: DEFAULT_BASELINE_VARIANT.to_owned(),
                kind: OperationKind::Encode,
            }]
        );
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].percentages.encode.as_slice(), [1.0, 2.0]);
        assert_eq!(report.overall.len(), 2);
    }

    #[test]
    fn test_compare_runs() {
        let master = run_input(
            "master",
            vec![
                entry("twitter/Encode_SonicDyn", 10.0, None),
                entry("twitter/Decode_SonicDyn", 20.0, None),
            ],
        );
        let target = run_input(
            "target",
            vec![
                entry("twitter/Encode_SonicDyn", 5.0, None),
                entry("twitter/Decode_SonicDyn", 30.0, None),
            ],
        );
        let settings = Settings {
            baseline_variant: "master".to_owned(),
            variant_source: VariantSource::Runs,
            ..Settings::default()
        };
        let report = Pipeline::new(settings).run(vec![master, target]);

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.comparisons.len(), 2);
        assert_eq!(report.comparisons[0].variant("target"), Some(&[0.5][..]));
        assert_eq!(report.comparisons[1].variant("target"), Some(&[1.5][..]));
        assert_eq!(report.comparisons[1].variant("master"), Some(&[1.0][..]));
    }

    #[test]
    fn test_other_time_unit_is_skipped() {
        let mut micro = vec![
            entry("canada/Encode_A", 1.0, None),
            entry("canada/Decode_A", 2.0, None),
        ];
        for raw in &mut micro {
            raw.time_unit = Some("us".to_owned());
        }
        micro.push(entry("poet/Encode_A", 3.0, None));
        micro.push(entry("poet/Decode_A", 4.0, None));

        let report = Pipeline::new(Settings::default()).run(vec![run_input("run", micro)]);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].aligned.category, "poet");
        assert!(report.diagnostics.contains(&Error::UnexpectedTimeUnit {
            category: "canada".to_owned(),
            unit: "us".to_owned(),
            expected: "ns",
        }));
        assert_eq!(report.overall[0].encode.map(|m| m.cpu_time), Some(3.0));
    }

    #[test]
    fn test_runs_sharing_a_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (sub, cpu_time) in [("a", 10.0), ("b", 30.0)] {
            let path = dir.path().join(sub).join("run.json");
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            let json = format!(
                r#"{{"benchmarks": [
                    {{"name": "twitter/Encode_X", "cpu_time": {cpu_time}, "time_unit": "ns"}},
                    {{"name": "twitter/Decode_X", "cpu_time": {cpu_time}, "time_unit": "ns"}}
                ]}}"#
            );
            fs::write(&path, json).unwrap();
            paths.push(path);
        }
        let settings = Settings {
            baseline_variant: paths[0].display().to_string(),
            variant_source: VariantSource::Runs,
            ..Settings::default()
        };

        let report = run_files(&paths, &settings).unwrap();
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        let encode = &report.comparisons[0];
        assert_eq!(encode.series.len(), 2);
        assert_eq!(
            encode.variant(&paths[1].display().to_string()),
            Some(&[3.0][..])
        );
    }

    #[test]
    fn test_emit_charts() {
        let report = run_files(&[samples_dir().join("basic.json")], &Settings::default()).unwrap();
        let mut charts: Vec<Chart> = Vec::new();
        report.emit_charts(&mut charts).unwrap();

        let ids: Vec<_> = charts.iter().map(Chart::id).collect();
        assert_eq!(
            ids,
            ["twitter", "citm", "overall", "compare_Encode", "compare_Decode"]
        );
    }

    #[test]
    fn test_per_category_tables() {
        let report = run_files(&[samples_dir().join("basic.json")], &Settings::default()).unwrap();
        let mut output = Vec::new();
        report.write_tables(&mut output, &Palette::PLAIN, true).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.contains("\ntwitter.json\n"));
        assert!(text.contains("\ncitm_catalog.json\n"));
        assert_eq!(text.matches("Decode Avg Time(ns)").count(), 3);
    }
}
