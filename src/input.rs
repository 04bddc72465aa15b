use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::error::LoadError;
use crate::record::RawEntry;
use crate::Map;

/// A results file: `{"benchmarks": [...]}` plus whatever context the
/// harness wrote alongside.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BenchmarkFile {
    #[serde(default)]
    pub benchmarks: Vec<RawEntry>,
}

impl BenchmarkFile {
    pub fn from_reader<R: io::Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    /// Reads and parses `path`. The file is closed before this returns.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.to_owned(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunInput {
    pub label: String,
    pub file: BenchmarkFile,
}

/// The label a run gets when compared against others: the file stem.
pub fn run_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Labels for `paths`, parallel to them. Runs whose stems collide are
/// labelled by their full path instead, and a path given twice gets its
/// position appended, so no run hides another.
pub fn run_labels(paths: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = paths.iter().map(|path| run_label(path)).collect();
    let mut stem_counts: Map<&str, usize> = Map::default();
    for stem in &stems {
        *stem_counts.entry(stem.as_str()).or_default() += 1;
    }

    let mut used: Map<String, ()> = Map::default();
    let mut labels = Vec::with_capacity(paths.len());
    for (index, (path, stem)) in paths.iter().zip(&stems).enumerate() {
        let mut label = stem.clone();
        if stem_counts.get(stem.as_str()).is_some_and(|&count| count > 1) {
            label = path.display().to_string();
        }
        if used.contains_key(&label) {
            label = format!("{label}#{}", index + 1);
        }
        used.insert(label.clone(), ());
        labels.push(label);
    }
    labels
}

pub fn load_all(paths: &[PathBuf]) -> Result<Vec<RunInput>, LoadError> {
    paths
        .iter()
        .zip(run_labels(paths))
        .map(|(path, label)| {
            let stem = run_label(path);
            if label != stem {
                warn!("run label `{stem}` is ambiguous, using `{label}`");
            }
            Ok(RunInput {
                label,
                file: BenchmarkFile::load(path)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_reader_ignores_context() {
        let json = r#"{
            "context": {"date": "2024-01-01", "num_cpus": 8},
            "benchmarks": [
                {"name": "twitter/Encode_SonicDyn", "iterations": 10, "real_time": 1.5,
                 "cpu_time": 1.25, "time_unit": "ns", "label": "twitter.json"},
                {"name": "twitter/Decode_SonicDyn", "cpu_time": 2.0, "time_unit": "ns"}
            ]
        }"#;
        let file = BenchmarkFile::from_reader(json.as_bytes()).unwrap();
        assert_eq!(file.benchmarks.len(), 2);
        assert_eq!(file.benchmarks[0].cpu_time, Some(1.25));
        assert_eq!(file.benchmarks[1].label, None);
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/definitely/not/here.json");
        assert!(matches!(
            BenchmarkFile::load(missing),
            Err(LoadError::Io { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            BenchmarkFile::load(file.path()),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn test_run_label() {
        assert_eq!(run_label(Path::new("/tmp/master.json")), "master");
        assert_eq!(run_label(Path::new("target.results.json")), "target.results");
    }

    #[test]
    fn test_colliding_stems_use_full_paths() {
        let paths = [
            PathBuf::from("master.json"),
            PathBuf::from("a/run.json"),
            PathBuf::from("b/run.json"),
        ];
        assert_eq!(run_labels(&paths), ["master", "a/run.json", "b/run.json"]);

        let twice = [PathBuf::from("run.json"), PathBuf::from("run.json")];
        assert_eq!(run_labels(&twice), ["run.json", "run.json#2"]);
    }

    #[test]
    fn test_load_all_keeps_every_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for sub in ["a", "b"] {
            let path = dir.path().join(sub).join("run.json");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, r#"{"benchmarks": []}"#).unwrap();
            paths.push(path);
        }

        let inputs = load_all(&paths).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_ne!(inputs[0].label, inputs[1].label);
        assert!(inputs[1].label.ends_with("run.json"));
    }
}
