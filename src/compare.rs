use serde::Serialize;

use crate::error::Error;
use crate::record::{OperationKind, Record};
use crate::Map;

pub const DEFAULT_BASELINE_VARIANT: &str = "SonicDyn";

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub label: String,
    pub records: Vec<Record>,
}

/// What counts as a variant when several implementations are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantSource {
    /// Each algorithm is a variant, measured once per category.
    #[default]
    Algorithms,
    /// Each run is a variant, measured once per `category/algorithm`.
    Runs,
}

impl VariantSource {
    fn keys(self, run: &Run, record: &Record) -> (String, String) {
        match self {
            VariantSource::Algorithms => (record.category.clone(), record.algorithm.clone()),
            VariantSource::Runs => (
                format!("{}/{}", record.category, record.algorithm),
                run.label.clone(),
            ),
        }
    }
}

/// Cputime per measured subject and variant for one direction.
///
/// Subjects and variants both keep the order they first appeared in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonTable {
    entries: Map<String, Map<String, f64>>,
}

impl ComparisonTable {
    /// Records a measurement; a repeated subject/variant pair keeps the
    /// last value.
    pub fn insert(&mut self, subject: &str, variant: &str, cpu_time: f64) {
        self.entries
            .entry(subject.to_owned())
            .or_default()
            .insert(variant.to_owned(), cpu_time);
    }

    pub fn get(&self, subject: &str, variant: &str) -> Option<f64> {
        self.entries.get(subject)?.get(variant).copied()
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn variants(&self) -> Vec<&str> {
        let mut seen: Map<&str, ()> = Map::default();
        for row in self.entries.values() {
            for variant in row.keys() {
                seen.entry(variant.as_str()).or_default();
            }
        }
        seen.into_keys().collect()
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.entries.values().any(|row| row.contains_key(variant))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Divides every variant's series by the baseline's series, subject by
    /// subject. Fails when any variant, the baseline included, misses a
    /// subject.
    pub fn normalize(
        &self,
        kind: &OperationKind,
        baseline: &str,
    ) -> Result<NormalizedComparison, Error> {
        if !self.has_variant(baseline) {
            return Err(Error::MissingBaseline {
                baseline: baseline.to_owned(),
                kind: kind.clone(),
            });
        }

        let subjects: Vec<String> = self.entries.keys().cloned().collect();
        let mut series = Vec::new();
        for variant in self.variants() {
            let mut values = Vec::with_capacity(subjects.len());
            for (subject, row) in &self.entries {
                let missing = |who: &str| Error::IncompleteVariantCoverage {
                    kind: kind.clone(),
                    variant: who.to_owned(),
                    subject: subject.clone(),
                };
                let base = *row.get(baseline).ok_or_else(|| missing(baseline))?;
                let value = *row.get(variant).ok_or_else(|| missing(variant))?;
                values.push(if base != 0.0 { value / base } else { 0.0 });
            }
            series.push(VariantSeries {
                variant: variant.to_owned(),
                values,
            });
        }

        Ok(NormalizedComparison {
            kind: kind.clone(),
            baseline: baseline.to_owned(),
            subjects,
            series,
        })
    }
}

/// One variant's cputime relative to the baseline variant, parallel to
/// [`NormalizedComparison::subjects`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSeries {
    pub variant: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedComparison {
    pub kind: OperationKind,
    pub baseline: String,
    pub subjects: Vec<String>,
    pub series: Vec<VariantSeries>,
}

impl NormalizedComparison {
    pub fn variant(&self, name: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.variant == name)
            .map(|s| s.values.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonTables {
    pub encode: ComparisonTable,
    pub decode: ComparisonTable,
}

impl ComparisonTables {
    pub fn build(runs: &[Run], source: VariantSource) -> Self {
        let mut tables = ComparisonTables::default();
        for run in runs {
            for record in &run.records {
                let table = match record.kind {
                    OperationKind::Encode => &mut tables.encode,
                    OperationKind::Decode => &mut tables.decode,
                    OperationKind::Other(_) => continue,
                };
                let (subject, variant) = source.keys(run, record);
                table.insert(&subject, &variant, record.cpu_time);
            }
        }
        tables
    }

    /// Checks that the baseline took part in both directions before
    /// normalizing each of them. Returns the per-direction outcomes, encode
    /// first.
    pub fn compare(
        &self,
        baseline: &str,
    ) -> Result<[Result<NormalizedComparison, Error>; 2], Error> {
        let kinds = [
            (OperationKind::Encode, &self.encode),
            (OperationKind::Decode, &self.decode),
        ];
        for (kind, table) in &kinds {
            if !table.has_variant(baseline) {
                return Err(Error::MissingBaseline {
                    baseline: baseline.to_owned(),
                    kind: kind.clone(),
                });
            }
        }
        Ok(kinds.map(|(kind, table)| table.normalize(&kind, baseline)))
    }
}
