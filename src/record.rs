use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;

use crate::error::Error;

/// One element of the `benchmarks` array as the harness writes it.
///
/// Only the fields the report needs are kept, everything else in the entry
/// is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEntry {
    pub name: String,
    #[serde(default)]
    pub cpu_time: Option<f64>,
    #[serde(default)]
    pub time_unit: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub run_type: Option<String>,
}

impl RawEntry {
    /// Mean/median/stddev rows the harness appends after repeated runs.
    pub fn is_aggregate(&self) -> bool {
        self.run_type.as_deref() == Some("aggregate")
    }
}

/// The measured direction, taken from the `<kind>_` prefix of a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Encode,
    Decode,
    /// Any other prefix. Parsed fine, never grouped.
    Other(String),
}

impl OperationKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "Encode" => OperationKind::Encode,
            "Decode" => OperationKind::Decode,
            other => OperationKind::Other(other.to_owned()),
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, OperationKind::Encode | OperationKind::Decode)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Encode => f.write_str("Encode"),
            OperationKind::Decode => f.write_str("Decode"),
            OperationKind::Other(tag) => f.write_str(tag),
        }
    }
}

/// A benchmark name split as `<category>/<kind>_<algorithm>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub category: String,
    pub kind: OperationKind,
    pub algorithm: String,
}

impl FromStr for ParsedName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| Error::MalformedName {
            name: name.to_owned(),
            reason,
        };

        let (category, rest) =
            split_exactly(name, '/').ok_or_else(|| malformed("expected exactly one `/`"))?;
        let (tag, algorithm) = split_exactly(rest, '_')
            .ok_or_else(|| malformed("expected `<kind>_<algorithm>` after the category"))?;
        if category.is_empty() {
            return Err(malformed("empty category"));
        }
        if algorithm.is_empty() {
            return Err(malformed("empty algorithm"));
        }

        Ok(ParsedName {
            category: category.to_owned(),
            kind: OperationKind::from_tag(tag),
            algorithm: algorithm.to_owned(),
        })
    }
}

// splits on `sep`, refusing inputs with zero or several separators
fn split_exactly(s: &str, sep: char) -> Option<(&str, &str)> {
    let (head, tail) = s.split_once(sep)?;
    if tail.contains(sep) {
        None
    } else {
        Some((head, tail))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: String,
    pub kind: OperationKind,
    pub algorithm: String,
    pub cpu_time: f64,
    pub time_unit: String,
    pub label: Option<String>,
}

impl Record {
    pub fn from_entry(entry: &RawEntry) -> Result<Self, Error> {
        let ParsedName {
            category,
            kind,
            algorithm,
        } = entry.name.parse::<ParsedName>()?;

        let missing = |field| Error::MissingField {
            name: entry.name.clone(),
            field,
        };
        let cpu_time = entry.cpu_time.ok_or_else(|| missing("cpu_time"))?;
        if !cpu_time.is_finite() || cpu_time < 0.0 {
            return Err(Error::InvalidCpuTime {
                name: entry.name.clone(),
                value: cpu_time,
            });
        }
        let time_unit = entry.time_unit.clone().ok_or_else(|| missing("time_unit"))?;

        Ok(Record {
            category,
            kind,
            algorithm,
            cpu_time,
            time_unit,
            label: entry.label.clone(),
        })
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

/// Parses every entry, returning the records and one error per rejected entry.
pub fn parse_entries(entries: &[RawEntry]) -> (Vec<Record>, Vec<Error>) {
    let mut records = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for entry in entries {
        if entry.is_aggregate() {
            debug!("skipping aggregate entry {}", entry.name);
            continue;
        }
        match Record::from_entry(entry) {
            Ok(record) => records.push(record),
            Err(err) => rejected.push(err),
        }
    }
    (records, rejected)
}

#[cfg(test)]
pub(crate) fn record(name: &str, cpu_time: f64, label: Option<&str>) -> Record {
    Record::from_entry(&RawEntry {
        name: name.to_owned(),
        cpu_time: Some(cpu_time),
        time_unit: Some("ns".to_owned()),
        label: label.map(str::to_owned),
        run_type: None,
    })
    .unwrap()
}
