use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::record::OperationKind;

/// A problem scoped to one record, category or comparison kind.
///
/// None of these abort a run: the pipeline logs them, keeps them in the
/// report and carries on with whatever it can still process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed benchmark name `{name}`: {reason}")]
    MalformedName { name: String, reason: &'static str },

    #[error("benchmark `{name}` has no `{field}`")]
    MissingField { name: String, field: &'static str },

    #[error("benchmark `{name}` has invalid cpu_time {value}")]
    InvalidCpuTime { name: String, value: f64 },

    #[error("category `{category}` skipped: {mismatch}")]
    AlignmentMismatch { category: String, mismatch: Mismatch },

    #[error("category `{category}` skipped: baseline algorithm `{algorithm}` not measured")]
    UnknownBaselineAlgorithm { category: String, algorithm: String },

    #[error("category `{category}` skipped: measured in `{unit}`, tables are in `{expected}`")]
    UnexpectedTimeUnit {
        category: String,
        unit: String,
        expected: &'static str,
    },

    #[error("no {kind} data for baseline variant `{baseline}`, comparison skipped")]
    MissingBaseline {
        baseline: String,
        kind: OperationKind,
    },

    #[error("{kind} comparison skipped: variant `{variant}` has no measurement for `{subject}`")]
    IncompleteVariantCoverage {
        kind: OperationKind,
        variant: String,
        subject: String,
    },
}

/// Why the encode and decode lists of a category could not be paired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("{encode} encode vs {decode} decode records")]
    Length { encode: usize, decode: usize },

    #[error("encode `{encode}` paired with decode `{decode}` at position {index}")]
    Algorithm {
        index: usize,
        encode: String,
        decode: String,
    },

    #[error("label {found:?} on `{algorithm}` differs from {expected:?}")]
    Label {
        algorithm: String,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("time unit `{found}` on `{algorithm}` differs from `{expected}`")]
    TimeUnit {
        algorithm: String,
        expected: String,
        found: String,
    },

    #[error("category `{found}` on `{algorithm}` differs from `{expected}`")]
    Category {
        algorithm: String,
        expected: String,
        found: String,
    },
}

/// Failure to read a results file at all.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a benchmark results document")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
