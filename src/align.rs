use crate::error::{Error, Mismatch};
use crate::group::CategoryGroup;
use crate::record::Record;

/// A category whose encode and decode lists pair up one-to-one.
///
/// Both lists are sorted by algorithm and `algorithms[i]` names
/// `encode[i]` and `decode[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedCategory {
    pub category: String,
    pub label: Option<String>,
    pub time_unit: String,
    pub algorithms: Vec<String>,
    pub encode: Vec<Record>,
    pub decode: Vec<Record>,
}

impl AlignedCategory {
    /// Chart title: the shared label, or the category for unlabeled runs.
    pub fn title(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.category)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&Record, &Record)> {
        self.encode.iter().zip(&self.decode)
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

/// Sorts both directions by algorithm and checks they describe the same
/// benchmarks under one label and one time unit.
pub fn align(group: CategoryGroup) -> Result<AlignedCategory, Error> {
    let CategoryGroup {
        category,
        mut encode,
        mut decode,
    } = group;
    encode.sort_by(|a, b| a.algorithm.cmp(&b.algorithm));
    decode.sort_by(|a, b| a.algorithm.cmp(&b.algorithm));

    let mismatch = |mismatch| Error::AlignmentMismatch {
        category: category.clone(),
        mismatch,
    };

    if encode.len() != decode.len() {
        return Err(mismatch(Mismatch::Length {
            encode: encode.len(),
            decode: decode.len(),
        }));
    }

    let first = encode.first();
    let label = first.and_then(|r| r.label.clone());
    let expected_category = first.map_or_else(|| category.clone(), |r| r.category.clone());
    let expected_unit = first.map(|r| r.time_unit.clone()).unwrap_or_default();

    let mut algorithms = Vec::with_capacity(encode.len());
    for (index, (e, d)) in encode.iter().zip(&decode).enumerate() {
        if e.algorithm != d.algorithm {
            return Err(mismatch(Mismatch::Algorithm {
                index,
                encode: e.algorithm.clone(),
                decode: d.algorithm.clone(),
            }));
        }
        for record in [e, d] {
            if record.label != label {
                return Err(mismatch(Mismatch::Label {
                    algorithm: record.algorithm.clone(),
                    expected: label.clone(),
                    found: record.label.clone(),
                }));
            }
            if record.time_unit != expected_unit {
                return Err(mismatch(Mismatch::TimeUnit {
                    algorithm: record.algorithm.clone(),
                    expected: expected_unit.clone(),
                    found: record.time_unit.clone(),
                }));
            }
            if record.category != expected_category {
                return Err(mismatch(Mismatch::Category {
                    algorithm: record.algorithm.clone(),
                    expected: expected_category.clone(),
                    found: record.category.clone(),
                }));
            }
        }
        algorithms.push(e.algorithm.clone());
    }

    Ok(AlignedCategory {
        category,
        label,
        time_unit: expected_unit,
        algorithms,
        encode,
        decode,
    })
}
