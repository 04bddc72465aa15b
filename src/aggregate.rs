use log::debug;

use crate::align::AlignedCategory;
use crate::percentage::CategoryPercentages;
use crate::record::OperationKind;
use crate::Map;

/// Collects per-algorithm samples across categories. Built once per run and
/// consumed by [`Accumulator::finalize`].
#[derive(Debug, Default)]
pub struct Accumulator {
    data: Map<String, Totals>,
}

#[derive(PartialEq, Debug, Clone, Default)]
struct Totals {
    encode: Aggregate,
    decode: Aggregate,
}

#[derive(PartialEq, Debug, Clone, Default)]
struct Aggregate {
    cpu_time: f64,
    percentage: f64,
    count: usize,
}

impl Aggregate {
    fn add(&mut self, cpu_time: f64, percentage: f64) {
        self.cpu_time += cpu_time;
        self.percentage += percentage;
        self.count += 1;
    }

    fn mean(&self) -> Option<Mean> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(Mean {
            cpu_time: self.cpu_time / n,
            percentage: self.percentage / n,
            samples: self.count,
        })
    }
}

/// Arithmetic means over the samples of one algorithm in one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mean {
    pub cpu_time: f64,
    pub percentage: f64,
    pub samples: usize,
}

/// Cross-category result for one algorithm. A direction without samples
/// has no mean.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallStat {
    pub algorithm: String,
    pub encode: Option<Mean>,
    pub decode: Option<Mean>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample. A ratio of exactly `0.0` means the category had no
    /// usable baseline, so the sample is left out entirely; the algorithm is
    /// still registered.
    pub fn insert(
        &mut self,
        kind: &OperationKind,
        algorithm: &str,
        cpu_time: f64,
        percentage: f64,
    ) {
        if !kind.is_measured() {
            return;
        }
        let totals = self.data.entry(algorithm.to_owned()).or_default();
        if percentage == 0.0 {
            debug!("{kind} sample of {algorithm} has no baseline ratio, excluded");
            return;
        }
        match kind {
            OperationKind::Encode => totals.encode.add(cpu_time, percentage),
            _ => totals.decode.add(cpu_time, percentage),
        }
    }

    pub fn add_category(&mut self, aligned: &AlignedCategory, percentages: &CategoryPercentages) {
        for (record, ratio) in aligned.encode.iter().zip(percentages.encode.as_slice()) {
            self.insert(&OperationKind::Encode, &record.algorithm, record.cpu_time, *ratio);
        }
        for (record, ratio) in aligned.decode.iter().zip(percentages.decode.as_slice()) {
            self.insert(&OperationKind::Decode, &record.algorithm, record.cpu_time, *ratio);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One stat per algorithm, in first-seen order.
    pub fn finalize(self) -> Vec<OverallStat> {
        self.data
            .into_iter()
            .map(|(algorithm, totals)| OverallStat {
                algorithm,
                encode: totals.encode.mean(),
                decode: totals.decode.mean(),
            })
            .collect()
    }
}
