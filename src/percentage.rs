use crate::align::AlignedCategory;
use crate::error::Error;
use crate::record::Record;

/// Which record of a sorted category list is the ratio denominator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BaselineSelection {
    /// The alphabetically first algorithm.
    #[default]
    FirstAfterSort,
    /// A specific algorithm, which then has to be measured in every category.
    Named(String),
}

impl BaselineSelection {
    fn position(&self, records: &[Record]) -> Option<usize> {
        match self {
            BaselineSelection::FirstAfterSort => (!records.is_empty()).then_some(0),
            BaselineSelection::Named(name) => records.iter().position(|r| &r.algorithm == name),
        }
    }
}

/// Cputime of every record relative to the baseline record, parallel to the
/// list it was computed from. The baseline itself is `1.0`; every other
/// entry is `0.0` when the baseline took no time at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PercentageSeries(Vec<f64>);

impl PercentageSeries {
    /// `None` when the selected baseline is not in `records`.
    pub fn compute(records: &[Record], selection: &BaselineSelection) -> Option<Self> {
        if records.is_empty() {
            return Some(PercentageSeries::default());
        }
        let base = selection.position(records)?;
        let denominator = records[base].cpu_time;
        let ratios = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                if i == base {
                    1.0
                } else if denominator != 0.0 {
                    record.cpu_time / denominator
                } else {
                    0.0
                }
            })
            .collect();
        Some(PercentageSeries(ratios))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPercentages {
    pub encode: PercentageSeries,
    pub decode: PercentageSeries,
}

impl CategoryPercentages {
    pub fn compute(
        aligned: &AlignedCategory,
        selection: &BaselineSelection,
    ) -> Result<Self, Error> {
        let series = |records: &[Record]| {
            PercentageSeries::compute(records, selection).ok_or_else(|| {
                Error::UnknownBaselineAlgorithm {
                    category: aligned.category.clone(),
                    algorithm: match selection {
                        BaselineSelection::Named(name) => name.clone(),
                        BaselineSelection::FirstAfterSort => String::new(),
                    },
                }
            })
        };
        Ok(CategoryPercentages {
            encode: series(&aligned.encode)?,
            decode: series(&aligned.decode)?,
        })
    }
}
