use log::debug;

use crate::record::{OperationKind, Record};
use crate::Map;

/// Every measured record of one category, split by direction, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryGroup {
    pub category: String,
    pub encode: Vec<Record>,
    pub decode: Vec<Record>,
}

impl CategoryGroup {
    fn new(category: &str) -> Self {
        CategoryGroup {
            category: category.to_owned(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.encode.len() + self.decode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions records by category (first-seen order), then by direction.
/// Records that are neither encode nor decode are dropped here.
pub fn group_records(records: Vec<Record>) -> Vec<CategoryGroup> {
    let mut groups: Map<String, CategoryGroup> = Map::default();
    for record in records {
        let encode = match &record.kind {
            OperationKind::Encode => true,
            OperationKind::Decode => false,
            OperationKind::Other(tag) => {
                debug!(
                    "{}/{}_{} is neither encode nor decode, ignored",
                    record.category, tag, record.algorithm
                );
                continue;
            }
        };

        let group = groups
            .entry(record.category.clone())
            .or_insert_with(|| CategoryGroup::new(&record.category));
        if encode {
            group.encode.push(record);
        } else {
            group.decode.push(record);
        }
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record;

    #[test]
    fn test_group_records() {
        let records = vec![
            record("twitter/Encode_B", 2.0, Some("twitter.json")),
            record("citm/Decode_A", 3.0, Some("citm.json")),
            record("twitter/Decode_B", 4.0, Some("twitter.json")),
            record("twitter/Compile_B", 5.0, Some("twitter.json")),
            record("twitter/Encode_A", 1.0, Some("twitter.json")),
        ];

        let groups = group_records(records);
        let categories: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, ["twitter", "citm"], "first-seen category order");

        let twitter = &groups[0];
        let encode: Vec<_> = twitter.encode.iter().map(|r| r.algorithm.as_str()).collect();
        assert_eq!(encode, ["B", "A"], "no sorting while grouping");
        assert_eq!(twitter.decode.len(), 1);
        assert_eq!(twitter.len(), 3, "Compile record dropped");

        assert!(groups[1].encode.is_empty());
        assert_eq!(groups[1].decode.len(), 1);
    }

    #[test]
    fn test_only_unmeasured_records() {
        let groups = group_records(vec![record("x/Compile_A", 1.0, None)]);
        assert!(groups.is_empty());
    }
}
