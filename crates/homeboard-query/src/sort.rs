//! Sort specification.

use std::cmp::Ordering;

use homeboard_model::SortValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Which field to order by, if any.
///
/// With no field the collection order (newest first) is kept. Records
/// without a value for the field always sort after those that have one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Keep collection order.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: SortDirection::Descending,
        }
    }

    /// Compare two sort keys under this spec.
    pub fn compare(&self, a: Option<&SortValue>, b: Option<&SortValue>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => match self.direction {
                SortDirection::Ascending => a.cmp(b),
                SortDirection::Descending => b.cmp(a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_sort_last_both_ways() {
        let one = SortValue::Number(1);
        for spec in [SortSpec::ascending("price"), SortSpec::descending("price")] {
            assert_eq!(spec.compare(Some(&one), None), Ordering::Less);
            assert_eq!(spec.compare(None, Some(&one)), Ordering::Greater);
        }
    }

    #[test]
    fn descending_reverses() {
        let low = SortValue::Number(1);
        let high = SortValue::Number(2);
        assert_eq!(
            SortSpec::descending("price").compare(Some(&low), Some(&high)),
            Ordering::Greater
        );
    }
}
