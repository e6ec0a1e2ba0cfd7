//! Feature ordering for list queries
//!
//! Stable sort on the coerced declared type of one field. Features with
//! equal keys keep their source order; features without a sortable value
//! order before those with one.

use std::cmp::Ordering;

use crate::feature::Feature;
use crate::filter::coerce;
use crate::schema::FieldType;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification resolved against the layer schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Declared type, drives key coercion
    pub datatype: FieldType,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>, datatype: FieldType) -> Self {
        Self {
            field: field.into(),
            datatype,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>, datatype: FieldType) -> Self {
        Self {
            field: field.into(),
            datatype,
            direction: SortDirection::Desc,
        }
    }
}

/// Sorts features for list results
pub struct FeatureSorter;

impl FeatureSorter {
    /// Sorts features in place according to the specification.
    ///
    /// The sort is stable and deterministic.
    pub fn sort(features: &mut [Feature], spec: &SortSpec) {
        features.sort_by(|a, b| {
            let a_key = a
                .attr(&spec.field)
                .and_then(|v| coerce::coerce_attr(spec.datatype, v));
            let b_key = b
                .attr(&spec.field)
                .and_then(|v| coerce::coerce_attr(spec.datatype, v));

            let ordering = match (a_key, b_key) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a_key), Some(b_key)) => a_key.compare(&b_key).unwrap_or(Ordering::Equal),
            };

            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_feature(id: i64, age: i64) -> Feature {
        let attrs = json!({"age": age}).as_object().unwrap().clone();
        Feature::new(id, attrs)
    }

    #[test]
    fn test_sort_ascending() {
        let mut features = vec![make_feature(3, 35), make_feature(1, 25), make_feature(2, 30)];
        FeatureSorter::sort(&mut features, &SortSpec::asc("age", FieldType::Int));
        let ids: Vec<i64> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_descending() {
        let mut features = vec![make_feature(3, 35), make_feature(1, 25), make_feature(2, 30)];
        FeatureSorter::sort(&mut features, &SortSpec::desc("age", FieldType::Int));
        let ids: Vec<i64> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_stable_on_ties() {
        let mut features = vec![make_feature(1, 30), make_feature(2, 30), make_feature(3, 30)];
        FeatureSorter::sort(&mut features, &SortSpec::asc("age", FieldType::Int));
        let ids: Vec<i64> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_value_sorts_first() {
        let mut features = vec![
            make_feature(1, 30),
            Feature::new(2, serde_json::Map::new()),
        ];
        FeatureSorter::sort(&mut features, &SortSpec::asc("age", FieldType::Int));
        let ids: Vec<i64> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sort_by_date_field() {
        let make = |id: i64, date: &str| {
            let attrs = json!({"birth_date": date}).as_object().unwrap().clone();
            Feature::new(id, attrs)
        };
        let mut features = vec![
            make(1, "1998-05-15"),
            make(2, "1988-12-01"),
            make(3, "1993-08-22"),
        ];
        FeatureSorter::sort(
            &mut features,
            &SortSpec::asc("birth_date", FieldType::Date),
        );
        let ids: Vec<i64> = features.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
