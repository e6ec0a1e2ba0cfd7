//! Query executor
//!
//! Applies a composed predicate against a feature source. Two entry
//! points share the predicate:
//!
//! 1. List: scan, filter, stable sort, then offset/limit
//! 2. Count: total features vs. features satisfying the predicate
//!
//! Validation happened earlier; by the time an executor runs, failures
//! can only come from the feature source and pass through unmodified.

use log::debug;

use crate::feature::Feature;
use crate::filter::{FilterError, FilterResult};
use crate::predicate::ComposedPredicate;
use crate::request::FilterParams;
use crate::schema::LayerSchema;

use super::errors::QueryResult;
use super::result::{CountResult, ListResult};
use super::sorter::{FeatureSorter, SortDirection, SortSpec};

/// Read access to a layer's features, supplied by the storage collaborator
pub trait FeatureSource {
    /// Iterates every live feature of the layer.
    ///
    /// The iterator may block on I/O; the executor itself never does.
    fn scan(&self) -> QueryResult<Box<dyn Iterator<Item = Feature> + '_>>;
}

/// Ordering and pagination for a list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Sort specification; absent keeps source order
    pub order_by: Option<SortSpec>,
    /// Maximum returned features; absent means no cap
    pub limit: Option<usize>,
    /// Matching features skipped before the page; absent means none
    pub offset: Option<usize>,
}

impl QueryOptions {
    /// Parses `order_by`/`limit`/`offset` from the request surface.
    ///
    /// A leading `-` on `order_by` selects descending order; the field
    /// must exist in the schema. Unparsable pagination values fail with
    /// `InvalidRange`.
    pub fn from_params(params: &FilterParams, schema: &LayerSchema) -> FilterResult<Self> {
        let order_by = params
            .order_by
            .as_deref()
            .map(|raw| parse_order_by(raw, schema))
            .transpose()?;
        Ok(Self {
            order_by,
            limit: parse_index("limit", params.limit.as_deref())?,
            offset: parse_index("offset", params.offset.as_deref())?,
        })
    }
}

fn parse_order_by(raw: &str, schema: &LayerSchema) -> FilterResult<SortSpec> {
    let (field, direction) = match raw.strip_prefix('-') {
        Some(rest) => (rest, SortDirection::Desc),
        None => (raw, SortDirection::Asc),
    };
    let datatype = schema
        .lookup(field)
        .ok_or_else(|| FilterError::unknown_field(field))?;
    Ok(SortSpec {
        field: field.to_string(),
        datatype,
        direction,
    })
}

fn parse_index(param: &str, raw: Option<&str>) -> FilterResult<Option<usize>> {
    raw.map(|s| {
        s.parse::<usize>()
            .map_err(|_| FilterError::invalid_range(format!("'{}' is not a valid {}", s, param)))
    })
    .transpose()
}

/// Executes list and count queries over one feature source
pub struct QueryExecutor<'a, S: FeatureSource> {
    source: &'a S,
}

impl<'a, S: FeatureSource> QueryExecutor<'a, S> {
    /// Creates an executor over a feature source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Runs a list query: filter, stable sort, offset, limit.
    ///
    /// Deterministic: the same predicate and options over an unmodified
    /// source yield identical results.
    pub fn list(
        &self,
        predicate: &ComposedPredicate,
        options: &QueryOptions,
    ) -> QueryResult<ListResult> {
        let mut scanned = 0usize;
        let mut matches = Vec::new();
        for feature in self.source.scan()? {
            scanned += 1;
            if predicate.matches(&feature) {
                matches.push(feature);
            }
        }
        let matched = matches.len();

        if let Some(spec) = &options.order_by {
            FeatureSorter::sort(&mut matches, spec);
        }

        let offset = options.offset.unwrap_or(0);
        let mut features: Vec<Feature> = if offset > 0 {
            matches.into_iter().skip(offset).collect()
        } else {
            matches
        };
        if let Some(limit) = options.limit {
            features.truncate(limit);
        }

        debug!(
            "list complete: scanned={} matched={} returned={}",
            scanned,
            matched,
            features.len()
        );
        Ok(ListResult {
            features,
            scanned,
            matched,
        })
    }

    /// Runs a count query in one pass over the source.
    ///
    /// `total_count` ignores the predicate; `filtered_count` is reported
    /// only when at least one filter source was supplied on the request.
    pub fn count(&self, predicate: &ComposedPredicate) -> QueryResult<CountResult> {
        let mut total = 0u64;
        let mut filtered = 0u64;
        for feature in self.source.scan()? {
            total += 1;
            if predicate.matches(&feature) {
                filtered += 1;
            }
        }
        debug!("count complete: total={} filtered={}", total, filtered);
        Ok(CountResult {
            total_count: total,
            filtered_count: predicate.is_constrained().then_some(filtered),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateCompiler;
    use crate::query::errors::QueryError;
    use crate::schema::FieldType;
    use serde_json::json;

    /// In-memory feature source for testing
    struct MemorySource {
        features: Vec<Feature>,
        fail_scan: bool,
    }

    impl MemorySource {
        fn new(features: Vec<Feature>) -> Self {
            Self {
                features,
                fail_scan: false,
            }
        }
    }

    impl FeatureSource for MemorySource {
        fn scan(&self) -> QueryResult<Box<dyn Iterator<Item = Feature> + '_>> {
            if self.fail_scan {
                return Err(QueryError::source_failure(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "backend unavailable",
                )));
            }
            Ok(Box::new(self.features.iter().cloned()))
        }
    }

    fn schema() -> LayerSchema {
        LayerSchema::new()
            .with_field("name", FieldType::String)
            .with_field("age", FieldType::Int)
    }

    fn make_feature(id: i64, name: &str, age: i64) -> Feature {
        let attrs = json!({"name": name, "age": age})
            .as_object()
            .unwrap()
            .clone();
        Feature::new(id, attrs)
    }

    fn source() -> MemorySource {
        MemorySource::new(vec![
            make_feature(1, "Alice", 25),
            make_feature(2, "Bob", 30),
            make_feature(3, "Charlie", 35),
        ])
    }

    fn compile(params: &FilterParams) -> ComposedPredicate {
        let schema = schema();
        PredicateCompiler::new(&schema).compile(params, None).unwrap()
    }

    #[test]
    fn test_list_unfiltered() {
        let source = source();
        let executor = QueryExecutor::new(&source);
        let result = executor
            .list(&ComposedPredicate::match_all(), &QueryOptions::default())
            .unwrap();
        assert_eq!(result.ids(), vec![1, 2, 3]);
        assert_eq!(result.scanned, 3);
        assert_eq!(result.matched, 3);
    }

    #[test]
    fn test_list_filtered_sorted_paginated() {
        let source = source();
        let executor = QueryExecutor::new(&source);
        let predicate = compile(&FilterParams::new().with_quick("age__ge", "25"));
        let options = QueryOptions {
            order_by: Some(SortSpec::desc("age", FieldType::Int)),
            limit: Some(1),
            offset: Some(1),
        };
        let result = executor.list(&predicate, &options).unwrap();
        // Descending age: 3, 2, 1; skip one, take one
        assert_eq!(result.ids(), vec![2]);
        assert_eq!(result.matched, 3);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let source = source();
        let executor = QueryExecutor::new(&source);
        let options = QueryOptions {
            offset: Some(10),
            ..Default::default()
        };
        let result = executor
            .list(&ComposedPredicate::match_all(), &options)
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.matched, 3);
    }

    #[test]
    fn test_count_without_sources_omits_filtered() {
        let source = source();
        let executor = QueryExecutor::new(&source);
        let result = executor.count(&ComposedPredicate::match_all()).unwrap();
        assert_eq!(result.total_count, 3);
        assert_eq!(result.filtered_count, None);
    }

    #[test]
    fn test_count_with_source_reports_filtered() {
        let source = source();
        let executor = QueryExecutor::new(&source);
        let predicate = compile(&FilterParams::new().with_quick("age__gt", "26"));
        let result = executor.count(&predicate).unwrap();
        assert_eq!(result.total_count, 3);
        assert_eq!(result.filtered_count, Some(2));
    }

    #[test]
    fn test_scan_failure_propagates() {
        let mut source = source();
        source.fail_scan = true;
        let executor = QueryExecutor::new(&source);
        let err = executor
            .list(&ComposedPredicate::match_all(), &QueryOptions::default())
            .unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn test_options_from_params() {
        let schema = schema();
        let mut params = FilterParams::new().with_order_by("-age");
        params.limit = Some("2".into());
        params.offset = Some("1".into());
        let options = QueryOptions::from_params(&params, &schema).unwrap();
        assert_eq!(
            options.order_by,
            Some(SortSpec::desc("age", FieldType::Int))
        );
        assert_eq!(options.limit, Some(2));
        assert_eq!(options.offset, Some(1));
    }

    #[test]
    fn test_options_unknown_sort_field() {
        let schema = schema();
        let params = FilterParams::new().with_order_by("nonexistent");
        let err = QueryOptions::from_params(&params, &schema).unwrap_err();
        assert_eq!(err, FilterError::unknown_field("nonexistent"));
    }

    #[test]
    fn test_options_bad_pagination() {
        let schema = schema();
        let mut params = FilterParams::new();
        params.limit = Some("-1".into());
        let err = QueryOptions::from_params(&params, &schema).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE");
    }
}
