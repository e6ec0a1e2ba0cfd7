//! Result types for query execution

use serde::Serialize;

use crate::feature::Feature;

/// One page of features produced by a list query
#[derive(Debug, Clone)]
pub struct ListResult {
    /// Features in result order
    pub features: Vec<Feature>,
    /// Features read from the source
    pub scanned: usize,
    /// Features satisfying the predicate, before pagination
    pub matched: usize,
}

impl ListResult {
    /// Returns true if the page is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the number of features on the page
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Iterates the page
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Feature ids in result order, for assertions and logging
    pub fn ids(&self) -> Vec<i64> {
        self.features.iter().map(|f| f.id).collect()
    }
}

/// Totals produced by a count query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountResult {
    /// Count of all features, irrespective of filtering
    pub total_count: u64,
    /// Count of features satisfying the composed predicate; present only
    /// when at least one filter source was supplied on the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_count: Option<u64>,
}
