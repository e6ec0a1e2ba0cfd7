//! Query execution error types
//!
//! Two classes only: request validation failures (client errors upstream)
//! and failures raised by the feature source during scan, which pass
//! through unmodified.

use thiserror::Error;

use crate::filter::FilterError;

/// Result type for query execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Failures surfaced by list and count queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// Request validation failure; never reaches the feature source
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Failure raised by the feature source, propagated as-is
    #[error("feature source failure: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl QueryError {
    /// Wraps a feature-source failure
    pub fn source_failure(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Source(err.into())
    }

    /// True for validation failures the request layer maps to client errors
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Filter(_))
    }
}
