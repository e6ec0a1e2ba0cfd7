//! Query executor subsystem
//!
//! Consumes a composed predicate and a feature source, producing an
//! ordered, paginated feature page or total/filtered counts.
//!
//! # Execution flow (strict order)
//!
//! 1. Scan the feature source
//! 2. Retain features satisfying the composed predicate
//! 3. Apply stable sort (if specified)
//! 4. Apply offset, then limit
//!
//! # Invariants
//!
//! - Deterministic: same predicate + same source = same results
//! - Validation failures never reach the source; source failures pass
//!   through unmodified

mod errors;
mod executor;
mod result;
mod sorter;

pub use errors::{QueryError, QueryResult};
pub use executor::{FeatureSource, QueryExecutor, QueryOptions};
pub use result::{CountResult, ListResult};
pub use sorter::{FeatureSorter, SortDirection, SortSpec};
