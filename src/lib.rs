//! featureq - feature-query filtering core for vector GIS layers
//!
//! Given a layer of typed, attributed features, evaluates a declarative
//! filter (a JSON boolean expression tree plus ad-hoc request-parameter
//! filters) into one composed predicate, then executes list or count
//! queries against a caller-supplied feature source.
//!
//! Transport, authorization, storage, and geometry math live with the
//! surrounding service; this crate consumes them through narrow traits.

pub mod feature;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod request;
pub mod schema;
pub mod spatial;
