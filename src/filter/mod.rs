//! Filter expression subsystem
//!
//! Parses the declarative JSON boolean expression into a typed AST,
//! validating field names against the layer schema and coercing every
//! literal to its field's declared type up front.
//!
//! # Invariants
//!
//! - A parsed tree never re-consults the schema during evaluation
//! - Evaluation is pure: no side effects, no failure paths
//! - Validation failures abort before any feature is read

mod ast;
pub mod coerce;
mod errors;
mod parser;

pub use ast::{Combinator, CompareOp, FilterNode};
pub use coerce::TypedValue;
pub use errors::{FilterError, FilterResult};
pub use parser::ExpressionParser;
