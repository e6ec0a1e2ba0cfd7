//! Predicate composer subsystem
//!
//! One request may legally supply an expression tree, field quick
//! filters, an id range, a substring filter, and a spatial predicate at
//! once; all of them must hold for a feature to match.

mod composer;

pub use composer::{ComposedPredicate, LikeFilter, PredicateCompiler};
