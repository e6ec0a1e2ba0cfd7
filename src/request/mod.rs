//! Request-parameter surface and quick-filter compiler
//!
//! Everything a request supplies besides the JSON expression tree: the
//! `fld_*` per-field filters, the id family, the substring filter, and
//! the ordering/pagination knobs.

mod params;
mod quick;

pub use params::FilterParams;
pub use quick::{IdFilter, QuickFilter, QuickFilterCompiler, QuickOp};
