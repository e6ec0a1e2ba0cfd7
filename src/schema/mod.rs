//! Field schema subsystem
//!
//! Describes the attribute fields of a feature layer. Every other
//! subsystem validates field names and coerces values against this schema.

mod types;

pub use types::{FieldDef, FieldType, LayerSchema};
