//! Feature record type
//!
//! A feature is one attributed record in a vector layer. Geometry lives
//! with the geometry collaborator; this core only sees the identity column
//! and the attribute map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One attributed record in a vector layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Identity column, matched by the id filter family
    pub id: i64,
    /// Attribute values keyed by field keyname
    pub attrs: Map<String, Value>,
}

impl Feature {
    /// Creates a feature from an identity and attribute map
    pub fn new(id: i64, attrs: Map<String, Value>) -> Self {
        Self { id, attrs }
    }

    /// Returns the attribute value for a keyname, if present
    pub fn attr(&self, keyname: &str) -> Option<&Value> {
        self.attrs.get(keyname)
    }
}
