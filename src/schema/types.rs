//! Field schema definitions
//!
//! Supported attribute types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - date: calendar date (YYYY-MM-DD)
//! - time: time of day (HH:MM:SS)
//! - datetime: naive instant (YYYY-MM-DDTHH:MM:SS[.ffffff])

use serde::{Deserialize, Serialize};

/// Declared type of an attribute field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Calendar date, ordered by date
    Date,
    /// Time of day, ordered within one day
    Time,
    /// Naive timestamp, ordered by instant
    DateTime,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
        }
    }

    /// Returns true for fields the substring filter consults
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::String)
    }
}

/// One field of a layer schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field keyname, unique within the layer
    pub keyname: String,
    /// Declared type
    pub datatype: FieldType,
}

impl FieldDef {
    /// Creates a field definition
    pub fn new(keyname: impl Into<String>, datatype: FieldType) -> Self {
        Self {
            keyname: keyname.into(),
            datatype,
        }
    }
}

/// Attribute schema of one feature layer.
///
/// Immutable per request; the authoritative source of valid field names
/// and declared types for every filter source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSchema {
    fields: Vec<FieldDef>,
}

impl LayerSchema {
    /// Creates an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema from field definitions
    pub fn from_fields(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    /// Adds a field (builder style)
    pub fn with_field(mut self, keyname: impl Into<String>, datatype: FieldType) -> Self {
        self.fields.push(FieldDef::new(keyname, datatype));
        self
    }

    /// Returns the declared type of a field, if the field exists
    pub fn lookup(&self, keyname: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|f| f.keyname == keyname)
            .map(|f| f.datatype)
    }

    /// Returns all field definitions in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Iterates the keynames of string-typed fields
    pub fn string_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.datatype.is_textual())
            .map(|f| f.keyname.as_str())
    }
}
