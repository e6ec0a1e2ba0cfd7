//! Per-field-type value coercion
//!
//! Literals arrive as JSON scalars (expression tree) or raw strings
//! (query-string quick filters) and are resolved against the target
//! field's declared type before any comparison. Coercion failures are
//! typed errors, never a silent no-match; only the feature side degrades
//! to "no match" when an attribute cannot be read as its declared type.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::schema::FieldType;

use super::errors::{FilterError, FilterResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A literal resolved to a field's declared type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl TypedValue {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Str(_) => "string",
            TypedValue::Int(_) => "int",
            TypedValue::Float(_) => "float",
            TypedValue::Bool(_) => "bool",
            TypedValue::Date(_) => "date",
            TypedValue::Time(_) => "time",
            TypedValue::DateTime(_) => "datetime",
        }
    }

    /// Compares two values of the same declared type.
    ///
    /// Returns None across types or when a float comparison is undefined
    /// (NaN); a None ordering never satisfies any operator.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::Str(a), TypedValue::Str(b)) => Some(a.cmp(b)),
            (TypedValue::Int(a), TypedValue::Int(b)) => Some(a.cmp(b)),
            (TypedValue::Float(a), TypedValue::Float(b)) => a.partial_cmp(b),
            (TypedValue::Bool(a), TypedValue::Bool(b)) => Some(a.cmp(b)),
            (TypedValue::Date(a), TypedValue::Date(b)) => Some(a.cmp(b)),
            (TypedValue::Time(a), TypedValue::Time(b)) => Some(a.cmp(b)),
            (TypedValue::DateTime(a), TypedValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Coerces a JSON literal from the expression tree to the declared type.
///
/// Expression literals are checked strictly: an int field takes integral
/// JSON numbers only, a bool field takes JSON booleans, temporal fields
/// take strings in their canonical format.
pub fn coerce_literal(datatype: FieldType, literal: &Value, field: &str) -> FilterResult<TypedValue> {
    let coerced = match (datatype, literal) {
        (FieldType::String, Value::String(s)) => Some(TypedValue::Str(s.clone())),
        (FieldType::Int, Value::Number(n)) => n.as_i64().map(TypedValue::Int),
        (FieldType::Float, Value::Number(n)) => n.as_f64().map(TypedValue::Float),
        (FieldType::Bool, Value::Bool(b)) => Some(TypedValue::Bool(*b)),
        (FieldType::Date, Value::String(s)) => parse_date(s).map(TypedValue::Date),
        (FieldType::Time, Value::String(s)) => parse_time(s).map(TypedValue::Time),
        (FieldType::DateTime, Value::String(s)) => parse_datetime(s).map(TypedValue::DateTime),
        _ => None,
    };
    coerced.ok_or_else(|| FilterError::type_mismatch(field, datatype, literal_repr(literal)))
}

/// Coerces a raw query-string value to the declared type.
///
/// Query-string values are always strings, so numeric and boolean fields
/// accept their string spellings here.
pub fn coerce_param(datatype: FieldType, raw: &str, field: &str) -> FilterResult<TypedValue> {
    let coerced = match datatype {
        FieldType::String => Some(TypedValue::Str(raw.to_string())),
        FieldType::Int => raw.parse().ok().map(TypedValue::Int),
        FieldType::Float => raw.parse().ok().map(TypedValue::Float),
        FieldType::Bool => match raw {
            "true" => Some(TypedValue::Bool(true)),
            "false" => Some(TypedValue::Bool(false)),
            _ => None,
        },
        FieldType::Date => parse_date(raw).map(TypedValue::Date),
        FieldType::Time => parse_time(raw).map(TypedValue::Time),
        FieldType::DateTime => parse_datetime(raw).map(TypedValue::DateTime),
    };
    coerced.ok_or_else(|| FilterError::type_mismatch(field, datatype, raw))
}

/// Coerces a stored attribute value to the declared type.
///
/// The feature side is lenient: a missing, null, or unreadable attribute
/// yields None, which makes the enclosing condition evaluate to false.
pub fn coerce_attr(datatype: FieldType, value: &Value) -> Option<TypedValue> {
    match datatype {
        FieldType::String => value.as_str().map(|s| TypedValue::Str(s.to_string())),
        FieldType::Int => value.as_i64().map(TypedValue::Int),
        // Int-valued attrs compare fine on a float field
        FieldType::Float => value.as_f64().map(TypedValue::Float),
        FieldType::Bool => value.as_bool().map(TypedValue::Bool),
        FieldType::Date => value.as_str().and_then(parse_date).map(TypedValue::Date),
        FieldType::Time => value.as_str().and_then(parse_time).map(TypedValue::Time),
        FieldType::DateTime => value
            .as_str()
            .and_then(parse_datetime)
            .map(TypedValue::DateTime),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT).ok()
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).ok()
}

/// Renders a literal for error messages without surrounding quotes
fn literal_repr(literal: &Value) -> String {
    match literal {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
