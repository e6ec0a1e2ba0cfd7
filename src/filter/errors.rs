//! Filter validation error taxonomy
//!
//! Every failure here is a local validation failure: the surrounding
//! request layer maps the whole class to a client error, nothing is
//! retried, and no partial query execution happens after a failure.

use thiserror::Error;

use crate::schema::FieldType;

/// Result type for filter validation and compilation
pub type FilterResult<T> = Result<T, FilterError>;

/// Validation failures raised while parsing and compiling filter sources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Invalid JSON or a grammar shape violation in the expression tree
    #[error("malformed filter expression: {0}")]
    MalformedExpression(String),

    /// Unknown combinator or comparison operator
    #[error("unsupported operator '{0}'")]
    UnsupportedOperator(String),

    /// Field not present in the layer schema (expression or quick filter)
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Literal does not coerce to the field's declared type
    #[error("value '{value}' is not valid for {expected} field '{field}'")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        value: String,
    },

    /// Inverted or unparsable range bound (id family, pagination, envelope)
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

impl FilterError {
    /// Create a malformed expression error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedExpression(reason.into())
    }

    /// Create an unsupported operator error
    pub fn unsupported(operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator(operator.into())
    }

    /// Create an unknown field error
    pub fn unknown_field(keyname: impl Into<String>) -> Self {
        Self::UnknownField(keyname.into())
    }

    /// Create a type mismatch error for a literal that failed coercion
    pub fn type_mismatch(field: &str, datatype: FieldType, value: impl ToString) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected: datatype.type_name(),
            value: value.to_string(),
        }
    }

    /// Create an invalid range error
    pub fn invalid_range(reason: impl Into<String>) -> Self {
        Self::InvalidRange(reason.into())
    }

    /// Returns the stable string code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::MalformedExpression(_) => "MALFORMED_EXPRESSION",
            FilterError::UnsupportedOperator(_) => "UNSUPPORTED_OPERATOR",
            FilterError::UnknownField(_) => "UNKNOWN_FIELD",
            FilterError::TypeMismatch { .. } => "TYPE_MISMATCH",
            FilterError::InvalidRange(_) => "INVALID_RANGE",
        }
    }
}
