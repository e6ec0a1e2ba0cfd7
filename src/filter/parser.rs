//! Recursive-descent parser for the JSON filter expression
//!
//! Grammar over JSON arrays:
//!
//! ```text
//! Expr      := []                                    (empty => no filter)
//!            | [Combinator, Expr*]
//!            | [Operator, ["get", Field], Literal]
//!            | [InOp,     ["get", Field], [Literal*]]
//! Combinator := "all" | "any"
//! Operator   := "==" | "!=" | "<" | "<=" | ">" | ">="
//! InOp       := "in" | "!in"
//! ```
//!
//! Validation is eager: field names are checked against the layer schema
//! and every literal is coerced to its field's declared type, so a parsed
//! tree evaluates without touching the schema again.

use serde_json::Value;

use crate::schema::{FieldType, LayerSchema};

use super::ast::{Combinator, CompareOp, FilterNode};
use super::coerce::{self, TypedValue};
use super::errors::{FilterError, FilterResult};

/// Parses and validates filter expressions against one layer schema
pub struct ExpressionParser<'a> {
    schema: &'a LayerSchema,
}

impl<'a> ExpressionParser<'a> {
    /// Creates a parser bound to a layer schema
    pub fn new(schema: &'a LayerSchema) -> Self {
        Self { schema }
    }

    /// Parses a raw JSON string.
    ///
    /// JSON syntax errors surface as `MalformedExpression`.
    pub fn parse_str(&self, raw: &str) -> FilterResult<Option<FilterNode>> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| FilterError::malformed(format!("invalid JSON: {}", e)))?;
        self.parse(&value)
    }

    /// Parses a decoded JSON value.
    ///
    /// An empty array is the "no filter" sentinel and yields `None`.
    /// A non-empty top level must open with a combinator.
    pub fn parse(&self, value: &Value) -> FilterResult<Option<FilterNode>> {
        let items = as_node_array(value)?;
        if items.is_empty() {
            return Ok(None);
        }
        let tag = node_tag(items)?;
        let combinator = Combinator::from_tag(tag).ok_or_else(|| FilterError::unsupported(tag))?;
        Ok(Some(self.parse_group(combinator, &items[1..])?))
    }

    fn parse_group(&self, combinator: Combinator, rest: &[Value]) -> FilterResult<FilterNode> {
        let children = rest
            .iter()
            .map(|child| self.parse_node(child))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(FilterNode::Group {
            combinator,
            children,
        })
    }

    fn parse_node(&self, value: &Value) -> FilterResult<FilterNode> {
        let items = as_node_array(value)?;
        if items.is_empty() {
            return Err(FilterError::malformed("expression node must not be empty"));
        }
        let tag = node_tag(items)?;
        if let Some(combinator) = Combinator::from_tag(tag) {
            return self.parse_group(combinator, &items[1..]);
        }
        if let Some(op) = CompareOp::from_tag(tag) {
            return self.parse_condition(op, &items[1..]);
        }
        match tag {
            "in" => self.parse_membership(false, &items[1..]),
            "!in" => self.parse_membership(true, &items[1..]),
            other => Err(FilterError::unsupported(other)),
        }
    }

    fn parse_condition(&self, op: CompareOp, rest: &[Value]) -> FilterResult<FilterNode> {
        if rest.len() != 2 {
            return Err(FilterError::malformed(format!(
                "'{}' takes a field reference and one literal",
                op.as_str()
            )));
        }
        let (field, datatype) = self.field_ref(&rest[0])?;
        let value = self.scalar_literal(datatype, &rest[1], &field)?;
        Ok(FilterNode::condition(op, field, datatype, value))
    }

    fn parse_membership(&self, negated: bool, rest: &[Value]) -> FilterResult<FilterNode> {
        let tag = if negated { "!in" } else { "in" };
        if rest.len() != 2 {
            return Err(FilterError::malformed(format!(
                "'{}' takes a field reference and a literal list",
                tag
            )));
        }
        let (field, datatype) = self.field_ref(&rest[0])?;
        let items = rest[1].as_array().ok_or_else(|| {
            FilterError::malformed(format!("'{}' value must be a literal list", tag))
        })?;
        let values = items
            .iter()
            .map(|item| self.scalar_literal(datatype, item, &field))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(FilterNode::membership(negated, field, datatype, values))
    }

    /// Resolves a `["get", keyname]` reference against the schema
    fn field_ref(&self, value: &Value) -> FilterResult<(String, FieldType)> {
        let items = value
            .as_array()
            .filter(|items| items.len() == 2 && items[0].as_str() == Some("get"))
            .ok_or_else(|| {
                FilterError::malformed("field reference must be [\"get\", keyname]")
            })?;
        let keyname = items[1]
            .as_str()
            .ok_or_else(|| FilterError::malformed("field keyname must be a string"))?;
        let datatype = self
            .schema
            .lookup(keyname)
            .ok_or_else(|| FilterError::unknown_field(keyname))?;
        Ok((keyname.to_string(), datatype))
    }

    fn scalar_literal(
        &self,
        datatype: FieldType,
        literal: &Value,
        field: &str,
    ) -> FilterResult<TypedValue> {
        if !matches!(
            literal,
            Value::String(_) | Value::Number(_) | Value::Bool(_)
        ) {
            return Err(FilterError::malformed(format!(
                "literal for field '{}' must be a scalar",
                field
            )));
        }
        coerce::coerce_literal(datatype, literal, field)
    }
}

fn as_node_array(value: &Value) -> FilterResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| FilterError::malformed("expression node must be a JSON array"))
}

fn node_tag(items: &[Value]) -> FilterResult<&str> {
    items[0]
        .as_str()
        .ok_or_else(|| FilterError::malformed("expression tag must be a string"))
}
