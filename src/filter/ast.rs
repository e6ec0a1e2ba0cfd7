//! Filter expression AST
//!
//! The parsed, validated form of the JSON filter expression. Every literal
//! in the tree has already been coerced to its field's declared type, so
//! evaluation is pure and cannot fail.

use std::cmp::Ordering;

use crate::feature::Feature;
use crate::schema::FieldType;

use super::coerce::{self, TypedValue};

/// Boolean group operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Logical AND over children; empty children hold
    All,
    /// Logical OR over children; empty children do not hold
    Any,
}

impl Combinator {
    /// Resolves an expression tag to a combinator
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "all" => Some(Combinator::All),
            "any" => Some(Combinator::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::All => "all",
            Combinator::Any => "any",
        }
    }
}

/// Scalar comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Resolves an expression tag to a comparison operator
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// Whether an ordering between attribute and literal satisfies this operator
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// One node of the validated filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Boolean combination of child nodes
    Group {
        combinator: Combinator,
        children: Vec<FilterNode>,
    },
    /// Scalar comparison against one field
    Condition {
        op: CompareOp,
        field: String,
        datatype: FieldType,
        value: TypedValue,
    },
    /// Membership test against a literal list
    Membership {
        negated: bool,
        field: String,
        datatype: FieldType,
        values: Vec<TypedValue>,
    },
}

impl FilterNode {
    /// Create an AND group
    pub fn all(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            combinator: Combinator::All,
            children,
        }
    }

    /// Create an OR group
    pub fn any(children: Vec<FilterNode>) -> Self {
        FilterNode::Group {
            combinator: Combinator::Any,
            children,
        }
    }

    /// Create a comparison condition
    pub fn condition(
        op: CompareOp,
        field: impl Into<String>,
        datatype: FieldType,
        value: TypedValue,
    ) -> Self {
        FilterNode::Condition {
            op,
            field: field.into(),
            datatype,
            value,
        }
    }

    /// Create a membership condition
    pub fn membership(
        negated: bool,
        field: impl Into<String>,
        datatype: FieldType,
        values: Vec<TypedValue>,
    ) -> Self {
        FilterNode::Membership {
            negated,
            field: field.into(),
            datatype,
            values,
        }
    }

    /// Pure boolean evaluation against one feature.
    ///
    /// A missing or uncoercible attribute makes the enclosing condition
    /// false, also under negated operators; negation never matches data
    /// that is not there.
    pub fn matches(&self, feature: &Feature) -> bool {
        match self {
            FilterNode::Group {
                combinator: Combinator::All,
                children,
            } => children.iter().all(|c| c.matches(feature)),
            FilterNode::Group {
                combinator: Combinator::Any,
                children,
            } => children.iter().any(|c| c.matches(feature)),
            FilterNode::Condition {
                op,
                field,
                datatype,
                value,
            } => match attr_value(feature, field, *datatype) {
                Some(actual) => match actual.compare(value) {
                    Some(ordering) => op.holds(ordering),
                    None => false,
                },
                None => false,
            },
            FilterNode::Membership {
                negated,
                field,
                datatype,
                values,
            } => match attr_value(feature, field, *datatype) {
                Some(actual) => {
                    let found = values
                        .iter()
                        .any(|v| actual.compare(v) == Some(Ordering::Equal));
                    found != *negated
                }
                None => false,
            },
        }
    }
}

fn attr_value(feature: &Feature, field: &str, datatype: FieldType) -> Option<TypedValue> {
    feature
        .attr(field)
        .and_then(|v| coerce::coerce_attr(datatype, v))
}
