//! Quick-filter compiler
//!
//! Compiles the per-field `fld_<keyname>[__<op>]` parameters and the
//! `id`/`id__ge`/`id__le` family into predicate fragments, independent of
//! the expression tree. Fragments on different fields combine by AND.

use std::cmp::Ordering;

use crate::feature::Feature;
use crate::filter::coerce::{self, TypedValue};
use crate::filter::{FilterError, FilterResult};
use crate::schema::{FieldType, LayerSchema};

use super::params::FilterParams;

/// Operator suffix of a quick filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickOp {
    /// Implicit when no suffix is present
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl QuickOp {
    /// Resolves a parameter suffix to an operator
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "eq" => Some(QuickOp::Eq),
            "gt" => Some(QuickOp::Gt),
            "ge" => Some(QuickOp::Ge),
            "lt" => Some(QuickOp::Lt),
            "le" => Some(QuickOp::Le),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickOp::Eq => "eq",
            QuickOp::Gt => "gt",
            QuickOp::Ge => "ge",
            QuickOp::Lt => "lt",
            QuickOp::Le => "le",
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            QuickOp::Eq => ordering == Ordering::Equal,
            QuickOp::Gt => ordering == Ordering::Greater,
            QuickOp::Ge => ordering != Ordering::Less,
            QuickOp::Lt => ordering == Ordering::Less,
            QuickOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// One compiled per-field filter fragment
#[derive(Debug, Clone, PartialEq)]
pub struct QuickFilter {
    pub field: String,
    pub datatype: FieldType,
    pub op: QuickOp,
    pub value: TypedValue,
}

impl QuickFilter {
    /// True when the feature's attribute satisfies this fragment
    pub fn matches(&self, feature: &Feature) -> bool {
        let actual = feature
            .attr(&self.field)
            .and_then(|v| coerce::coerce_attr(self.datatype, v));
        match actual {
            Some(actual) => match actual.compare(&self.value) {
                Some(ordering) => self.op.holds(ordering),
                None => false,
            },
            None => false,
        }
    }
}

/// Constraints on the identity column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdFilter {
    /// Exact identity (`id`)
    pub eq: Option<i64>,
    /// Inclusive lower bound (`id__ge`)
    pub ge: Option<i64>,
    /// Inclusive upper bound (`id__le`)
    pub le: Option<i64>,
}

impl IdFilter {
    /// True when no identity constraint was supplied
    pub fn is_empty(&self) -> bool {
        self.eq.is_none() && self.ge.is_none() && self.le.is_none()
    }

    /// True when the feature's identity satisfies every present bound
    pub fn matches(&self, feature: &Feature) -> bool {
        self.eq.map_or(true, |v| feature.id == v)
            && self.ge.map_or(true, |v| feature.id >= v)
            && self.le.map_or(true, |v| feature.id <= v)
    }
}

/// Compiles quick filters against one layer schema
pub struct QuickFilterCompiler<'a> {
    schema: &'a LayerSchema,
}

impl<'a> QuickFilterCompiler<'a> {
    /// Creates a compiler bound to a layer schema
    pub fn new(schema: &'a LayerSchema) -> Self {
        Self { schema }
    }

    /// Compiles every quick and id parameter of a request.
    ///
    /// Unknown keynames fail with `UnknownField`, values that do not
    /// coerce with `TypeMismatch`, and unparsable or inverted id bounds
    /// with `InvalidRange`.
    pub fn compile(&self, params: &FilterParams) -> FilterResult<(Vec<QuickFilter>, IdFilter)> {
        let mut fragments = Vec::with_capacity(params.quick.len());
        for (name, raw) in &params.quick {
            let (keyname, op) = split_suffix(name);
            let datatype = self
                .schema
                .lookup(keyname)
                .ok_or_else(|| FilterError::unknown_field(keyname))?;
            let value = coerce::coerce_param(datatype, raw, keyname)?;
            fragments.push(QuickFilter {
                field: keyname.to_string(),
                datatype,
                op,
                value,
            });
        }
        Ok((fragments, self.compile_id(params)?))
    }

    fn compile_id(&self, params: &FilterParams) -> FilterResult<IdFilter> {
        let id = IdFilter {
            eq: parse_id("id", params.id.as_deref())?,
            ge: parse_id("id__ge", params.id_ge.as_deref())?,
            le: parse_id("id__le", params.id_le.as_deref())?,
        };
        if let (Some(ge), Some(le)) = (id.ge, id.le) {
            if ge > le {
                return Err(FilterError::invalid_range(format!(
                    "id__ge {} exceeds id__le {}",
                    ge, le
                )));
            }
        }
        Ok(id)
    }
}

/// Splits `keyname__op`; anything without a recognized operator suffix is
/// a plain keyname with implicit eq.
fn split_suffix(name: &str) -> (&str, QuickOp) {
    if let Some((field, suffix)) = name.rsplit_once("__") {
        if let Some(op) = QuickOp::from_suffix(suffix) {
            return (field, op);
        }
    }
    (name, QuickOp::Eq)
}

fn parse_id(param: &str, raw: Option<&str>) -> FilterResult<Option<i64>> {
    raw.map(|s| {
        s.parse::<i64>()
            .map_err(|_| FilterError::invalid_range(format!("'{}' is not a valid {}", s, param)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> LayerSchema {
        LayerSchema::new()
            .with_field("city", FieldType::String)
            .with_field("age", FieldType::Int)
            .with_field("score", FieldType::Float)
    }

    fn feature(id: i64, city: &str, age: i64) -> Feature {
        let attrs = json!({"city": city, "age": age})
            .as_object()
            .unwrap()
            .clone();
        Feature::new(id, attrs)
    }

    fn compile(params: FilterParams) -> FilterResult<(Vec<QuickFilter>, IdFilter)> {
        let schema = schema();
        QuickFilterCompiler::new(&schema).compile(&params)
    }

    #[test]
    fn test_implicit_eq() {
        let (fragments, _) = compile(FilterParams::new().with_quick("city", "NYC")).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].op, QuickOp::Eq);
        assert!(fragments[0].matches(&feature(1, "NYC", 25)));
        assert!(!fragments[0].matches(&feature(2, "LA", 30)));
    }

    #[test]
    fn test_suffix_operators() {
        let (fragments, _) = compile(FilterParams::new().with_quick("age__ge", "26")).unwrap();
        assert_eq!(fragments[0].op, QuickOp::Ge);
        assert!(fragments[0].matches(&feature(1, "NYC", 26)));
        assert!(!fragments[0].matches(&feature(2, "NYC", 25)));
    }

    #[test]
    fn test_unknown_suffix_folds_into_keyname() {
        let err = compile(FilterParams::new().with_quick("age__max", "26")).unwrap_err();
        assert_eq!(err, FilterError::unknown_field("age__max"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = compile(FilterParams::new().with_quick("nonexistent", "1")).unwrap_err();
        assert_eq!(err, FilterError::unknown_field("nonexistent"));
    }

    #[test]
    fn test_value_type_mismatch() {
        let err = compile(FilterParams::new().with_quick("age", "old")).unwrap_err();
        assert_eq!(err.code(), "TYPE_MISMATCH");
    }

    #[test]
    fn test_id_family() {
        let mut params = FilterParams::new();
        params.id_ge = Some("2".into());
        params.id_le = Some("4".into());
        let (_, id) = compile(params).unwrap();

        assert!(!id.is_empty());
        assert!(!id.matches(&feature(1, "NYC", 25)));
        assert!(id.matches(&feature(2, "NYC", 25)));
        assert!(id.matches(&feature(4, "NYC", 25)));
        assert!(!id.matches(&feature(5, "NYC", 25)));
    }

    #[test]
    fn test_id_exact() {
        let mut params = FilterParams::new();
        params.id = Some("3".into());
        let (_, id) = compile(params).unwrap();
        assert!(id.matches(&feature(3, "NYC", 25)));
        assert!(!id.matches(&feature(4, "NYC", 25)));
    }

    #[test]
    fn test_inverted_id_range_rejected() {
        let mut params = FilterParams::new();
        params.id_ge = Some("5".into());
        params.id_le = Some("2".into());
        let err = compile(params).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE");
    }

    #[test]
    fn test_unparsable_id_rejected() {
        let mut params = FilterParams::new();
        params.id = Some("abc".into());
        let err = compile(params).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE");
    }

    #[test]
    fn test_empty_id_filter_passes_everything() {
        let id = IdFilter::default();
        assert!(id.is_empty());
        assert!(id.matches(&feature(42, "NYC", 25)));
    }

    #[test]
    fn test_multiple_fragments() {
        let (fragments, _) = compile(
            FilterParams::new()
                .with_quick("city", "NYC")
                .with_quick("age__lt", "30"),
        )
        .unwrap();
        assert_eq!(fragments.len(), 2);
        let f = feature(1, "NYC", 25);
        assert!(fragments.iter().all(|q| q.matches(&f)));
        let g = feature(2, "NYC", 35);
        assert!(!fragments.iter().all(|q| q.matches(&g)));
    }
}
