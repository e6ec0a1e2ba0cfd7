//! Predicate composition
//!
//! Combines whichever filter sources a request supplied (expression tree,
//! per-field quick filters, id constraints, substring filter, spatial
//! predicate) under AND semantics into one composed predicate. A feature
//! matches only when every supplied source holds; a request with no
//! sources matches everything.

use std::fmt;

use log::debug;

use crate::feature::Feature;
use crate::filter::{ExpressionParser, FilterNode, FilterResult};
use crate::request::{FilterParams, IdFilter, QuickFilter, QuickFilterCompiler};
use crate::schema::LayerSchema;
use crate::spatial::SpatialPredicate;

/// Case-insensitive substring match over the layer's string-typed fields.
///
/// Policy: both the needle and every consulted attribute are lowercased
/// (Unicode case folding via `str::to_lowercase`); only fields declared
/// `string` are consulted, never numeric or temporal ones.
#[derive(Debug, Clone)]
pub struct LikeFilter {
    needle: String,
    fields: Vec<String>,
}

impl LikeFilter {
    /// Builds a substring filter over the schema's textual fields
    pub fn new(needle: &str, schema: &LayerSchema) -> Self {
        Self {
            needle: needle.to_lowercase(),
            fields: schema.string_fields().map(str::to_string).collect(),
        }
    }

    /// True when any textual attribute contains the needle
    pub fn matches(&self, feature: &Feature) -> bool {
        self.fields.iter().any(|field| {
            feature
                .attr(field)
                .and_then(|v| v.as_str())
                .is_some_and(|s| s.to_lowercase().contains(&self.needle))
        })
    }
}

/// AND-combination of every filter source supplied on one request
pub struct ComposedPredicate {
    expression: Option<FilterNode>,
    quick: Vec<QuickFilter>,
    id: IdFilter,
    like: Option<LikeFilter>,
    spatial: Option<Box<dyn SpatialPredicate>>,
}

impl ComposedPredicate {
    /// Predicate with no sources; matches every feature
    pub fn match_all() -> Self {
        Self {
            expression: None,
            quick: Vec::new(),
            id: IdFilter::default(),
            like: None,
            spatial: None,
        }
    }

    /// True when at least one filter source was supplied.
    ///
    /// Drives the count contract: `filtered_count` is reported only for
    /// constrained predicates.
    pub fn is_constrained(&self) -> bool {
        self.expression.is_some()
            || !self.quick.is_empty()
            || !self.id.is_empty()
            || self.like.is_some()
            || self.spatial.is_some()
    }

    /// True when every supplied source holds for the feature
    pub fn matches(&self, feature: &Feature) -> bool {
        if let Some(expression) = &self.expression {
            if !expression.matches(feature) {
                return false;
            }
        }
        if !self.quick.iter().all(|q| q.matches(feature)) {
            return false;
        }
        if !self.id.matches(feature) {
            return false;
        }
        if let Some(like) = &self.like {
            if !like.matches(feature) {
                return false;
            }
        }
        if let Some(spatial) = &self.spatial {
            if !spatial.intersects(feature) {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for ComposedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedPredicate")
            .field("expression", &self.expression)
            .field("quick", &self.quick)
            .field("id", &self.id)
            .field("like", &self.like)
            .field("spatial", &self.spatial.is_some())
            .finish()
    }
}

/// Compiles every filter source of a request into one composed predicate
pub struct PredicateCompiler<'a> {
    schema: &'a LayerSchema,
}

impl<'a> PredicateCompiler<'a> {
    /// Creates a compiler bound to a layer schema
    pub fn new(schema: &'a LayerSchema) -> Self {
        Self { schema }
    }

    /// Parses and validates every supplied filter source.
    ///
    /// Any validation failure aborts the whole request before a single
    /// feature is read; there is no partial compilation. The spatial
    /// predicate arrives pre-built from the geometry collaborator.
    pub fn compile(
        &self,
        params: &FilterParams,
        spatial: Option<Box<dyn SpatialPredicate>>,
    ) -> FilterResult<ComposedPredicate> {
        let expression = match params.filter.as_deref() {
            Some(raw) => ExpressionParser::new(self.schema).parse_str(raw)?,
            None => None,
        };
        let (quick, id) = QuickFilterCompiler::new(self.schema).compile(params)?;
        let like = params
            .like
            .as_deref()
            .map(|needle| LikeFilter::new(needle, self.schema));

        let predicate = ComposedPredicate {
            expression,
            quick,
            id,
            like,
            spatial,
        };
        debug!(
            "compiled predicate: constrained={} quick_fragments={}",
            predicate.is_constrained(),
            predicate.quick.len()
        );
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;
    use crate::spatial::FnPredicate;
    use serde_json::json;

    fn schema() -> LayerSchema {
        LayerSchema::new()
            .with_field("name", FieldType::String)
            .with_field("city", FieldType::String)
            .with_field("age", FieldType::Int)
    }

    fn feature(id: i64, name: &str, city: &str, age: i64) -> Feature {
        let attrs = json!({"name": name, "city": city, "age": age})
            .as_object()
            .unwrap()
            .clone();
        Feature::new(id, attrs)
    }

    fn compile(params: FilterParams) -> FilterResult<ComposedPredicate> {
        let schema = schema();
        PredicateCompiler::new(&schema).compile(&params, None)
    }

    #[test]
    fn test_no_sources_matches_everything() {
        let predicate = compile(FilterParams::new()).unwrap();
        assert!(!predicate.is_constrained());
        assert!(predicate.matches(&feature(1, "Alice", "NYC", 25)));
    }

    #[test]
    fn test_empty_expression_is_not_a_source() {
        let predicate = compile(FilterParams::new().with_filter("[]")).unwrap();
        assert!(!predicate.is_constrained());
        assert!(predicate.matches(&feature(1, "Alice", "NYC", 25)));
    }

    #[test]
    fn test_expression_source() {
        let predicate = compile(
            FilterParams::new().with_filter(r#"["all", ["==", ["get", "city"], "NYC"]]"#),
        )
        .unwrap();
        assert!(predicate.is_constrained());
        assert!(predicate.matches(&feature(1, "Alice", "NYC", 25)));
        assert!(!predicate.matches(&feature(2, "Bob", "LA", 30)));
    }

    #[test]
    fn test_all_sources_and_combined() {
        let mut params = FilterParams::new()
            .with_filter(r#"["all", [">", ["get", "age"], 20]]"#)
            .with_quick("city", "NYC")
            .with_like("ali");
        params.id_le = Some("3".into());

        let schema = schema();
        let spatial: Box<dyn SpatialPredicate> = Box::new(FnPredicate::new(|f: &Feature| f.id != 2));
        let predicate = PredicateCompiler::new(&schema)
            .compile(&params, Some(spatial))
            .unwrap();

        // Holds every source
        assert!(predicate.matches(&feature(1, "Alice", "NYC", 25)));
        // Fails the spatial source only
        assert!(!predicate.matches(&feature(2, "Alina", "NYC", 25)));
        // Fails the id source only
        assert!(!predicate.matches(&feature(4, "Alina", "NYC", 25)));
        // Fails the quick source only
        assert!(!predicate.matches(&feature(1, "Alice", "LA", 25)));
        // Fails the like source only
        assert!(!predicate.matches(&feature(1, "Bob", "NYC", 25)));
        // Fails the expression source only
        assert!(!predicate.matches(&feature(1, "Alice", "NYC", 18)));
    }

    #[test]
    fn test_like_case_insensitive_over_string_fields() {
        let schema = schema();
        let like = LikeFilter::new("NYC", &schema);
        assert!(like.matches(&feature(1, "Alice", "nyc", 25)));

        // Needle present only in a non-string field is not a match
        let like = LikeFilter::new("25", &schema);
        assert!(!like.matches(&feature(1, "Alice", "NYC", 25)));
    }

    #[test]
    fn test_validation_failure_propagates() {
        let err = compile(FilterParams::new().with_quick("nonexistent", "1")).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_FIELD");

        let err = compile(FilterParams::new().with_filter("not json")).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_EXPRESSION");
    }

    #[test]
    fn test_spatial_only_is_constrained() {
        let schema = schema();
        let spatial: Box<dyn SpatialPredicate> = Box::new(FnPredicate::new(|_: &Feature| true));
        let predicate = PredicateCompiler::new(&schema)
            .compile(&FilterParams::new(), Some(spatial))
            .unwrap();
        assert!(predicate.is_constrained());
    }
}
