//! Spatial predicate adapter
//!
//! Geometry math stays with the geometry collaborator; this core only
//! consumes a boolean "does the feature intersect" test and composes it
//! into the request predicate.

use crate::feature::Feature;
use crate::filter::{FilterError, FilterResult};

/// Black-box intersection test supplied by the geometry collaborator
pub trait SpatialPredicate: Send + Sync {
    /// True when the feature's geometry intersects the request geometry
    fn intersects(&self, feature: &Feature) -> bool;
}

/// Adapts a plain closure into a spatial predicate
pub struct FnPredicate<F>(F);

impl<F> FnPredicate<F>
where
    F: Fn(&Feature) -> bool + Send + Sync,
{
    /// Wraps a closure
    pub fn new(test: F) -> Self {
        Self(test)
    }
}

impl<F> SpatialPredicate for FnPredicate<F>
where
    F: Fn(&Feature) -> bool + Send + Sync,
{
    fn intersects(&self, feature: &Feature) -> bool {
        (self.0)(feature)
    }
}

/// Axis-aligned bounding box, the simplest `intersects` request literal.
///
/// Parsing lives here so a malformed geometry literal fails validation
/// with the other filter sources, before any feature is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Envelope {
    /// Parses `"xmin,ymin,xmax,ymax"`
    pub fn parse(raw: &str) -> FilterResult<Self> {
        let coords = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| {
                FilterError::invalid_range(format!("envelope '{}' has non-numeric coordinates", raw))
            })?;
        if coords.len() != 4 {
            return Err(FilterError::invalid_range(format!(
                "envelope '{}' must have four comma-separated coordinates",
                raw
            )));
        }
        let envelope = Self {
            xmin: coords[0],
            ymin: coords[1],
            xmax: coords[2],
            ymax: coords[3],
        };
        if envelope.xmin > envelope.xmax || envelope.ymin > envelope.ymax {
            return Err(FilterError::invalid_range(format!(
                "envelope '{}' has inverted bounds",
                raw
            )));
        }
        Ok(envelope)
    }

    /// True when a point lies inside or on the boundary
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}
