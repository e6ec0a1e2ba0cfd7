//! Raw request-parameter surface
//!
//! The HTTP layer owns transport and decoding; this struct carries only
//! the parameters the filtering core consumes, still as raw strings.

/// Prefix marking a per-field quick filter parameter
const FIELD_PARAM_PREFIX: &str = "fld_";

/// Decoded request parameters relevant to filtering.
///
/// Values stay raw; validation and coercion happen in the compilers so
/// that every failure carries its proper error kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    /// JSON filter expression (`filter`)
    pub filter: Option<String>,
    /// Per-field quick filters, `fld_` prefix stripped: (keyname[__op], value)
    pub quick: Vec<(String, String)>,
    /// Identity equality (`id`)
    pub id: Option<String>,
    /// Inclusive identity lower bound (`id__ge`)
    pub id_ge: Option<String>,
    /// Inclusive identity upper bound (`id__le`)
    pub id_le: Option<String>,
    /// Substring search over textual fields (`like`)
    pub like: Option<String>,
    /// Geometry literal for the spatial predicate (`intersects`)
    pub intersects: Option<String>,
    /// Sort field, `-` prefix for descending (`order_by`)
    pub order_by: Option<String>,
    /// Maximum returned features (`limit`)
    pub limit: Option<String>,
    /// Skipped matching features (`offset`)
    pub offset: Option<String>,
}

impl FilterParams {
    /// Creates an empty parameter set (no filter sources)
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects recognized parameters from decoded (key, value) pairs.
    ///
    /// Keys owned by other layers are ignored. A repeated key keeps the
    /// last value, matching usual query-string semantics.
    pub fn from_pairs<'p, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'p str, &'p str)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key {
                "filter" => params.filter = Some(value.to_string()),
                "id" => params.id = Some(value.to_string()),
                "id__ge" => params.id_ge = Some(value.to_string()),
                "id__le" => params.id_le = Some(value.to_string()),
                "like" => params.like = Some(value.to_string()),
                "intersects" => params.intersects = Some(value.to_string()),
                "order_by" => params.order_by = Some(value.to_string()),
                "limit" => params.limit = Some(value.to_string()),
                "offset" => params.offset = Some(value.to_string()),
                other => {
                    if let Some(name) = other.strip_prefix(FIELD_PARAM_PREFIX) {
                        params.quick.push((name.to_string(), value.to_string()));
                    }
                }
            }
        }
        params
    }

    /// Sets the JSON filter expression (builder style)
    pub fn with_filter(mut self, raw: impl Into<String>) -> Self {
        self.filter = Some(raw.into());
        self
    }

    /// Adds one quick filter as it would arrive without the `fld_` prefix
    pub fn with_quick(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.quick.push((name.into(), value.into()));
        self
    }

    /// Sets the substring filter
    pub fn with_like(mut self, needle: impl Into<String>) -> Self {
        self.like = Some(needle.into());
        self
    }

    /// Sets the sort field
    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }
}
