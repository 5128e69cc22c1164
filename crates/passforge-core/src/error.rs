//! The crate's error taxonomy.

/// Errors that can occur while building, rebuilding, or matching over the tree model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Rebuilding a record failed because a field was missing or did not satisfy
    /// the record's schema.
    #[error("schema violation rebuilding `{kind}`: field `{field}`")]
    SchemaViolation { kind: &'static str, field: String },

    /// A pass was invoked with something other than a valid [`crate::cache::Cache`]
    /// where one was required.
    #[error("invalid analysis cache assignment")]
    InvalidCacheAssignment,

    /// The pattern compiler encountered a construct it does not support.
    #[error("unsupported pattern form: {0}")]
    UnsupportedPattern(String),

    /// Never constructed: a conversion rule's dispatch chain exhausting (no
    /// `map_<Kind>` handler and no `generic_map`) is benign, not an error — it
    /// falls back to `Output::default()` (see [`crate::rule::ConversionRule::apply`]).
    /// Kept in the taxonomy for parity with the dispatch-miss variants other
    /// rule flavors would need if they ever gained one.
    #[error("no conversion handler for kind `{kind}`")]
    UnsupportedNodeInDispatch { kind: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
