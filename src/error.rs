//! Error types for the merge engine.

use crate::value::Category;

/// Errors that can abort a merge.
///
/// Every error aborts the whole top-level call; no partial result is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MergeError {
    /// A top-level input is not a valid handle.
    #[error("{0} must not be an invalid value")]
    InvalidValue(&'static str),

    /// A reference layer that had to be followed points at no value.
    #[error("must not follow a nil reference ({0} side)")]
    NilReference(&'static str),

    /// A source field has no matching position in the destination record.
    #[error("field `{field}` is not addressable in record `{record}`")]
    NotAddressable { record: String, field: String },

    /// The destination position exists but cannot receive a merged result.
    #[error("field `{field}` of record `{record}` is not settable")]
    NotSettable { record: String, field: String },

    /// The strategy needs to walk the source as a container of another category.
    #[error(
        "kind not supported: {strategy} on {destination} cannot take a {source_category} source"
    )]
    KindNotSupported {
        strategy: String,
        destination: Category,
        source_category: Category,
    },

    /// A strategy name is not one of the choices for its category.
    #[error("invalid {category} strategy: {value}")]
    InvalidStrategy { category: Category, value: String },

    /// A resolver name is not one of the enumerated resolvers.
    #[error("unknown resolver: {0}")]
    UnknownResolver(String),

    /// A panic was caught by `safe_merge`.
    #[error("merge aborted: {0}")]
    Aborted(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
