//! Error types for the storage capability layer.

/// Result type alias using [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors surfaced by bucket operations.
///
/// `NotFound` is its own variant so callers can treat a missing object or
/// bucket as "does not exist" without inspecting messages; everything else
/// is a real fault.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The named object (or requested generation of it) does not exist.
    #[error("object not found: {name}")]
    NotFound { name: String },

    /// The named bucket does not exist.
    #[error("bucket not found: {name}")]
    BucketNotFound { name: String },

    /// A create was conditioned on a generation that is no longer live.
    #[error("generation precondition failed for {name}: required {required}, live generation is {live}")]
    PreconditionFailed {
        name: String,
        required: i64,
        live: i64,
    },

    /// The request itself was malformed.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// A fault in the backing store.
    #[error("storage backend: {0}")]
    Backend(#[source] anyhow::Error),
}

impl StorageError {
    /// Whether this error means "the thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound { .. } | StorageError::BucketNotFound { .. }
        )
    }
}
