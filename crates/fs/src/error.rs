//! Error types for the inode layer.

use store::StorageError;

/// Result type alias using [`FsError`].
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors surfaced by inode and handle operations.
///
/// Store-facing failures are wrapped with the operation that produced them
/// (`EnsureReader`, `ReadAt`, ...) so a failure is traceable without a stack
/// unwind. End-of-range is not represented here at all: a short read is a
/// successful read.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// A flush lost the race: the source generation the local content was
    /// based on is no longer live.
    #[error("source object clobbered remotely (generation {expected} no longer live)")]
    Clobbered { expected: i64 },

    /// An object record is unusable as a reader target.
    #[error("invalid object record for {name}: {reason}")]
    InvalidObjectRecord { name: String, reason: String },

    /// Failure while ensuring a generation-bound reader.
    #[error("try_ensure_reader: {0}")]
    EnsureReader(#[source] Box<FsError>),

    /// Failure in a reader's byte fetch.
    #[error("reader.read_at: {0}")]
    ReadAt(#[source] Box<FsError>),

    /// A storage fault with no more specific classification.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
