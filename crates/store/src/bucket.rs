//! The bucket capability trait and its request/response types.

use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::object::Object;

/// Request to create (or rewrite) an object.
#[derive(Debug, Clone, Default)]
pub struct CreateObjectRequest {
    /// Destination name within the bucket.
    pub name: String,
    /// Full object contents.
    pub contents: Bytes,
    /// MIME type to record on the object.
    pub content_type: Option<String>,
    /// Cache-control directive to record on the object.
    pub cache_control: Option<String>,
    /// If set, the create succeeds only when the live content generation
    /// equals this value. Zero means "must not exist".
    pub generation_precondition: Option<i64>,
}

/// Request to concatenate existing objects into a destination object.
#[derive(Debug, Clone, Default)]
pub struct ComposeObjectsRequest {
    /// Destination name within the bucket.
    pub dst_name: String,
    /// Source object names, concatenated in order.
    pub sources: Vec<String>,
    /// MIME type to record on the destination.
    pub content_type: Option<String>,
    /// Cache-control directive to record on the destination.
    pub cache_control: Option<String>,
    /// Generation precondition on the destination, as for create.
    pub dst_generation_precondition: Option<i64>,
}

/// Request to list objects by prefix.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsRequest {
    /// Only names starting with this prefix are returned.
    pub prefix: String,
    /// When set, names containing the delimiter past the prefix are
    /// collapsed into a single prefix entry instead of being listed.
    pub delimiter: Option<char>,
}

/// One page of listing results.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Objects whose names contain no delimiter past the prefix.
    pub objects: Vec<Object>,
    /// Collapsed prefixes, each ending in the delimiter.
    pub collapsed_prefixes: Vec<String>,
}

/// A named collection of generation-versioned objects.
///
/// Implementations must be safe to share across tasks; all operations are
/// cancel-safe in the usual cooperative sense (dropping the future aborts
/// the in-flight work).
#[async_trait]
pub trait Bucket: Send + Sync + std::fmt::Debug {
    /// The bucket's name.
    fn name(&self) -> &str;

    /// Create a new generation of the named object.
    async fn create_object(&self, req: CreateObjectRequest) -> Result<Object>;

    /// Concatenate source objects into a destination object.
    async fn compose_objects(&self, req: ComposeObjectsRequest) -> Result<Object>;

    /// Look up the newest generation of the named object.
    async fn stat_object(&self, name: &str) -> Result<Object>;

    /// Read a byte range from one fixed generation of the named object.
    ///
    /// A `generation` of zero selects the newest. The range is clamped to
    /// the object's size; a range wholly past the end yields empty bytes.
    /// Reading a generation the store no longer holds is `NotFound`.
    async fn read_object(&self, name: &str, generation: i64, range: Range<u64>) -> Result<Bytes>;

    /// List objects by prefix, optionally collapsing at a delimiter.
    async fn list_objects(&self, req: ListObjectsRequest) -> Result<Listing>;

    /// Delete the named object, all generations included.
    async fn delete_object(&self, name: &str) -> Result<()>;
}
