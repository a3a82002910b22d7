//! Generation-versioned object storage capability
//!
//! This crate defines the storage surface the bucketfs inode layer sits on:
//! named, immutable, generation-versioned objects grouped into buckets.
//!
//! # Components
//!
//! - [`Bucket`]: the async capability trait (create/stat/read/list/compose/delete)
//! - [`MemoryBucket`]: an in-memory implementation used by tests and
//!   ephemeral mounts; retains superseded generations so bound readers keep
//!   working across rewrites
//! - [`CacheControlBucket`]: a transparent decorator that disables caching
//!   for streaming-manifest objects on create
//! - [`BucketManager`]: resolves bucket names to handles;
//!   [`StaticBucketManager`] serves a fixed in-process set

mod bucket;
mod cache_control;
mod error;
mod manager;
mod memory;
mod object;

pub use bucket::{
    Bucket, ComposeObjectsRequest, CreateObjectRequest, ListObjectsRequest, Listing,
};
pub use cache_control::CacheControlBucket;
pub use error::{Result, StorageError};
pub use manager::{BucketManager, StaticBucketManager};
pub use memory::MemoryBucket;
pub use object::{Generation, Object};
