//! Bucket-name resolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::bucket::Bucket;
use crate::error::{Result, StorageError};

/// Resolves bucket names to bucket handles.
///
/// Callers memoize successful resolutions themselves (the root directory
/// keeps one handle per distinct name for the mount's lifetime), so an
/// implementation is free to do real setup work per call.
#[async_trait]
pub trait BucketManager: Send + Sync + std::fmt::Debug {
    /// Resolve `name` to a usable bucket handle.
    async fn set_up_bucket(&self, name: &str) -> Result<Arc<dyn Bucket>>;

    /// All bucket names this manager can resolve.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Release any resources held by the manager.
    fn shut_down(&self);
}

/// A [`BucketManager`] over a fixed in-process set of buckets.
#[derive(Debug, Default)]
pub struct StaticBucketManager {
    buckets: BTreeMap<String, Arc<dyn Bucket>>,
}

impl StaticBucketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bucket under its own name.
    pub fn insert(&mut self, bucket: Arc<dyn Bucket>) {
        self.buckets.insert(bucket.name().to_string(), bucket);
    }
}

#[async_trait]
impl BucketManager for StaticBucketManager {
    async fn set_up_bucket(&self, name: &str) -> Result<Arc<dyn Bucket>> {
        self.buckets
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::BucketNotFound {
                name: name.to_string(),
            })
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self.buckets.keys().cloned().collect())
    }

    fn shut_down(&self) {
        debug!(buckets = self.buckets.len(), "static bucket manager shut down");
    }
}
