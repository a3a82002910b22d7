//! The synthetic root directory, whose children are buckets.

use std::collections::HashMap;
use std::sync::Arc;

use store::{Bucket, BucketManager};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::inode::{
    ChildKind, DirEntry, InodeAttributes, InodeId, LookUpResult, LookupCount, Name,
};

/// The mount root when no single bucket is pinned: each child is a bucket,
/// resolved through the [`BucketManager`].
///
/// A successful resolution is memoized for the mount's lifetime; buckets are
/// assumed not to disappear, so there is no TTL and no re-validation. A
/// failed resolution is not memoized at all: looking the same missing name
/// up again asks the manager again.
#[derive(Debug)]
pub struct BaseDirInode {
    id: InodeId,
    name: Name,
    attrs: InodeAttributes,
    lookup_count: LookupCount,
    manager: Arc<dyn BucketManager>,
    /// Resolved buckets by name. Entries are written once, under this lock,
    /// and trusted thereafter.
    buckets: Mutex<HashMap<String, Arc<dyn Bucket>>>,
}

impl BaseDirInode {
    pub fn new(
        id: InodeId,
        attrs: InodeAttributes,
        manager: Arc<dyn BucketManager>,
    ) -> Self {
        Self {
            id,
            name: Name::root(),
            attrs,
            lookup_count: LookupCount::default(),
            manager,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> InodeId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Attributes as fixed at construction. The root has no backing object
    /// and no generation.
    pub fn attributes(&self) -> InodeAttributes {
        self.attrs
    }

    pub fn increment_lookup_count(&self) {
        self.lookup_count.increment();
    }

    /// Returns true iff the inode is now eligible for destruction.
    pub fn decrement_lookup_count(&self, n: u64) -> bool {
        self.lookup_count.decrement(n)
    }

    /// Resolve `name` as a bucket.
    ///
    /// `Ok(None)` means the manager could not set the bucket up; the
    /// underlying error is treated as "child does not exist", not as a
    /// propagated fault.
    pub async fn look_up_child(&self, name: &str) -> Result<Option<LookUpResult>> {
        let mut buckets = self.buckets.lock().await;

        let bucket = match buckets.get(name) {
            Some(bucket) => bucket.clone(),
            None => match self.manager.set_up_bucket(name).await {
                Ok(bucket) => {
                    buckets.insert(name.to_string(), bucket.clone());
                    bucket
                }
                Err(e) => {
                    debug!(bucket = %name, error = %e, "bucket resolution failed");
                    return Ok(None);
                }
            },
        };

        Ok(Some(LookUpResult {
            bucket,
            full_name: Name::bucket_root(name),
            object: None,
            implicit_dir: false,
        }))
    }

    /// List the root's children: one directory entry per bucket.
    pub async fn read_entries(&self) -> Result<Vec<DirEntry>> {
        let names = self.manager.list_buckets().await?;
        Ok(names
            .into_iter()
            .map(|name| DirEntry {
                name,
                kind: ChildKind::Dir,
                object: None,
            })
            .collect())
    }
}
