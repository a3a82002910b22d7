//! Shared test doubles for the integration suites.

#![allow(dead_code)]

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use store::{
    Bucket, BucketManager, ComposeObjectsRequest, CreateObjectRequest, ListObjectsRequest,
    Listing, MemoryBucket, Object, StaticBucketManager, StorageError,
};

use bucketfs::{FsConfig, InodeAttributes};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn test_attrs() -> InodeAttributes {
    // Fixed timestamp so repeated calls compare equal.
    FsConfig::with_owner(1000, 1000).dir_attributes(chrono::DateTime::<Utc>::UNIX_EPOCH)
}

/// A bucket decorator that counts calls per operation.
#[derive(Debug)]
pub struct CountingBucket {
    inner: Arc<dyn Bucket>,
    pub stats: AtomicUsize,
    pub reads: AtomicUsize,
    pub creates: AtomicUsize,
    pub lists: AtomicUsize,
}

impl CountingBucket {
    pub fn new(inner: Arc<dyn Bucket>) -> Self {
        Self {
            inner,
            stats: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
        }
    }

    pub fn stat_count(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bucket for CountingBucket {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn create_object(&self, req: CreateObjectRequest) -> store::Result<Object> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_object(req).await
    }

    async fn compose_objects(&self, req: ComposeObjectsRequest) -> store::Result<Object> {
        self.inner.compose_objects(req).await
    }

    async fn stat_object(&self, name: &str) -> store::Result<Object> {
        self.stats.fetch_add(1, Ordering::SeqCst);
        self.inner.stat_object(name).await
    }

    async fn read_object(
        &self,
        name: &str,
        generation: i64,
        range: Range<u64>,
    ) -> store::Result<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_object(name, generation, range).await
    }

    async fn list_objects(&self, req: ListObjectsRequest) -> store::Result<Listing> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_objects(req).await
    }

    async fn delete_object(&self, name: &str) -> store::Result<()> {
        self.inner.delete_object(name).await
    }
}

/// A bucket whose reads always fail with a backend fault.
#[derive(Debug)]
pub struct FailingBucket;

fn backend_fault() -> StorageError {
    StorageError::Backend(anyhow::anyhow!("transient backend fault"))
}

#[async_trait]
impl Bucket for FailingBucket {
    fn name(&self) -> &str {
        "failing"
    }

    async fn create_object(&self, _req: CreateObjectRequest) -> store::Result<Object> {
        Err(backend_fault())
    }

    async fn compose_objects(&self, _req: ComposeObjectsRequest) -> store::Result<Object> {
        Err(backend_fault())
    }

    async fn stat_object(&self, _name: &str) -> store::Result<Object> {
        Err(backend_fault())
    }

    async fn read_object(
        &self,
        _name: &str,
        _generation: i64,
        _range: Range<u64>,
    ) -> store::Result<Bytes> {
        Err(backend_fault())
    }

    async fn list_objects(&self, _req: ListObjectsRequest) -> store::Result<Listing> {
        Err(backend_fault())
    }

    async fn delete_object(&self, _name: &str) -> store::Result<()> {
        Err(backend_fault())
    }
}

/// A bucket manager that counts resolution attempts.
#[derive(Debug)]
pub struct CountingManager {
    inner: StaticBucketManager,
    times: AtomicUsize,
}

impl CountingManager {
    /// A manager serving in-memory buckets with the given names.
    pub fn with_buckets(names: &[&str]) -> Self {
        let mut inner = StaticBucketManager::new();
        for name in names {
            inner.insert(Arc::new(MemoryBucket::new(*name)));
        }
        Self {
            inner,
            times: AtomicUsize::new(0),
        }
    }

    /// How many times `set_up_bucket` has been invoked.
    pub fn set_up_times(&self) -> usize {
        self.times.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BucketManager for CountingManager {
    async fn set_up_bucket(&self, name: &str) -> store::Result<Arc<dyn Bucket>> {
        self.times.fetch_add(1, Ordering::SeqCst);
        self.inner.set_up_bucket(name).await
    }

    async fn list_buckets(&self) -> store::Result<Vec<String>> {
        self.inner.list_buckets().await
    }

    fn shut_down(&self) {
        self.inner.shut_down();
    }
}
