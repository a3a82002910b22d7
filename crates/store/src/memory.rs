//! In-memory bucket implementation.
//!
//! Used by tests and ephemeral mounts. Generations advance monotonically on
//! every create; superseded generations stay readable by explicit generation
//! number so a reader bound to an old snapshot keeps working after a
//! rewrite, while `stat_object` and `list_objects` expose only the newest.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use crate::bucket::{
    Bucket, ComposeObjectsRequest, CreateObjectRequest, ListObjectsRequest, Listing,
};
use crate::error::{Result, StorageError};
use crate::object::Object;

#[derive(Debug, Clone)]
struct StoredGeneration {
    record: Object,
    data: Bytes,
}

#[derive(Debug, Default)]
struct Inner {
    /// Name → generations, oldest first. The last entry is live.
    objects: BTreeMap<String, Vec<StoredGeneration>>,
    next_generation: i64,
}

/// An in-memory [`Bucket`].
#[derive(Debug)]
pub struct MemoryBucket {
    name: String,
    inner: Mutex<Inner>,
}

impl MemoryBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(Inner {
                objects: BTreeMap::new(),
                next_generation: 1,
            }),
        }
    }

    fn live_generation(inner: &Inner, name: &str) -> i64 {
        inner
            .objects
            .get(name)
            .and_then(|v| v.last())
            .map(|s| s.record.generation)
            .unwrap_or(0)
    }

    fn check_precondition(inner: &Inner, name: &str, required: Option<i64>) -> Result<()> {
        let live = Self::live_generation(inner, name);
        match required {
            Some(required) if required != live => Err(StorageError::PreconditionFailed {
                name: name.to_string(),
                required,
                live,
            }),
            _ => Ok(()),
        }
    }

    /// Store new content for `name`, advancing the content generation.
    fn store(
        inner: &mut Inner,
        name: &str,
        data: Bytes,
        content_type: Option<String>,
        cache_control: Option<String>,
    ) -> Object {
        let generation = inner.next_generation;
        inner.next_generation += 1;

        let record = Object {
            name: name.to_string(),
            generation,
            metageneration: 1,
            size: data.len() as u64,
            content_type,
            cache_control,
            updated: Utc::now(),
        };
        inner
            .objects
            .entry(name.to_string())
            .or_default()
            .push(StoredGeneration {
                record: record.clone(),
                data,
            });
        record
    }
}

#[async_trait]
impl Bucket for MemoryBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn create_object(&self, req: CreateObjectRequest) -> Result<Object> {
        if req.name.is_empty() {
            return Err(StorageError::Invalid("empty object name".to_string()));
        }

        let mut inner = self.inner.lock();
        Self::check_precondition(&inner, &req.name, req.generation_precondition)?;
        let record = Self::store(
            &mut inner,
            &req.name,
            req.contents,
            req.content_type,
            req.cache_control,
        );

        debug!(
            bucket = %self.name,
            object = %record.name,
            generation = record.generation,
            size = record.size,
            "object created"
        );
        Ok(record)
    }

    async fn compose_objects(&self, req: ComposeObjectsRequest) -> Result<Object> {
        if req.sources.is_empty() {
            return Err(StorageError::Invalid("compose with no sources".to_string()));
        }

        let mut inner = self.inner.lock();
        Self::check_precondition(&inner, &req.dst_name, req.dst_generation_precondition)?;

        let mut data = Vec::new();
        let mut first_content_type = None;
        for source in &req.sources {
            let stored = inner
                .objects
                .get(source)
                .and_then(|v| v.last())
                .ok_or_else(|| StorageError::NotFound {
                    name: source.clone(),
                })?;
            if first_content_type.is_none() {
                first_content_type = stored.record.content_type.clone();
            }
            data.extend_from_slice(&stored.data);
        }

        let content_type = req.content_type.or(first_content_type);
        let record = Self::store(
            &mut inner,
            &req.dst_name,
            Bytes::from(data),
            content_type,
            req.cache_control,
        );

        debug!(
            bucket = %self.name,
            object = %record.name,
            generation = record.generation,
            sources = req.sources.len(),
            "objects composed"
        );
        Ok(record)
    }

    async fn stat_object(&self, name: &str) -> Result<Object> {
        let inner = self.inner.lock();
        inner
            .objects
            .get(name)
            .and_then(|v| v.last())
            .map(|s| s.record.clone())
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
            })
    }

    async fn read_object(&self, name: &str, generation: i64, range: Range<u64>) -> Result<Bytes> {
        let inner = self.inner.lock();
        let versions = inner.objects.get(name).ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })?;
        let stored = if generation == 0 {
            versions.last()
        } else {
            versions.iter().find(|s| s.record.generation == generation)
        }
        .ok_or_else(|| StorageError::NotFound {
            name: name.to_string(),
        })?;

        let size = stored.data.len() as u64;
        let start = range.start.min(size) as usize;
        let end = range.end.min(size) as usize;
        Ok(stored.data.slice(start..end))
    }

    async fn list_objects(&self, req: ListObjectsRequest) -> Result<Listing> {
        let inner = self.inner.lock();
        let mut objects = Vec::new();
        let mut prefixes = BTreeSet::new();

        for (name, versions) in inner.objects.range(req.prefix.clone()..) {
            if !name.starts_with(&req.prefix) {
                break;
            }
            let suffix = &name[req.prefix.len()..];
            match req.delimiter.and_then(|d| suffix.find(d)) {
                Some(pos) => {
                    let end = req.prefix.len() + pos + 1;
                    prefixes.insert(name[..end].to_string());
                }
                None => {
                    if let Some(stored) = versions.last() {
                        objects.push(stored.record.clone());
                    }
                }
            }
        }

        Ok(Listing {
            objects,
            collapsed_prefixes: prefixes.into_iter().collect(),
        })
    }

    async fn delete_object(&self, name: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.objects.remove(name).is_none() {
            return Err(StorageError::NotFound {
                name: name.to_string(),
            });
        }
        debug!(bucket = %self.name, object = %name, "object deleted");
        Ok(())
    }
}
