//! Generic bucket-backed directory inode.

use std::sync::Arc;

use moka::sync::Cache;
use store::{Bucket, ListObjectsRequest, Object, StorageError};
use tracing::debug;

use crate::config::FsConfig;
use crate::error::Result;
use crate::inode::{InodeAttributes, InodeId, LookUpResult, LookupCount, Name};

/// What a directory last observed a child to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    File,
    Dir,
}

/// One entry of a directory listing.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Child name local to the directory, without any trailing slash.
    pub name: String,
    pub kind: ChildKind,
    /// The backing object, when the child has one.
    pub object: Option<Object>,
}

/// A directory backed by one bucket.
///
/// The name is either a bucket root or an in-bucket path ending in `/`.
/// Mutable state is limited to the child-kind cache, which is internally
/// synchronized, so lookups through distinct references never block each
/// other on a directory-wide lock.
///
/// The child-kind cache remembers each child's last observed kind for a
/// bounded TTL so that a repeat lookup stats only the matching flavor of
/// backing object. Negative outcomes are never cached.
pub struct DirInode {
    id: InodeId,
    name: Name,
    attrs: InodeAttributes,
    implicit_dirs: bool,
    bucket: Arc<dyn Bucket>,
    lookup_count: LookupCount,
    type_cache: Cache<String, ChildKind>,
}

impl DirInode {
    pub fn new(
        id: InodeId,
        name: Name,
        attrs: InodeAttributes,
        config: &FsConfig,
        bucket: Arc<dyn Bucket>,
    ) -> Self {
        debug_assert!(name.is_dir());
        Self {
            id,
            name,
            attrs,
            implicit_dirs: config.implicit_dirs,
            bucket,
            lookup_count: LookupCount::default(),
            type_cache: Cache::builder()
                .time_to_live(config.type_cache_ttl)
                .max_capacity(config.type_cache_capacity)
                .build(),
        }
    }

    pub fn id(&self) -> InodeId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn bucket(&self) -> &Arc<dyn Bucket> {
        &self.bucket
    }

    /// Attributes as fixed at construction.
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

    /// Resolve a child by local name.
    ///
    /// Directories shadow files of the same name. `Ok(None)` means the child
    /// does not exist right now; that outcome is not cached, so a later
    /// lookup asks the bucket again.
    pub async fn look_up_child(&self, name: &str) -> Result<Option<LookUpResult>> {
        if let Some(kind) = self.type_cache.get(name) {
            let hit = match kind {
                ChildKind::Dir => self.look_up_dir(name).await?,
                ChildKind::File => self.look_up_file(name).await?,
            };
            match hit {
                Some(result) => return Ok(Some(result)),
                // The cached kind went stale; fall through to a full
                // resolution.
                None => self.type_cache.invalidate(name),
            }
        }

        if let Some(result) = self.look_up_dir(name).await? {
            self.type_cache.insert(name.to_string(), ChildKind::Dir);
            return Ok(Some(result));
        }
        if let Some(result) = self.look_up_file(name).await? {
            self.type_cache.insert(name.to_string(), ChildKind::File);
            return Ok(Some(result));
        }
        Ok(None)
    }

    /// List the directory's children.
    ///
    /// Files come from objects directly under this prefix; directories come
    /// from collapsed prefixes. Without implicit directories enabled, a
    /// prefix is only a child if its marker object exists. Observed kinds
    /// are fed back into the child-kind cache.
    pub async fn read_entries(&self) -> Result<Vec<DirEntry>> {
        let prefix = self.name.object_name().to_string();
        let listing = self
            .bucket
            .list_objects(ListObjectsRequest {
                prefix: prefix.clone(),
                delimiter: Some('/'),
            })
            .await?;

        let mut entries = Vec::new();

        for object in listing.objects {
            // The directory's own marker is not a child.
            if object.name == prefix {
                continue;
            }
            let local = object.name[prefix.len()..].to_string();
            self.type_cache.insert(local.clone(), ChildKind::File);
            entries.push(DirEntry {
                name: local,
                kind: ChildKind::File,
                object: Some(object),
            });
        }

        for collapsed in listing.collapsed_prefixes {
            let local = collapsed[prefix.len()..]
                .trim_end_matches('/')
                .to_string();
            let object = match self.stat_or_none(&collapsed).await? {
                Some(marker) => Some(marker),
                None if self.implicit_dirs => None,
                None => continue,
            };
            self.type_cache.insert(local.clone(), ChildKind::Dir);
            entries.push(DirEntry {
                name: local,
                kind: ChildKind::Dir,
                object,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(dir = %self.name, entries = entries.len(), "directory listed");
        Ok(entries)
    }

    async fn look_up_file(&self, name: &str) -> Result<Option<LookUpResult>> {
        let full_name = self.name.child(name);
        match self.stat_or_none(full_name.object_name()).await? {
            Some(object) => Ok(Some(LookUpResult {
                bucket: self.bucket.clone(),
                full_name,
                object: Some(object),
                implicit_dir: false,
            })),
            None => Ok(None),
        }
    }

    /// Resolve `name` as an explicit directory, falling back to an implicit
    /// one when those are enabled.
    async fn look_up_dir(&self, name: &str) -> Result<Option<LookUpResult>> {
        let full_name = self.name.child(&format!("{name}/"));

        if let Some(marker) = self.stat_or_none(full_name.object_name()).await? {
            return Ok(Some(LookUpResult {
                bucket: self.bucket.clone(),
                full_name,
                object: Some(marker),
                implicit_dir: false,
            }));
        }

        if self.implicit_dirs && self.prefix_is_inhabited(full_name.object_name()).await? {
            return Ok(Some(LookUpResult {
                bucket: self.bucket.clone(),
                full_name,
                object: None,
                implicit_dir: true,
            }));
        }

        Ok(None)
    }

    async fn stat_or_none(&self, object_name: &str) -> Result<Option<Object>> {
        match self.bucket.stat_object(object_name).await {
            Ok(object) => Ok(Some(object)),
            Err(StorageError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether any object name starts with `prefix`.
    async fn prefix_is_inhabited(&self, prefix: &str) -> Result<bool> {
        let listing = self
            .bucket
            .list_objects(ListObjectsRequest {
                prefix: prefix.to_string(),
                delimiter: Some('/'),
            })
            .await?;
        Ok(!listing.objects.is_empty() || !listing.collapsed_prefixes.is_empty())
    }
}

impl std::fmt::Debug for DirInode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirInode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("implicit_dirs", &self.implicit_dirs)
            .field("cached_kinds", &self.type_cache.entry_count())
            .finish()
    }
}
