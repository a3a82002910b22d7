//! Directory inode backed by a real marker object.

use std::sync::Arc;

use store::{Bucket, Generation, Object};

use crate::config::FsConfig;
use crate::error::Result;
use crate::inode::{DirEntry, DirInode, InodeAttributes, InodeId, LookUpResult, Name};

/// A directory backed by a marker object with a specific generation.
///
/// Composition over [`DirInode`]: all directory behavior delegates to the
/// wrapped generic implementation; this type adds only the generation
/// captured from the marker object at construction. The value is never
/// refreshed — staleness detection and content refresh are the wrapped
/// implementation's business, invoked identically for every variant.
#[derive(Debug)]
pub struct ExplicitDirInode {
    dir: DirInode,
    generation: Generation,
}

impl ExplicitDirInode {
    pub fn new(
        id: InodeId,
        name: Name,
        backing: &Object,
        attrs: InodeAttributes,
        config: &FsConfig,
        bucket: Arc<dyn Bucket>,
    ) -> Self {
        Self {
            dir: DirInode::new(id, name, attrs, config, bucket),
            generation: backing.generation_pair(),
        }
    }

    /// The generation of the marker object this directory was created from.
    pub fn source_generation(&self) -> Generation {
        self.generation
    }

    /// The wrapped generic directory.
    pub fn as_dir(&self) -> &DirInode {
        &self.dir
    }

    pub fn id(&self) -> InodeId {
        self.dir.id()
    }

    pub fn name(&self) -> &Name {
        self.dir.name()
    }

    pub fn attributes(&self) -> InodeAttributes {
        self.dir.attributes()
    }

    pub fn increment_lookup_count(&self) {
        self.dir.increment_lookup_count();
    }

    pub fn decrement_lookup_count(&self, n: u64) -> bool {
        self.dir.decrement_lookup_count(n)
    }

    pub async fn look_up_child(&self, name: &str) -> Result<Option<LookUpResult>> {
        self.dir.look_up_child(name).await
    }

    pub async fn read_entries(&self) -> Result<Vec<DirEntry>> {
        self.dir.read_entries().await
    }
}
