//! Regular-file inode.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use store::{Bucket, CreateObjectRequest, Generation, Object, StorageError};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{FsError, Result};
use crate::inode::{InodeAttributes, InodeId, LookupCount, Name};

/// The mutable state of a [`FileInode`], guarded by the inode's lock.
///
/// The state is clean while `dirty` is `None`: the source object record is
/// then authoritative for content. A local write faults the full object in
/// and mutates the buffer; from that point only this state can serve reads,
/// until a flush writes the buffer back and adopts the new source.
#[derive(Debug)]
pub struct FileState {
    bucket: Arc<dyn Bucket>,
    source: Object,
    dirty: Option<Vec<u8>>,
    mtime: DateTime<Utc>,
}

impl FileState {
    /// The source object record this inode was last synced against.
    pub fn source(&self) -> &Object {
        &self.source
    }

    /// The bucket backing this inode.
    pub fn bucket(&self) -> Arc<dyn Bucket> {
        self.bucket.clone()
    }

    /// The generation of the source object.
    pub fn source_generation(&self) -> Generation {
        self.source.generation_pair()
    }

    /// Whether the source generation reflects all local content. False
    /// exactly when unflushed local writes exist.
    pub fn source_generation_is_authoritative(&self) -> bool {
        self.dirty.is_none()
    }

    /// Content size, counting unflushed writes.
    pub fn size(&self) -> u64 {
        match &self.dirty {
            Some(buffer) => buffer.len() as u64,
            None => self.source.size,
        }
    }

    /// Read into `dst` at `offset`, observing in-flight local writes.
    ///
    /// A return of zero, or of fewer bytes than requested, means the
    /// requested range extends past the end of the content; that is not an
    /// error.
    pub async fn read(&self, dst: &mut [u8], offset: u64) -> Result<usize> {
        if let Some(buffer) = &self.dirty {
            let len = buffer.len() as u64;
            if offset >= len {
                return Ok(0);
            }
            let start = offset as usize;
            let end = (offset + dst.len() as u64).min(len) as usize;
            dst[..end - start].copy_from_slice(&buffer[start..end]);
            return Ok(end - start);
        }

        let range = offset..offset.saturating_add(dst.len() as u64);
        let data = self
            .bucket
            .read_object(&self.source.name, self.source.generation, range)
            .await?;
        dst[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    /// Apply a local write at `offset`, faulting the object in first if this
    /// is the first write since the last sync. Gaps are zero-filled.
    pub async fn write(&mut self, data: &[u8], offset: u64) -> Result<()> {
        let mut buffer = match self.dirty.take() {
            Some(buffer) => buffer,
            None => self
                .bucket
                .read_object(&self.source.name, self.source.generation, 0..self.source.size)
                .await?
                .to_vec(),
        };

        let end = offset as usize + data.len();
        if end > buffer.len() {
            buffer.resize(end, 0);
        }
        buffer[offset as usize..end].copy_from_slice(data);
        self.dirty = Some(buffer);
        self.mtime = Utc::now();
        Ok(())
    }

    /// Write unflushed content back under a generation precondition,
    /// adopting the resulting object as the new clean source.
    pub async fn flush(&mut self) -> Result<Object> {
        let Some(buffer) = self.dirty.take() else {
            return Ok(self.source.clone());
        };

        let expected = self.source.generation;
        let result = self
            .bucket
            .create_object(CreateObjectRequest {
                name: self.source.name.clone(),
                contents: buffer.clone().into(),
                content_type: self.source.content_type.clone(),
                cache_control: self.source.cache_control.clone(),
                generation_precondition: Some(expected),
            })
            .await;

        match result {
            Ok(object) => {
                debug!(
                    object = %object.name,
                    generation = object.generation,
                    "file flushed"
                );
                self.source = object.clone();
                Ok(object)
            }
            Err(StorageError::PreconditionFailed { .. }) => {
                // The local content still exists; the caller decides how to
                // reconcile.
                self.dirty = Some(buffer);
                Err(FsError::Clobbered { expected })
            }
            Err(e) => {
                self.dirty = Some(buffer);
                Err(e.into())
            }
        }
    }
}

/// A regular file backed by one object in one bucket.
#[derive(Debug)]
pub struct FileInode {
    id: InodeId,
    name: Name,
    attrs: InodeAttributes,
    lookup_count: LookupCount,
    state: Mutex<FileState>,
}

impl FileInode {
    pub fn new(
        id: InodeId,
        name: Name,
        source: Object,
        attrs: InodeAttributes,
        bucket: Arc<dyn Bucket>,
    ) -> Self {
        let mtime = source.updated;
        Self {
            id,
            name,
            attrs,
            lookup_count: LookupCount::default(),
            state: Mutex::new(FileState {
                bucket,
                source,
                dirty: None,
                mtime,
            }),
        }
    }

    pub fn id(&self) -> InodeId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Acquire the inode lock.
    ///
    /// Handles acquire this within `read` and drop it before the actual
    /// byte fetch once a generation-bound reader is secured; see
    /// [`crate::handle::FileHandle::read`].
    pub async fn lock(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().await
    }

    pub fn increment_lookup_count(&self) {
        self.lookup_count.increment();
    }

    /// Returns true iff the inode is now eligible for destruction.
    pub fn decrement_lookup_count(&self, n: u64) -> bool {
        self.lookup_count.decrement(n)
    }

    pub async fn attributes(&self) -> InodeAttributes {
        let state = self.state.lock().await;
        InodeAttributes {
            size: state.size(),
            mtime: state.mtime,
            ..self.attrs
        }
    }

    pub async fn source_generation(&self) -> Generation {
        self.state.lock().await.source_generation()
    }

    pub async fn source_generation_is_authoritative(&self) -> bool {
        self.state.lock().await.source_generation_is_authoritative()
    }

    /// Locked read; see [`FileState::read`].
    pub async fn read(&self, dst: &mut [u8], offset: u64) -> Result<usize> {
        self.state.lock().await.read(dst, offset).await
    }

    /// Locked write; see [`FileState::write`].
    pub async fn write(&self, data: &[u8], offset: u64) -> Result<()> {
        self.state.lock().await.write(data, offset).await
    }

    /// Locked flush; see [`FileState::flush`].
    pub async fn flush(&self) -> Result<Object> {
        self.state.lock().await.flush().await
    }
}
