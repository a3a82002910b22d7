//! Open-file state layered on a [`FileInode`].

use std::sync::Arc;

use tracing::debug;

use crate::error::{FsError, Result};
use crate::inode::{FileInode, FileState};
use crate::reader::{ObjectReader, RandomReader};

/// Per-open-file state: at most one cached reader bound to some (possibly
/// previous) generation of the object backing the inode.
///
/// A handle is exclusively owned by its open-file reference; `&mut self` is
/// the handle lock. The inode's lock is acquired inside [`read`] and
/// released *before* the actual byte fetch once a generation-bound reader
/// is secured — the asymmetric release that lets reads through this and
/// other handles proceed in parallel with inode-level mutation.
///
/// Invariant: whenever a reader is present, its own invariants hold; it may
/// be bound to a generation older than the inode's current one, which is
/// detected lazily on the next read, not enforced continuously.
///
/// [`read`]: FileHandle::read
#[derive(Debug)]
pub struct FileHandle {
    inode: Arc<FileInode>,
    reader: Option<Box<dyn RandomReader>>,
}

impl FileHandle {
    pub fn new(inode: Arc<FileInode>) -> Self {
        Self {
            inode,
            reader: None,
        }
    }

    /// The inode backing this handle.
    pub fn inode(&self) -> &Arc<FileInode> {
        &self.inode
    }

    /// Read into `dst` at `offset`.
    ///
    /// Equivalent to locking the inode and calling [`FileInode::read`], but
    /// serves clean generations through a cached reader without holding the
    /// inode lock across the byte fetch. A short or empty read means the
    /// range extends past the end of the file; that is not an error.
    pub async fn read(&mut self, dst: &mut [u8], offset: u64) -> Result<usize> {
        // Lock the inode and try to ensure a reader for its current state,
        // or clear the cached one if that is impossible (dirty inode).
        let inode = self.inode.clone();
        let state = inode.lock().await;
        if let Err(e) = self.try_ensure_reader(&state) {
            return Err(FsError::EnsureReader(Box::new(e)));
        }

        if let Some(reader) = self.reader.as_mut() {
            // The reader is bound to an immutable generation, so the fetch
            // cannot observe torn state; release the inode before it. A
            // concurrent write that advances the inode simply leaves this
            // reader serving the old, still-valid generation until the next
            // call re-ensures.
            drop(state);

            return match reader.read_at(dst, offset).await {
                Ok(n) => Ok(n),
                Err(e) => Err(FsError::ReadAt(Box::new(e))),
            };
        }

        // Dirty inode: only the inode's own in-flight state can serve the
        // read. Keep it locked for the duration.
        state.read(dst, offset).await
    }

    /// Release any resources associated with the handle, which must not be
    /// used again.
    pub fn destroy(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            reader.destroy();
        }
    }

    /// Panics if the handle's invariants do not hold. Debug instrumentation.
    pub fn check_invariants(&self) {
        if let Some(reader) = &self.reader {
            reader.check_invariants();
        }
    }

    /// Ensure `self.reader` is appropriate for the inode's current state,
    /// or clear it when the inode is dirty.
    fn try_ensure_reader(&mut self, state: &FileState) -> Result<()> {
        // A dirty inode can only be served from its own authoritative
        // in-progress state, never from a generation-bound reader.
        if !state.source_generation_is_authoritative() {
            if let Some(mut reader) = self.reader.take() {
                reader.destroy();
            }
            return Ok(());
        }

        // Reuse the current reader while it matches the source's content
        // generation; otherwise it is stale and gets thrown away.
        if let Some(reader) = &self.reader {
            if reader.object().generation == state.source_generation().object {
                return Ok(());
            }
            debug!(
                object = %state.source().name,
                bound = reader.object().generation,
                current = state.source_generation().object,
                "discarding stale reader"
            );
            if let Some(mut reader) = self.reader.take() {
                reader.destroy();
            }
        }

        let reader = ObjectReader::new(state.bucket(), state.source().clone())?;
        self.reader = Some(Box::new(reader));
        Ok(())
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}
