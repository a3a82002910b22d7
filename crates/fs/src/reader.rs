//! Byte-range readers bound to one object generation.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use store::{Bucket, Object};
use tracing::debug;

use crate::error::{FsError, Result};

/// Minimum number of bytes fetched per round-trip. Sequential readers get
/// the next requests served from the cached window.
const MIN_FETCH_BYTES: u64 = 128 * 1024;

/// Serves byte-range reads against one fixed generation of a backing
/// object.
///
/// A reader is exclusively owned by one file handle at a time. Once bound,
/// every read observes exactly the bytes of the bound generation, no matter
/// what later writes do to the live object.
#[async_trait]
pub trait RandomReader: Send + std::fmt::Debug {
    /// Read into `dst` at `offset` within the bound generation.
    ///
    /// Returns the number of bytes read. Zero, or fewer than requested,
    /// means the range extends past the object's end; that is the clean
    /// end-of-data signal, not an error.
    async fn read_at(&mut self, dst: &mut [u8], offset: u64) -> Result<usize>;

    /// The object record this reader is bound to.
    fn object(&self) -> &Object;

    /// Release any resources held. The reader must not be used afterwards.
    fn destroy(&mut self);

    /// Panics if internal invariants do not hold. Debug instrumentation,
    /// never a recovery mechanism.
    fn check_invariants(&self);
}

/// The default [`RandomReader`]: fetches ranges from the bucket on demand
/// and keeps the most recent fetch as a window for sequential access.
///
/// Construction performs no I/O; it only validates that the record can be
/// a reader target.
#[derive(Debug)]
pub struct ObjectReader {
    bucket: Arc<dyn Bucket>,
    object: Object,
    /// Start offset and bytes of the most recent fetch.
    window: Option<(u64, Bytes)>,
    destroyed: bool,
}

impl ObjectReader {
    pub fn new(bucket: Arc<dyn Bucket>, object: Object) -> Result<Self> {
        if object.name.is_empty() {
            return Err(FsError::InvalidObjectRecord {
                name: object.name,
                reason: "empty name".to_string(),
            });
        }
        if object.generation <= 0 {
            return Err(FsError::InvalidObjectRecord {
                name: object.name,
                reason: "no committed generation".to_string(),
            });
        }
        Ok(Self {
            bucket,
            object,
            window: None,
            destroyed: false,
        })
    }

    /// Copy bytes for `offset` out of the window, if it covers the offset.
    fn read_from_window(&self, dst: &mut [u8], offset: u64) -> Option<usize> {
        let (start, data) = self.window.as_ref()?;
        if offset < *start || offset >= start + data.len() as u64 {
            return None;
        }
        let begin = (offset - start) as usize;
        let n = dst.len().min(data.len() - begin);
        dst[..n].copy_from_slice(&data[begin..begin + n]);
        Some(n)
    }
}

#[async_trait]
impl RandomReader for ObjectReader {
    async fn read_at(&mut self, dst: &mut [u8], offset: u64) -> Result<usize> {
        debug_assert!(!self.destroyed, "read through destroyed reader");

        let size = self.object.size;
        let mut filled = 0;

        while filled < dst.len() && offset + (filled as u64) < size {
            let position = offset + filled as u64;

            if let Some(n) = self.read_from_window(&mut dst[filled..], position) {
                filled += n;
                continue;
            }

            let want = (dst.len() - filled) as u64;
            let limit = position.saturating_add(want.max(MIN_FETCH_BYTES)).min(size);
            let data = self
                .bucket
                .read_object(&self.object.name, self.object.generation, position..limit)
                .await?;
            debug!(
                object = %self.object.name,
                generation = self.object.generation,
                offset = position,
                len = data.len(),
                "range fetched"
            );
            if data.is_empty() {
                break;
            }
            self.window = Some((position, data));
        }

        Ok(filled)
    }

    fn object(&self) -> &Object {
        &self.object
    }

    fn destroy(&mut self) {
        self.window = None;
        self.destroyed = true;
    }

    fn check_invariants(&self) {
        assert!(!self.destroyed, "reader used after destroy");
        if let Some((start, data)) = &self.window {
            assert!(
                start + data.len() as u64 <= self.object.size,
                "window exceeds object size"
            );
        }
    }
}
