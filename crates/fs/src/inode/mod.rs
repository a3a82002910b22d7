//! Inodes: directories, files, and their shared identity machinery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use store::{Bucket, Object};

mod base_dir;
mod dir;
mod explicit_dir;
mod file;
mod name;

pub use base_dir::BaseDirInode;
pub use dir::{ChildKind, DirEntry, DirInode};
pub use explicit_dir::ExplicitDirInode;
pub use file::{FileInode, FileState};
pub use name::Name;

/// A stable inode identity, assigned by the (external) kernel-facing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeId(pub u64);

/// The root inode id; 1 by kernel convention.
pub const ROOT_INODE_ID: InodeId = InodeId(1);

/// Attributes reported for an inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InodeAttributes {
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub size: u64,
    pub mtime: DateTime<Utc>,
}

/// Kernel-driven reference count on an inode.
///
/// Increments and decrements mirror the kernel's reference/dereference
/// events; the balancing decrement, and only that one, reports the inode
/// eligible for destruction.
#[derive(Debug, Default)]
pub struct LookupCount(AtomicU64);

impl LookupCount {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Drop `n` references. Returns true iff the count just reached zero.
    pub fn decrement(&self, n: u64) -> bool {
        let previous = self.0.fetch_sub(n, Ordering::SeqCst);
        debug_assert!(previous >= n, "lookup count underflow");
        previous == n
    }
}

/// The outcome of a successful child lookup.
#[derive(Debug, Clone)]
pub struct LookUpResult {
    /// The bucket the child lives in.
    pub bucket: Arc<dyn Bucket>,
    /// The child's full name; always a bucket root for root-dir children.
    pub full_name: Name,
    /// The backing object, if the child has one. `None` for bucket roots
    /// and implicit directories.
    pub object: Option<Object>,
    /// Whether the child is a directory implied only by deeper object
    /// names. Always false for bucket roots, which are explicit.
    pub implicit_dir: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_count_balances_exactly_once() {
        let count = LookupCount::default();
        count.increment();
        count.increment();
        count.increment();

        assert!(!count.decrement(2));
        assert!(count.decrement(1));
    }

    #[test]
    fn lookup_count_single_reference() {
        let count = LookupCount::default();
        count.increment();
        assert!(count.decrement(1));
    }
}
