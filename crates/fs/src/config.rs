//! Filesystem-layer configuration.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::inode::InodeAttributes;

/// Configuration for the inode layer.
#[derive(Debug, Clone)]
pub struct FsConfig {
    /// Owner reported in inode attributes.
    pub uid: u32,
    /// Group reported in inode attributes.
    pub gid: u32,
    /// Mode bits for regular files.
    pub file_mode: u32,
    /// Mode bits for directories.
    pub dir_mode: u32,
    /// Whether directories implied by deeper object names (with no marker
    /// object of their own) are visible.
    pub implicit_dirs: bool,
    /// How long a directory trusts a child's last observed kind.
    pub type_cache_ttl: Duration,
    /// Entry capacity of each directory's child-kind cache.
    pub type_cache_capacity: u64,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            uid: 0,
            gid: 0,
            file_mode: 0o644,
            dir_mode: 0o755,
            implicit_dirs: false,
            type_cache_ttl: Duration::from_secs(60),
            type_cache_capacity: 16 * 1024,
        }
    }
}

impl FsConfig {
    /// Config with ownership filled in and everything else defaulted.
    pub fn with_owner(uid: u32, gid: u32) -> Self {
        Self {
            uid,
            gid,
            ..Default::default()
        }
    }

    /// Attributes for a regular file of the given size.
    pub fn file_attributes(&self, size: u64, mtime: DateTime<Utc>) -> InodeAttributes {
        InodeAttributes {
            uid: self.uid,
            gid: self.gid,
            mode: self.file_mode,
            size,
            mtime,
        }
    }

    /// Attributes for a directory.
    pub fn dir_attributes(&self, mtime: DateTime<Utc>) -> InodeAttributes {
        InodeAttributes {
            uid: self.uid,
            gid: self.gid,
            mode: self.dir_mode,
            size: 0,
            mtime,
        }
    }
}
