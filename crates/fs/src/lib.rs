//! Inode consistency and caching layer for bucket-backed filesystems
//!
//! This crate reconciles the two consistency models a remote-bucket mount
//! has to live between: the kernel expects mutable inodes with stable
//! identity and coherent reads-after-writes, while the backing store offers
//! immutable, generation-versioned objects. The reconciliation protocol is
//! optimistic: every cached resource remembers the [`store::Generation`] it
//! was built against, and validity checks reduce to value equality against a
//! freshly read authoritative generation.
//!
//! # Architecture
//!
//! - [`inode::BaseDirInode`]: the synthetic root whose children are buckets,
//!   resolved through a [`store::BucketManager`] and memoized forever
//! - [`inode::DirInode`]: a directory backed by one bucket, with a TTL'd
//!   child-kind cache to avoid redundant stats
//! - [`inode::ExplicitDirInode`]: a directory backed by a real marker
//!   object, carrying that object's generation
//! - [`inode::FileInode`]: a regular file; clean until locally written,
//!   dirty until flushed back under a generation precondition
//! - [`reader::ObjectReader`]: byte-range reads against one fixed generation
//! - [`handle::FileHandle`]: per-open-file state deciding, per read, between
//!   a cached generation-bound reader and the inode's locked path

pub mod config;
pub mod error;
pub mod handle;
pub mod inode;
pub mod reader;

pub use config::FsConfig;
pub use error::{FsError, Result};
pub use handle::FileHandle;
pub use inode::{
    BaseDirInode, ChildKind, DirEntry, DirInode, ExplicitDirInode, FileInode, InodeAttributes,
    InodeId, LookUpResult, Name, ROOT_INODE_ID,
};
pub use reader::{ObjectReader, RandomReader};
