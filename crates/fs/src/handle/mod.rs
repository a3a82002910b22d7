//! Per-open-file handles.

mod file;

pub use file::FileHandle;
