//! Path names within a mount.

use std::fmt;

/// The name of a filesystem entry.
///
/// Every non-root name belongs to exactly one bucket; the local-name and
/// backing-object-name projections are pure functions of the variant, never
/// independently mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// The synthetic mount root. Its children are buckets.
    Root,
    /// The root of one bucket; rendered locally as `<bucket>/`. Has no
    /// backing object.
    BucketRoot { bucket: String },
    /// An object within a bucket. Directory paths end in `/`.
    Object { bucket: String, path: String },
}

impl Name {
    pub fn root() -> Self {
        Name::Root
    }

    pub fn bucket_root(bucket: impl Into<String>) -> Self {
        Name::BucketRoot {
            bucket: bucket.into(),
        }
    }

    pub fn object(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Name::Object {
            bucket: bucket.into(),
            path: path.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Name::Root)
    }

    pub fn is_bucket_root(&self) -> bool {
        matches!(self, Name::BucketRoot { .. })
    }

    /// Whether this names a directory.
    pub fn is_dir(&self) -> bool {
        match self {
            Name::Root | Name::BucketRoot { .. } => true,
            Name::Object { path, .. } => path.ends_with('/'),
        }
    }

    /// The bucket this name belongs to, if any.
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Name::Root => None,
            Name::BucketRoot { bucket } | Name::Object { bucket, .. } => Some(bucket),
        }
    }

    /// The name as presented to the kernel: `""`, `"<bucket>/"` or
    /// `"<bucket>/<path>"`.
    pub fn local_name(&self) -> String {
        match self {
            Name::Root => String::new(),
            Name::BucketRoot { bucket } => format!("{bucket}/"),
            Name::Object { bucket, path } => format!("{bucket}/{path}"),
        }
    }

    /// The in-bucket object name backing this entry; empty for the root and
    /// for bucket roots, which have no backing object.
    pub fn object_name(&self) -> &str {
        match self {
            Name::Root | Name::BucketRoot { .. } => "",
            Name::Object { path, .. } => path,
        }
    }

    /// The name of a child of this directory.
    ///
    /// Only meaningful on directory names; `child` must not contain `/`
    /// except as a trailing directory marker.
    pub fn child(&self, child: &str) -> Name {
        debug_assert!(self.is_dir());
        match self {
            Name::Root => Name::bucket_root(child.trim_end_matches('/')),
            Name::BucketRoot { bucket } => Name::object(bucket.clone(), child),
            Name::Object { bucket, path } => {
                Name::object(bucket.clone(), format!("{path}{child}"))
            }
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.local_name())
    }
}
