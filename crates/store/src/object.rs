//! Object records and generation versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A versioned identity for one immutable snapshot of an object.
///
/// Two generations are equal iff both fields match; equality against a
/// freshly read authoritative value is the entire cache-validity protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation {
    /// Content generation; advances when object content is rewritten.
    pub object: i64,
    /// Metadata generation; advances on metadata-only updates.
    pub metadata: i64,
}

/// An immutable record describing one generation of a stored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    /// Full in-bucket name. Directory markers end in `/`.
    pub name: String,
    /// Content generation this record describes.
    pub generation: i64,
    /// Metadata generation within the content generation.
    pub metageneration: i64,
    /// Content length in bytes.
    pub size: u64,
    /// MIME type, if one was supplied at creation.
    pub content_type: Option<String>,
    /// Cache-control directive, if one was supplied at creation.
    pub cache_control: Option<String>,
    /// Last update time.
    pub updated: DateTime<Utc>,
}

impl Object {
    /// The generation pair identifying this snapshot.
    pub fn generation_pair(&self) -> Generation {
        Generation {
            object: self.generation,
            metadata: self.metageneration,
        }
    }
}
