use serde::{Deserialize, Serialize};

/// Checksum metadata the object store reports for one object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAttributes {
    /// Base64-encoded SHA-256 checksum, if the store has one.
    pub checksum: Option<String>,
    /// Ordered part sizes when the object was stored as a multipart upload.
    pub part_sizes: Option<Vec<u64>>,
}

/// Remote checksum metadata for one key, as spilled to the journal.
///
/// `part_sizes` is only present for multipart uploads. Its sum is expected
/// to equal the object size; that is checked when the record is compared
/// against local bytes, never when it is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumRecord {
    pub key: String,
    /// Base64-encoded SHA-256 digest, `None` when unavailable.
    pub remote_checksum: Option<String>,
    pub part_sizes: Option<Vec<u64>>,
    /// Why `remote_checksum` is absent. Diagnostic only.
    pub unavailable_reason: Option<String>,
}

impl ChecksumRecord {
    /// Build a record from fetched attributes.
    pub fn from_attributes(key: impl Into<String>, attributes: ObjectAttributes) -> Self {
        let unavailable_reason = attributes
            .checksum
            .is_none()
            .then(|| "object has no SHA-256 checksum".to_string());
        Self {
            key: key.into(),
            remote_checksum: attributes.checksum,
            part_sizes: attributes.part_sizes,
            unavailable_reason,
        }
    }

    /// Build a record for a key whose attribute fetch failed.
    pub fn unavailable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            remote_checksum: None,
            part_sizes: None,
            unavailable_reason: Some(reason.into()),
        }
    }

    /// Returns `true` if the remote object was a multipart upload.
    pub fn is_multipart(&self) -> bool {
        self.part_sizes.is_some()
    }
}
