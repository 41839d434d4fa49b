use std::fmt;

use serde::{Deserialize, Serialize};

/// One object reported by the remote listing.
///
/// Zero-size objects are directory markers or placeholders; the inventory
/// source drops them before the reconciliation ever sees a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteObjectDescriptor {
    /// Object key, unique within one listing.
    pub key: String,
    /// Object size in bytes.
    pub size_bytes: u64,
}

impl RemoteObjectDescriptor {
    /// Create a descriptor.
    pub fn new(key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
        }
    }

    /// Returns `true` if this descriptor is a directory marker or an empty
    /// placeholder and must be excluded from the inventory.
    pub fn is_placeholder(&self) -> bool {
        self.size_bytes == 0
    }
}

impl fmt::Display for RemoteObjectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.key, self.size_bytes)
    }
}

/// A regular file found under the comparison root.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalFileDescriptor {
    /// Path relative to the comparison root, `/`-separated, never starting
    /// with a separator.
    pub relative_path: String,
}

impl LocalFileDescriptor {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

impl fmt::Display for LocalFileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_placeholder() {
        assert!(RemoteObjectDescriptor::new("dir/", 0).is_placeholder());
        assert!(!RemoteObjectDescriptor::new("a.txt", 10).is_placeholder());
    }

    #[test]
    fn descriptor_display() {
        let d = RemoteObjectDescriptor::new("a.txt", 10);
        assert_eq!(d.to_string(), "a.txt (10 bytes)");
        assert_eq!(LocalFileDescriptor::new("x/y").to_string(), "x/y");
    }
}
