use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// The remote listing did not deliver every page.
    #[error("incomplete inventory after {pages_read} page(s): {reason}")]
    IncompleteInventory { pages_read: u64, reason: String },

    /// A single request to the object store failed.
    #[error("remote error: {0}")]
    Remote(String),

    /// The checksum attributes of one key could not be retrieved.
    #[error("attributes unavailable for {key}: {reason}")]
    AttributeUnavailable { key: String, reason: String },

    /// Credentials could not be resolved.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// The local root is missing or not a directory.
    #[error("invalid local root {0}")]
    InvalidRoot(PathBuf),

    /// Walking the local tree failed.
    #[error("local inventory failed at {path}: {reason}")]
    LocalWalk { path: PathBuf, reason: String },

    #[error("hash error: {0}")]
    Hash(#[from] s3sum_hash::HashError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InventoryResult<T> = Result<T, InventoryError>;
