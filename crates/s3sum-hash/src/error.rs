use std::io;

/// Errors from checksum computation.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Recorded part sizes do not add up to the content length.
    #[error("size mismatch: parts sum to {expected} bytes, content has {actual} bytes")]
    SizeMismatch { expected: u64, actual: u64 },

    /// A part list was recorded but holds no parts.
    #[error("part list is empty")]
    EmptyPartList,

    /// A recorded part has size zero.
    #[error("part {index} has size zero")]
    ZeroPartSize { index: usize },

    /// The recorded part sizes overflow a 64-bit length.
    #[error("part sizes overflow a 64-bit length")]
    PartSizeOverflow,

    /// I/O error while reading content.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HashError {
    /// Returns `true` for errors caused by the recorded part layout rather
    /// than by reading the content.
    pub fn is_layout_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Result alias for checksum operations.
pub type HashResult<T> = Result<T, HashError>;
