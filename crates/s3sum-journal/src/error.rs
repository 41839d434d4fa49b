use std::io;

/// Errors produced by the checksum journal.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// I/O error on the journal file.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A frame failed its length or CRC check, or the file ended early.
    #[error("corrupt journal at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// A record is larger than the maximum frame size.
    #[error("record for {key} is {len} bytes, exceeding the {max} byte frame limit")]
    RecordTooLarge { key: String, len: usize, max: usize },
}

/// Convenience alias used throughout the journal crate.
pub type JournalResult<T> = std::result::Result<T, JournalError>;
