use s3sum_types::ChecksumRecord;

use crate::error::JournalResult;

/// Append-only store for checksum records.
///
/// Implementations must satisfy these invariants:
/// - `append` is safe to call concurrently from many tasks.
/// - Each append lands as a whole record; concurrent appends never interleave.
/// - `seal` consumes the journal, so no append can follow it.
/// - The sealed reader yields every appended record exactly once, in append
///   order, and is not restartable.
pub trait ChecksumJournal: Send + Sync {
    /// Forward-only reader returned by [`seal`](Self::seal).
    type Reader: Iterator<Item = JournalResult<ChecksumRecord>> + Send;

    /// Append one record.
    fn append(&self, record: &ChecksumRecord) -> JournalResult<()>;

    /// Number of records appended so far.
    fn len(&self) -> u64;

    /// Returns `true` if nothing has been appended.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the journal for writing and return its single-pass reader.
    fn seal(self) -> JournalResult<Self::Reader>
    where
        Self: Sized;
}
