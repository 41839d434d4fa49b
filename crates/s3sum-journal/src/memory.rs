use std::sync::Mutex;

use s3sum_types::ChecksumRecord;

use crate::error::JournalResult;
use crate::traits::ChecksumJournal;

/// In-memory checksum journal.
///
/// Holds every record in a `Vec` behind a `Mutex`. Suitable for small
/// inventories and tests; large runs should use
/// [`FileJournal`](crate::FileJournal).
#[derive(Debug, Default)]
pub struct MemoryJournal {
    records: Mutex<Vec<ChecksumRecord>>,
}

impl MemoryJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChecksumJournal for MemoryJournal {
    type Reader = MemoryJournalReader;

    fn append(&self, record: &ChecksumRecord) -> JournalResult<()> {
        self.records
            .lock()
            .expect("journal mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    fn len(&self) -> u64 {
        self.records.lock().expect("journal mutex poisoned").len() as u64
    }

    fn seal(self) -> JournalResult<MemoryJournalReader> {
        let records = self.records.into_inner().expect("journal mutex poisoned");
        Ok(MemoryJournalReader {
            inner: records.into_iter(),
        })
    }
}

/// Single-pass reader over a sealed [`MemoryJournal`].
#[derive(Debug)]
pub struct MemoryJournalReader {
    inner: std::vec::IntoIter<ChecksumRecord>,
}

impl Iterator for MemoryJournalReader {
    type Item = JournalResult<ChecksumRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_seal_preserves_order() {
        let journal = MemoryJournal::new();
        journal.append(&ChecksumRecord::unavailable("b", "x")).unwrap();
        journal.append(&ChecksumRecord::unavailable("a", "y")).unwrap();
        assert_eq!(journal.len(), 2);

        let keys: Vec<String> = journal.seal().unwrap().map(|r| r.unwrap().key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn empty_memory_journal() {
        let journal = MemoryJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.seal().unwrap().count(), 0);
    }
}
