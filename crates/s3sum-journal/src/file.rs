use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use s3sum_types::ChecksumRecord;
use tracing::{debug, warn};

use crate::error::{JournalError, JournalResult};
use crate::traits::ChecksumJournal;

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Largest payload a single frame may carry (16 MiB).
///
/// A record with the maximum of 10,000 parts is well under 100 KiB.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Configuration for a [`FileJournal`].
#[derive(Clone, Debug)]
pub struct JournalConfig {
    /// Capacity of the write and read buffers in bytes (default: 64 KiB).
    pub buffer_capacity: usize,
    /// `fsync` the file when the journal is sealed.
    pub sync_on_seal: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 64 * 1024,
            sync_on_seal: false,
        }
    }
}

/// Internal mutable state for the journal writer.
struct JournalWriter {
    writer: BufWriter<File>,
    /// Current write offset in the file.
    offset: u64,
    /// Records appended so far.
    records: u64,
}

/// File-backed checksum journal.
///
/// Records are serialized with bincode and framed as:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized ChecksumRecord)]
/// ```
///
/// The journal lives for a single run. There is no crash recovery: when the
/// sealed file is read back, any frame that fails its checks is a hard
/// [`JournalError::Corrupt`] rather than a skipped entry.
pub struct FileJournal {
    /// Path of the backing file, `None` for an anonymous temporary file.
    path: Option<PathBuf>,
    writer: Mutex<JournalWriter>,
    config: JournalConfig,
}

impl FileJournal {
    /// Journal in an anonymous temporary file, removed when the reader drops.
    pub fn temporary(config: JournalConfig) -> JournalResult<Self> {
        let file = tempfile::tempfile()?;
        Ok(Self::from_file(file, None, config))
    }

    /// Journal in an anonymous temporary file inside `dir`.
    pub fn temporary_in(dir: &Path, config: JournalConfig) -> JournalResult<Self> {
        let file = tempfile::tempfile_in(dir)?;
        Ok(Self::from_file(file, None, config))
    }

    /// Journal at an explicit path. Any existing file is truncated; the file
    /// is left in place after the run.
    pub fn create(path: &Path, config: JournalConfig) -> JournalResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self::from_file(file, Some(path.to_path_buf()), config))
    }

    fn from_file(file: File, path: Option<PathBuf>, config: JournalConfig) -> Self {
        let writer = BufWriter::with_capacity(config.buffer_capacity, file);
        Self {
            path,
            writer: Mutex::new(JournalWriter {
                writer,
                offset: 0,
                records: 0,
            }),
            config,
        }
    }

    /// Path of the backing file, if it has one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.writer.lock().expect("journal mutex poisoned").offset
    }
}

impl ChecksumJournal for FileJournal {
    type Reader = FileJournalReader;

    fn append(&self, record: &ChecksumRecord) -> JournalResult<()> {
        let payload =
            bincode::serialize(record).map_err(|e| JournalError::Serialization(e.to_string()))?;
        if payload.len() > MAX_FRAME_LEN {
            return Err(JournalError::RecordTooLarge {
                key: record.key.clone(),
                len: payload.len(),
                max: MAX_FRAME_LEN,
            });
        }

        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        // One lock for the whole frame keeps concurrent appends from
        // interleaving.
        let mut w = self.writer.lock().expect("journal mutex poisoned");
        let entry_offset = w.offset;
        w.writer.write_all(&length.to_le_bytes())?;
        w.writer.write_all(&crc.to_le_bytes())?;
        w.writer.write_all(&payload)?;

        w.offset += HEADER_SIZE as u64 + payload.len() as u64;
        w.records += 1;

        debug!(key = %record.key, offset = entry_offset, len = payload.len(), "journal append");
        Ok(())
    }

    fn len(&self) -> u64 {
        self.writer.lock().expect("journal mutex poisoned").records
    }

    fn seal(self) -> JournalResult<FileJournalReader> {
        let JournalWriter {
            writer,
            offset,
            records,
        } = self.writer.into_inner().expect("journal mutex poisoned");

        let mut file = writer.into_inner().map_err(|e| JournalError::Io(e.into_error()))?;
        if self.config.sync_on_seal {
            file.sync_all()?;
        }
        file.seek(SeekFrom::Start(0))?;

        debug!(records, bytes = offset, "journal sealed");
        Ok(FileJournalReader {
            reader: BufReader::with_capacity(self.config.buffer_capacity, file),
            file_len: offset,
            offset: 0,
            remaining: records,
            done: false,
        })
    }
}

impl std::fmt::Debug for FileJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileJournal")
            .field("path", &self.path)
            .field("records", &self.len())
            .finish()
    }
}

/// Single-pass reader over a sealed [`FileJournal`].
///
/// Yields records in append order. After the first error the reader is
/// exhausted.
pub struct FileJournalReader {
    reader: BufReader<File>,
    file_len: u64,
    offset: u64,
    remaining: u64,
    done: bool,
}

impl FileJournalReader {
    /// Records not yet read.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn corrupt(&self, reason: impl Into<String>) -> JournalError {
        JournalError::Corrupt {
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn read_frame(&mut self) -> JournalResult<ChecksumRecord> {
        if self.offset + HEADER_SIZE as u64 > self.file_len {
            return Err(self.corrupt(format!(
                "journal ended with {} records unread",
                self.remaining
            )));
        }

        let mut header = [0u8; HEADER_SIZE];
        read_exact_or_corrupt(&mut self.reader, &mut header, self.offset)?;
        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if length == 0
            || length as usize > MAX_FRAME_LEN
            || self.offset + HEADER_SIZE as u64 + length as u64 > self.file_len
        {
            return Err(self.corrupt(format!("invalid frame length {length}")));
        }

        let mut payload = vec![0u8; length as usize];
        read_exact_or_corrupt(&mut self.reader, &mut payload, self.offset)?;

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            warn!(
                offset = self.offset,
                expected = expected_crc,
                actual = actual_crc,
                "journal CRC mismatch"
            );
            return Err(self.corrupt(format!(
                "CRC mismatch: expected {expected_crc:#010x}, got {actual_crc:#010x}"
            )));
        }

        let record: ChecksumRecord = bincode::deserialize(&payload)
            .map_err(|e| self.corrupt(format!("undecodable record: {e}")))?;

        self.offset += HEADER_SIZE as u64 + length as u64;
        self.remaining -= 1;
        Ok(record)
    }
}

impl Iterator for FileJournalReader {
    type Item = JournalResult<ChecksumRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.remaining == 0 {
            self.done = true;
            if self.offset != self.file_len {
                return Some(Err(self.corrupt("trailing bytes after last record")));
            }
            return None;
        }
        let item = self.read_frame();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, usize::try_from(self.remaining).ok())
        }
    }
}

fn read_exact_or_corrupt(reader: &mut impl Read, buf: &mut [u8], offset: u64) -> JournalResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(JournalError::Corrupt {
            offset,
            reason: "truncated frame".into(),
        }),
        Err(e) => Err(e.into()),
    }
}
