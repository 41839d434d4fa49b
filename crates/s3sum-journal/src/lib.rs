//! Checksum journal for s3sum.
//!
//! The fetch phase produces one [`ChecksumRecord`](s3sum_types::ChecksumRecord)
//! per remote object, from many concurrent tasks. The journal absorbs those
//! records append-only and, once sealed, hands them to the compare phase as a
//! forward-only, single-pass sequence. Large inventories spill to a file so
//! the full record set never has to sit in memory.
//!
//! # Backends
//!
//! All backends implement the [`ChecksumJournal`] trait:
//!
//! - [`FileJournal`] -- length and CRC framed records in a (temporary) file
//! - [`MemoryJournal`] -- `Vec`-backed journal for small inventories and tests

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{JournalError, JournalResult};
pub use file::{FileJournal, FileJournalReader, JournalConfig};
pub use memory::{MemoryJournal, MemoryJournalReader};
pub use traits::ChecksumJournal;
