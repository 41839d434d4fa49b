//! Reconciliation engine for s3sum.
//!
//! Joins a remote object inventory and a local file inventory into a
//! [`ReconciliationResult`](s3sum_types::ReconciliationResult) by comparing
//! SHA-256 content checksums.
//!
//! A run has two phases. The fetch phase pulls checksum metadata for every
//! remote key and spills it to a [`ChecksumJournal`](s3sum_journal::ChecksumJournal).
//! The compare phase streams the sealed journal, hashing each local file with
//! the recorded part layout. Both phases run at most
//! [`ReconcileConfig::concurrency_limit`] units of work at a time.
//!
//! Only an incomplete remote listing, a failed local walk, or a journal
//! failure aborts a run. Everything that goes wrong for a single key becomes
//! part of the result.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;

pub use classify::{classify_checksum, diff_key_space, layout_sentinel};
pub use config::{ReconcileConfig, DEFAULT_CONCURRENCY_LIMIT};
pub use engine::{Reconciler, RunReport, RunStats};
pub use error::{ReconcileError, ReconcileResult};
