//! Foundation types for s3sum.
//!
//! This crate provides the data model shared by every other s3sum crate: the
//! descriptors produced by the remote and local inventories, the per-object
//! checksum records spilled to the journal, and the reconciliation result.
//!
//! # Key Types
//!
//! - [`RemoteObjectDescriptor`] -- one listed object (key and size)
//! - [`LocalFileDescriptor`] -- one regular file under the comparison root
//! - [`ChecksumRecord`] -- remote checksum metadata for one key
//! - [`Outcome`] -- the classification of a single remote key
//! - [`ReconciliationResult`] -- all classified keys, as ordered sets
//!
//! The [`paths`] module maps object keys and local paths onto one canonical
//! relative form so the two inventories can be joined on equal strings.

pub mod object;
pub mod paths;
pub mod record;
pub mod result;

pub use object::{LocalFileDescriptor, RemoteObjectDescriptor};
pub use record::{ChecksumRecord, ObjectAttributes};
pub use result::{MismatchDetail, Outcome, OutcomeKind, ReconciliationResult};
