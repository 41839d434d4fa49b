//! Inventory sources for s3sum.
//!
//! The reconciliation core consumes three boundaries, all defined here:
//!
//! - [`ObjectLister`] -- one page of a remote listing; [`list_inventory`]
//!   drains every page and fails the whole listing if any page fails
//! - [`AttributeFetcher`] -- remote checksum and multipart layout of one key
//! - [`LocalTree`] -- regular files under the local comparison root
//!
//! # Backends
//!
//! - [`S3Bucket`] -- Amazon S3 or any S3-compatible endpoint
//! - [`InMemoryBucket`] -- `BTreeMap`-based bucket for tests and embedding

pub mod error;
pub mod listing;
pub mod local;
pub mod memory;
pub mod s3;
pub mod traits;

pub use error::{InventoryError, InventoryResult};
pub use listing::list_inventory;
pub use local::{LocalEntry, LocalTree};
pub use memory::InMemoryBucket;
pub use s3::{S3Bucket, S3Options};
pub use traits::{AttributeFetcher, ListPage, ObjectLister};
