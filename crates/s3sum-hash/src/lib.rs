//! Checksum computation for s3sum.
//!
//! Reproduces the object store's whole-object SHA-256 checksum from local
//! bytes. Single-part objects hash the raw content; multipart uploads hash
//! the concatenation of the raw per-part digests, using the exact part
//! boundaries recorded at upload time. All values are standard base64 with
//! padding.
//!
//! Digests come from the `sha2` crate; encoding from `base64`.

pub mod calculator;
pub mod error;

pub use calculator::{
    composite_digest, encode_digest, validate_part_sizes, whole_digest, ChecksumCalculator,
    DIGEST_LEN,
};
pub use error::{HashError, HashResult};
