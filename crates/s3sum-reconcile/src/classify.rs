use std::collections::HashSet;

use s3sum_hash::{HashError, HashResult};
use s3sum_types::{LocalFileDescriptor, MismatchDetail, Outcome, RemoteObjectDescriptor};

/// Local paths with no remote object of the same key.
///
/// Only this direction is resolved here; remote-only keys surface later as
/// `missing_locally` when their journal record finds no local file.
pub fn diff_key_space(
    remote: &[RemoteObjectDescriptor],
    local: &[LocalFileDescriptor],
) -> Vec<String> {
    let remote_keys: HashSet<&str> = remote.iter().map(|o| o.key.as_str()).collect();
    local
        .iter()
        .filter(|f| !remote_keys.contains(f.relative_path.as_str()))
        .map(|f| f.relative_path.clone())
        .collect()
}

/// Classify a computed local checksum against the remote one.
///
/// Equality is exact and case-sensitive on the base64 text. Part layouts
/// that cannot describe the file are mismatches carrying a sentinel; read
/// errors are reported as unreadable, never as mismatches.
pub fn classify_checksum(remote: &str, computed: HashResult<String>) -> Outcome {
    match computed {
        Ok(local) if local == remote => Outcome::Match,
        Ok(local) => Outcome::Mismatch(MismatchDetail {
            remote_checksum: remote.to_string(),
            local_checksum: local,
        }),
        Err(HashError::Io(e)) => Outcome::Unreadable(e.to_string()),
        Err(e) => Outcome::Mismatch(MismatchDetail {
            remote_checksum: remote.to_string(),
            local_checksum: layout_sentinel(&e),
        }),
    }
}

/// Explanatory value reported in place of a local checksum when the
/// recorded part layout cannot be applied to the file.
pub fn layout_sentinel(err: &HashError) -> String {
    match err {
        HashError::SizeMismatch { expected, actual } => {
            format!("size-mismatch: parts sum to {expected} bytes, file has {actual} bytes")
        }
        other => format!("invalid-part-layout: {other}"),
    }
}
