use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{HashError, HashResult};

/// Length of a raw SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Default read buffer size (1 MiB).
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Streaming checksum calculator.
///
/// Content is hashed through a fixed-size buffer, so files of any size can
/// be checked without loading them into memory. The buffer size has no
/// effect on the result.
#[derive(Clone, Debug)]
pub struct ChecksumCalculator {
    buffer_size: usize,
}

impl Default for ChecksumCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChecksumCalculator {
    /// Calculator with the default 1 MiB buffer.
    pub const fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Calculator with a custom buffer size (minimum one byte).
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Checksum of an in-memory byte slice.
    pub fn checksum_bytes(&self, data: &[u8], part_sizes: Option<&[u64]>) -> HashResult<String> {
        self.checksum_reader(data, part_sizes)
    }

    /// Checksum of everything `reader` yields.
    ///
    /// With `part_sizes`, the content must be exactly as long as the parts
    /// combined; anything else is a [`HashError::SizeMismatch`].
    pub fn checksum_reader<R: Read>(
        &self,
        mut reader: R,
        part_sizes: Option<&[u64]>,
    ) -> HashResult<String> {
        let mut buf = vec![0u8; self.buffer_size];
        let digest = match part_sizes {
            None => {
                let (digest, _) = hash_up_to(&mut reader, u64::MAX, &mut buf)?;
                digest
            }
            Some(parts) => {
                let expected = validate_part_sizes(parts)?;
                let mut part_digests = Vec::with_capacity(parts.len());
                let mut consumed: u64 = 0;
                for &size in parts {
                    let (digest, read) = hash_up_to(&mut reader, size, &mut buf)?;
                    consumed += read;
                    if read < size {
                        return Err(HashError::SizeMismatch {
                            expected,
                            actual: consumed,
                        });
                    }
                    part_digests.push(digest);
                }
                let trailing = drain(&mut reader, &mut buf)?;
                if trailing > 0 {
                    return Err(HashError::SizeMismatch {
                        expected,
                        actual: consumed + trailing,
                    });
                }
                composite_digest(&part_digests)
            }
        };
        Ok(encode_digest(&digest))
    }

    /// Checksum of a local file.
    ///
    /// For multipart layouts the file length is compared against the part
    /// sizes before any content is read.
    pub fn checksum_file(&self, path: &Path, part_sizes: Option<&[u64]>) -> HashResult<String> {
        if let Some(parts) = part_sizes {
            let expected = validate_part_sizes(parts)?;
            let actual = std::fs::metadata(path)?.len();
            if actual != expected {
                return Err(HashError::SizeMismatch { expected, actual });
            }
        }
        let file = File::open(path)?;
        let checksum = self.checksum_reader(file, part_sizes)?;
        debug!(path = %path.display(), parts = part_sizes.map(<[u64]>::len), "computed checksum");
        Ok(checksum)
    }
}

/// Check a recorded part layout and return the total size it describes.
///
/// Fails fast on an empty list or a zero-sized part, before any content is
/// touched.
pub fn validate_part_sizes(parts: &[u64]) -> HashResult<u64> {
    if parts.is_empty() {
        return Err(HashError::EmptyPartList);
    }
    let mut total: u64 = 0;
    for (index, &size) in parts.iter().enumerate() {
        if size == 0 {
            return Err(HashError::ZeroPartSize { index });
        }
        total = total.checked_add(size).ok_or(HashError::PartSizeOverflow)?;
    }
    Ok(total)
}

/// Raw SHA-256 digest of `data`.
pub fn whole_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    Sha256::digest(data).into()
}

/// SHA-256 over the concatenation of raw part digests, in order.
pub fn composite_digest(part_digests: &[[u8; DIGEST_LEN]]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    for digest in part_digests {
        hasher.update(digest);
    }
    hasher.finalize().into()
}

/// Standard base64 (with padding) of a raw digest.
pub fn encode_digest(digest: &[u8; DIGEST_LEN]) -> String {
    STANDARD.encode(digest)
}

/// Hash at most `limit` bytes from `reader`. Returns the digest and the
/// number of bytes actually read (short only at end of input).
fn hash_up_to<R: Read>(
    reader: &mut R,
    limit: u64,
    buf: &mut [u8],
) -> io::Result<([u8; DIGEST_LEN], u64)> {
    let mut hasher = Sha256::new();
    let mut remaining = limit;
    while remaining > 0 {
        let want = remaining.min(buf.len() as u64) as usize;
        let n = match reader.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        remaining -= n as u64;
    }
    Ok((hasher.finalize().into(), limit - remaining))
}

/// Consume the rest of `reader`, returning how many bytes were left.
fn drain<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<u64> {
    let mut total: u64 = 0;
    loop {
        match reader.read(buf) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
