use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use s3sum_hash::ChecksumCalculator;
use s3sum_types::{ObjectAttributes, RemoteObjectDescriptor};

use crate::error::{InventoryError, InventoryResult};
use crate::traits::{AttributeFetcher, ListPage, ObjectLister};

/// Default number of keys per listing page, matching S3.
const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Clone, Debug)]
struct StoredObject {
    size: u64,
    attributes: ObjectAttributes,
}

/// In-memory bucket for tests and embedding.
///
/// Checksums are computed the way the object store computes them at upload
/// time. Listing and attribute failures can be injected to exercise the
/// error paths of a run.
pub struct InMemoryBucket {
    objects: RwLock<BTreeMap<String, StoredObject>>,
    page_size: usize,
    failing_page: RwLock<Option<u64>>,
    failing_keys: RwLock<HashSet<String>>,
}

impl InMemoryBucket {
    /// Create an empty bucket with S3's default page size.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Create an empty bucket that lists `page_size` keys per page.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
            failing_page: RwLock::new(None),
            failing_keys: RwLock::new(HashSet::new()),
        }
    }

    /// Store a single-part object with its SHA-256 checksum.
    pub fn put_object(&self, key: &str, data: &[u8]) {
        let checksum = ChecksumCalculator::new().checksum_bytes(data, None).ok();
        self.put_raw(
            key,
            data.len() as u64,
            ObjectAttributes {
                checksum,
                part_sizes: None,
            },
        );
    }

    /// Store a multipart object uploaded with the given part sizes.
    pub fn put_multipart(&self, key: &str, data: &[u8], part_sizes: &[u64]) -> InventoryResult<()> {
        let checksum = ChecksumCalculator::new().checksum_bytes(data, Some(part_sizes))?;
        self.put_raw(
            key,
            data.len() as u64,
            ObjectAttributes {
                checksum: Some(checksum),
                part_sizes: Some(part_sizes.to_vec()),
            },
        );
        Ok(())
    }

    /// Store an object that was uploaded without a checksum.
    pub fn put_without_checksum(&self, key: &str, size: u64) {
        self.put_raw(key, size, ObjectAttributes::default());
    }

    /// Store a zero-size directory marker.
    pub fn put_placeholder(&self, key: &str) {
        self.put_raw(key, 0, ObjectAttributes::default());
    }

    /// Store an object with arbitrary metadata.
    pub fn put_raw(&self, key: &str, size: u64, attributes: ObjectAttributes) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), StoredObject { size, attributes });
    }

    /// Make the listing fail when page `page` (1-based) is requested.
    pub fn fail_on_page(&self, page: u64) {
        *self.failing_page.write().expect("lock poisoned") = Some(page);
    }

    /// Make attribute fetches for `key` fail.
    pub fn fail_attributes_for(&self, key: &str) {
        self.failing_keys
            .write()
            .expect("lock poisoned")
            .insert(key.to_string());
    }

    /// Number of stored objects, markers included.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the bucket is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryBucket {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectLister for InMemoryBucket {
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> InventoryResult<ListPage> {
        // Tokens are the offset of the next key in the prefix-filtered listing.
        let offset: usize = match continuation {
            Some(token) => token
                .parse()
                .map_err(|_| InventoryError::Remote(format!("invalid continuation token {token:?}")))?,
            None => 0,
        };
        let page_number = (offset / self.page_size) as u64 + 1;
        if *self.failing_page.read().expect("lock poisoned") == Some(page_number) {
            return Err(InventoryError::Remote(format!(
                "injected failure on page {page_number}"
            )));
        }

        let map = self.objects.read().expect("lock poisoned");
        let mut matching = map
            .iter()
            .filter(|(key, _)| prefix.map_or(true, |p| key.starts_with(p)))
            .skip(offset);
        let objects: Vec<RemoteObjectDescriptor> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, obj)| RemoteObjectDescriptor::new(key.clone(), obj.size))
            .collect();
        let next_continuation = matching
            .next()
            .map(|_| (offset + objects.len()).to_string());

        Ok(ListPage {
            objects,
            next_continuation,
        })
    }
}

#[async_trait]
impl AttributeFetcher for InMemoryBucket {
    async fn fetch_attributes(&self, key: &str) -> InventoryResult<ObjectAttributes> {
        if self.failing_keys.read().expect("lock poisoned").contains(key) {
            return Err(InventoryError::AttributeUnavailable {
                key: key.to_string(),
                reason: "injected failure".into(),
            });
        }
        let map = self.objects.read().expect("lock poisoned");
        map.get(key)
            .map(|obj| obj.attributes.clone())
            .ok_or_else(|| InventoryError::AttributeUnavailable {
                key: key.to_string(),
                reason: "no such key".into(),
            })
    }
}

impl std::fmt::Debug for InMemoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBucket")
            .field("object_count", &self.len())
            .field("page_size", &self.page_size)
            .finish()
    }
}
