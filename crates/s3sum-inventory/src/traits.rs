use async_trait::async_trait;
use s3sum_types::{ObjectAttributes, RemoteObjectDescriptor};

use crate::error::InventoryResult;

/// One page of a remote listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<RemoteObjectDescriptor>,
    /// Continuation token for the next page, `None` on the last page.
    pub next_continuation: Option<String>,
}

/// Paginated listing of a bucket.
///
/// Implementations report each page as-is, including zero-size markers;
/// filtering and deduplication happen in [`list_inventory`](crate::list_inventory).
/// A page that claims to be truncated but carries no continuation token
/// must be reported as an error.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> InventoryResult<ListPage>;
}

/// Per-object checksum metadata.
#[async_trait]
pub trait AttributeFetcher: Send + Sync {
    /// Remote checksum and, for multipart uploads, the ordered part sizes.
    ///
    /// `Ok` with `checksum: None` means the object carries no checksum; `Err`
    /// means the metadata could not be retrieved at all.
    async fn fetch_attributes(&self, key: &str) -> InventoryResult<ObjectAttributes>;
}
