use std::collections::HashSet;

use s3sum_types::RemoteObjectDescriptor;
use tracing::{debug, info};

use crate::error::{InventoryError, InventoryResult};
use crate::traits::ObjectLister;

/// Drain every page of a listing into a complete, deduplicated inventory.
///
/// Zero-size objects (directory markers, placeholders) are dropped. The first
/// occurrence of a duplicated key wins. Any failed page turns into
/// [`InventoryError::IncompleteInventory`]: a partially drained listing is
/// never returned.
pub async fn list_inventory<L: ObjectLister + ?Sized>(
    lister: &L,
    prefix: Option<&str>,
) -> InventoryResult<Vec<RemoteObjectDescriptor>> {
    let mut seen = HashSet::new();
    let mut objects = Vec::new();
    let mut placeholders: u64 = 0;
    let mut pages_read: u64 = 0;
    let mut token: Option<String> = None;

    loop {
        let page = lister
            .list_page(prefix, token.as_deref())
            .await
            .map_err(|e| InventoryError::IncompleteInventory {
                pages_read,
                reason: e.to_string(),
            })?;
        pages_read += 1;
        debug!(page = pages_read, objects = page.objects.len(), "listing page");

        for object in page.objects {
            if object.is_placeholder() {
                placeholders += 1;
                continue;
            }
            if seen.insert(object.key.clone()) {
                objects.push(object);
            } else {
                debug!(key = %object.key, "duplicate key in listing");
            }
        }

        match page.next_continuation {
            Some(next) if token.as_deref() == Some(next.as_str()) => {
                return Err(InventoryError::IncompleteInventory {
                    pages_read,
                    reason: format!("continuation token {next:?} repeated"),
                });
            }
            Some(next) => token = Some(next),
            None => break,
        }
    }

    info!(
        pages = pages_read,
        objects = objects.len(),
        placeholders,
        "remote inventory complete"
    );
    Ok(objects)
}
