//! Amazon S3 backend.
//!
//! Listing uses `ListObjectsV2`; checksum metadata comes from
//! `GetObjectAttributes` with the `Checksum` and `ObjectParts` attributes.
//! Credentials and region resolve through the standard AWS chain
//! (environment, shared profile files, instance metadata), optionally pinned
//! to a named profile.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::types::ObjectAttributes as S3Attribute;
use aws_sdk_s3::Client;
use s3sum_types::{ObjectAttributes, RemoteObjectDescriptor};
use tracing::{debug, info};

use crate::error::{InventoryError, InventoryResult};
use crate::traits::{AttributeFetcher, ListPage, ObjectLister};

/// Parts requested per `GetObjectAttributes` call (the service maximum).
const MAX_PARTS_PER_REQUEST: i32 = 1000;

/// Connection settings for an S3 bucket.
#[derive(Clone, Debug, Default)]
pub struct S3Options {
    pub bucket: String,
    /// Named profile from the shared config/credentials files.
    pub profile: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (`endpoint/bucket/key`).
    pub force_path_style: bool,
}

/// A bucket reached through the AWS SDK.
pub struct S3Bucket {
    client: Client,
    bucket: String,
}

impl S3Bucket {
    /// Build a client and resolve credentials up front, so a bad profile
    /// fails before any listing starts.
    pub async fn connect(options: &S3Options) -> InventoryResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| InventoryError::Credentials("no credentials provider configured".into()))?;
        provider
            .provide_credentials()
            .await
            .map_err(|e| InventoryError::Credentials(e.to_string()))?;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(url) = &options.endpoint_url {
            builder = builder.endpoint_url(url);
        }
        if options.force_path_style {
            builder = builder.force_path_style(true);
        }

        info!(bucket = %options.bucket, endpoint = ?options.endpoint_url, "connected to object store");
        Ok(Self::from_client(Client::from_conf(builder.build()), &options.bucket))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectLister for S3Bucket {
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> InventoryResult<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(&self.bucket);
        if let Some(p) = prefix {
            req = req.prefix(p);
        }
        if let Some(t) = continuation {
            req = req.continuation_token(t);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| InventoryError::Remote(format!("list_objects_v2 failed: {e:?}")))?;

        let objects = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| {
                let key = obj.key?;
                let size = obj.size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0);
                Some(RemoteObjectDescriptor::new(key, size))
            })
            .collect();

        let next_continuation = if resp.is_truncated.unwrap_or(false) {
            match resp.next_continuation_token {
                Some(token) => Some(token),
                None => {
                    return Err(InventoryError::Remote(
                        "truncated listing page without a continuation token".into(),
                    ))
                }
            }
        } else {
            None
        };

        Ok(ListPage {
            objects,
            next_continuation,
        })
    }
}

#[async_trait]
impl AttributeFetcher for S3Bucket {
    async fn fetch_attributes(&self, key: &str) -> InventoryResult<ObjectAttributes> {
        let unavailable = |reason: String| InventoryError::AttributeUnavailable {
            key: key.to_string(),
            reason,
        };

        let mut checksum: Option<String> = None;
        let mut parts: Vec<(i32, i64)> = Vec::new();
        let mut multipart = false;
        let mut declared_parts: Option<i32> = None;
        let mut marker: Option<String> = None;

        loop {
            let mut req = self
                .client
                .get_object_attributes()
                .bucket(&self.bucket)
                .key(key)
                .object_attributes(S3Attribute::Checksum)
                .object_attributes(S3Attribute::ObjectParts)
                .max_parts(MAX_PARTS_PER_REQUEST);
            if let Some(m) = &marker {
                req = req.part_number_marker(m);
            }
            let resp = req
                .send()
                .await
                .map_err(|e| unavailable(format!("get_object_attributes failed: {e:?}")))?;

            if checksum.is_none() {
                checksum = resp.checksum.and_then(|c| c.checksum_sha256);
            }

            let Some(object_parts) = resp.object_parts else {
                break;
            };
            multipart = true;
            declared_parts = declared_parts.or(object_parts.total_parts_count);
            for part in object_parts.parts.unwrap_or_default() {
                let number = part.part_number.unwrap_or(0);
                let size = part
                    .size
                    .ok_or_else(|| unavailable(format!("part {number} has no size")))?;
                parts.push((number, size));
            }

            if object_parts.is_truncated.unwrap_or(false) {
                match object_parts.next_part_number_marker {
                    Some(next) if marker.as_deref() != Some(next.as_str()) => marker = Some(next),
                    _ => return Err(unavailable("part listing stalled".into())),
                }
            } else {
                break;
            }
        }

        let part_sizes = if multipart && (!parts.is_empty() || declared_parts.unwrap_or(0) > 0) {
            if parts.is_empty() {
                // Parts uploaded without checksums are not itemized.
                return Err(unavailable(format!(
                    "{} parts declared but part sizes were not reported",
                    declared_parts.unwrap_or(0)
                )));
            }
            parts.sort_by_key(|(number, _)| *number);
            let sizes = parts
                .iter()
                .map(|(number, size)| {
                    u64::try_from(*size)
                        .map_err(|_| unavailable(format!("part {number} has negative size {size}")))
                })
                .collect::<InventoryResult<Vec<u64>>>()?;
            Some(sizes)
        } else {
            None
        };

        let checksum = checksum.map(|c| strip_part_count(&c).to_string());
        debug!(key, has_checksum = checksum.is_some(), parts = part_sizes.as_ref().map(Vec::len), "fetched attributes");
        Ok(ObjectAttributes {
            checksum,
            part_sizes,
        })
    }
}

impl std::fmt::Debug for S3Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Bucket").field("bucket", &self.bucket).finish()
    }
}

/// Drop a trailing `-<part count>` some S3 responses append to composite
/// checksums. Base64 never contains `-`, so a plain digest is unchanged.
fn strip_part_count(checksum: &str) -> &str {
    match checksum.rsplit_once('-') {
        Some((digest, count)) if !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) => {
            digest
        }
        _ => checksum,
    }
}
