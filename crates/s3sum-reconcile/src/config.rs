/// Default number of concurrent units of work per phase.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 32;

/// Configuration for a reconciliation run.
#[derive(Clone, Debug)]
pub struct ReconcileConfig {
    /// Key prefix scoping both the remote listing and the local walk.
    pub prefix: Option<String>,
    /// Maximum concurrent attribute fetches, and separately maximum
    /// concurrent local comparisons.
    pub concurrency_limit: usize,
    /// Read buffer used when hashing local files.
    pub hash_buffer_size: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            hash_buffer_size: 1024 * 1024,
        }
    }
}

impl ReconcileConfig {
    /// Default configuration scoped to `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }
}
