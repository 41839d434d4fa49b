use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("inventory error: {0}")]
    Inventory(#[from] s3sum_inventory::InventoryError),

    #[error("journal error: {0}")]
    Journal(#[from] s3sum_journal::JournalError),

    #[error("background task failed: {0}")]
    Task(String),
}

impl ReconcileError {
    /// Returns `true` if the remote listing did not complete.
    pub fn is_incomplete_inventory(&self) -> bool {
        matches!(
            self,
            Self::Inventory(s3sum_inventory::InventoryError::IncompleteInventory { .. })
        )
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;
