//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::ReceiptRecord;

/// Trait defining the interface for receipt storage operations
///
/// Receipts are append-only: there is no update and no delete. Implementations
/// must make `store_receipt` all-or-nothing.
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// Store a new, fully populated receipt
    async fn store_receipt(&self, receipt: &ReceiptRecord) -> Result<()>;

    /// Retrieve a specific receipt by ID
    async fn get_receipt(&self, receipt_id: &Uuid) -> Result<Option<ReceiptRecord>>;

    /// List every receipt, ordered by `created_at` descending (most recent first).
    /// Receipts created at the same instant are ordered by most recent insertion first.
    async fn list_receipts(&self) -> Result<Vec<ReceiptRecord>>;
}

/// Trait defining the interface for storage connections
///
/// Connections own the backend handle (pool, directory) and hand out
/// repositories bound to it.
pub trait Connection: Send + Sync + Clone {
    /// The type of ReceiptStorage this connection creates
    type ReceiptRepository: ReceiptStorage + 'static;

    /// Create a new receipt repository for this connection
    fn create_receipt_repository(&self) -> Self::ReceiptRepository;
}
