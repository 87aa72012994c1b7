//! Receipt store gateway.
//!
//! The only component that talks to storage. It assigns `id` and `created_at`
//! on creation and turns every storage fault into an opaque [`StoreError`]
//! after logging the underlying cause.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::models::{ReceiptRecord, ValidatedReceipt};
use crate::storage::ReceiptStorage;

/// Storage failure as reported to callers. The cause is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create receipt")]
    Create,
    #[error("Failed to fetch receipts")]
    List,
    #[error("Failed to fetch receipt")]
    Get,
}

#[derive(Clone)]
pub struct ReceiptGateway {
    storage: Arc<dyn ReceiptStorage>,
}

impl ReceiptGateway {
    pub fn new(storage: Arc<dyn ReceiptStorage>) -> Self {
        Self { storage }
    }

    /// Persist a validated receipt and return the stored record.
    ///
    /// `created_at` is kept to microseconds, the precision every backend stores.
    pub async fn create(&self, validated: ValidatedReceipt) -> Result<ReceiptRecord, StoreError> {
        let record = ReceiptRecord::from_validated(validated, Uuid::new_v4(), Utc::now().trunc_subsecs(6));

        match self.storage.store_receipt(&record).await {
            Ok(()) => {
                info!("Created receipt {} ({})", record.id, record.receipt_number);
                Ok(record)
            }
            Err(e) => {
                error!("Failed to store receipt {}: {:#}", record.receipt_number, e);
                Err(StoreError::Create)
            }
        }
    }

    /// Every stored receipt, newest first
    pub async fn list_all(&self) -> Result<Vec<ReceiptRecord>, StoreError> {
        self.storage.list_receipts().await.map_err(|e| {
            error!("Failed to list receipts: {:#}", e);
            StoreError::List
        })
    }

    /// Look up one receipt. An id that is not a valid identifier simply matches nothing.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ReceiptRecord>, StoreError> {
        let receipt_id = match Uuid::parse_str(id.trim()) {
            Ok(receipt_id) => receipt_id,
            Err(_) => {
                debug!("Receipt id '{}' is not a UUID, treating as not found", id);
                return Ok(None);
            }
        };

        self.storage.get_receipt(&receipt_id).await.map_err(|e| {
            error!("Failed to fetch receipt {}: {:#}", receipt_id, e);
            StoreError::Get
        })
    }
}
