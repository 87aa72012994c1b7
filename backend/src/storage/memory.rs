//! In-memory receipt storage.
//!
//! Nothing survives a restart. Used for demos and by service-level tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::ReceiptRecord;
use crate::storage::traits::ReceiptStorage;

/// Receipts held in insertion order
#[derive(Clone, Default)]
pub struct MemoryReceiptRepository {
    receipts: Arc<RwLock<Vec<ReceiptRecord>>>,
}

impl MemoryReceiptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptStorage for MemoryReceiptRepository {
    async fn store_receipt(&self, receipt: &ReceiptRecord) -> Result<()> {
        let mut receipts = self.receipts.write().await;
        if receipts.iter().any(|existing| existing.id == receipt.id) {
            return Err(anyhow!("receipt {} already exists", receipt.id));
        }
        receipts.push(receipt.clone());
        Ok(())
    }

    async fn get_receipt(&self, receipt_id: &Uuid) -> Result<Option<ReceiptRecord>> {
        let receipts = self.receipts.read().await;
        Ok(receipts.iter().find(|r| &r.id == receipt_id).cloned())
    }

    async fn list_receipts(&self) -> Result<Vec<ReceiptRecord>> {
        let mut receipts: Vec<ReceiptRecord> = self.receipts.read().await.iter().rev().cloned().collect();
        receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(receipts)
    }
}
