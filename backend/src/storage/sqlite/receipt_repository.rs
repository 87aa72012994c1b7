use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::connection::DbConnection;
use crate::domain::models::ReceiptRecord;
use crate::storage::encoding::{
    decode_amount, decode_id, decode_instant, encode_amount, encode_instant,
};
use crate::storage::traits::ReceiptStorage;

const RECEIPT_COLUMNS: &str = "id, receipt_number, date, customer_name, amount_words, \
     amount_numeric, tracking_number, purpose, carrier, created_at";

/// Repository for receipt operations
#[derive(Clone)]
pub struct ReceiptRepository {
    db: DbConnection,
}

impl ReceiptRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_receipt(row: &SqliteRow) -> Result<ReceiptRecord> {
        Ok(ReceiptRecord {
            id: decode_id(&row.try_get::<String, _>("id")?)?,
            receipt_number: row.try_get("receipt_number")?,
            date: decode_instant(&row.try_get::<String, _>("date")?)?,
            customer_name: row.try_get("customer_name")?,
            amount_words: row.try_get("amount_words")?,
            amount_numeric: decode_amount(&row.try_get::<String, _>("amount_numeric")?)?,
            tracking_number: row.try_get("tracking_number")?,
            purpose: row.try_get("purpose")?,
            carrier: row.try_get("carrier")?,
            created_at: decode_instant(&row.try_get::<String, _>("created_at")?)?,
        })
    }
}

#[async_trait]
impl ReceiptStorage for ReceiptRepository {
    async fn store_receipt(&self, receipt: &ReceiptRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, receipt_number, date, customer_name, amount_words,
                amount_numeric, tracking_number, purpose, carrier, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(receipt.id.to_string())
        .bind(&receipt.receipt_number)
        .bind(encode_instant(&receipt.date))
        .bind(&receipt.customer_name)
        .bind(&receipt.amount_words)
        .bind(encode_amount(&receipt.amount_numeric))
        .bind(&receipt.tracking_number)
        .bind(&receipt.purpose)
        .bind(&receipt.carrier)
        .bind(encode_instant(&receipt.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_receipt(&self, receipt_id: &Uuid) -> Result<Option<ReceiptRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM receipts WHERE id = ?", RECEIPT_COLUMNS))
            .bind(receipt_id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_receipt).transpose()
    }

    async fn list_receipts(&self) -> Result<Vec<ReceiptRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM receipts ORDER BY created_at DESC, ROWID DESC",
            RECEIPT_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_receipt).collect()
    }
}
