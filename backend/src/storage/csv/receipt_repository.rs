use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use csv::{Reader, StringRecord, Writer};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use tracing::{debug, info};
use uuid::Uuid;

use super::connection::{CsvConnection, RECEIPT_HEADERS};
use crate::domain::models::ReceiptRecord;
use crate::storage::encoding::{
    decode_amount, decode_id, decode_instant, encode_amount, encode_instant,
};
use crate::storage::traits::ReceiptStorage;

/// CSV-based receipt repository
#[derive(Clone)]
pub struct ReceiptRepository {
    connection: CsvConnection,
}

impl ReceiptRepository {
    /// Create a new CSV receipt repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read the raw rows of the receipts file, in insertion order.
    /// A missing file means no receipts yet.
    fn read_rows(&self) -> Result<Vec<StringRecord>> {
        let file_path = self.connection.receipts_file_path();
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            rows.push(result?);
        }
        Ok(rows)
    }

    /// Replace the receipts file with `rows`, atomically
    fn write_rows(&self, rows: &[StringRecord]) -> Result<()> {
        let file_path = self.connection.receipts_file_path();

        // Create a temporary file for atomic write
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            csv_writer.write_record(RECEIPT_HEADERS)?;
            for row in rows {
                csv_writer.write_record(row)?;
            }
            csv_writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &file_path)?;
        Ok(())
    }

    fn receipt_to_row(receipt: &ReceiptRecord) -> StringRecord {
        StringRecord::from(vec![
            receipt.id.to_string(),
            receipt.receipt_number.clone(),
            encode_instant(&receipt.date),
            receipt.customer_name.clone(),
            receipt.amount_words.clone(),
            encode_amount(&receipt.amount_numeric),
            receipt.tracking_number.clone(),
            receipt.purpose.clone(),
            receipt.carrier.clone(),
            encode_instant(&receipt.created_at),
        ])
    }

    fn row_to_receipt(row: &StringRecord) -> Result<ReceiptRecord> {
        let field = |index: usize| -> Result<&str> {
            row.get(index).ok_or_else(|| {
                anyhow!(
                    "receipts file row is missing column '{}'",
                    RECEIPT_HEADERS.get(index).copied().unwrap_or("?")
                )
            })
        };

        Ok(ReceiptRecord {
            id: decode_id(field(0)?)?,
            receipt_number: field(1)?.to_string(),
            date: decode_instant(field(2)?)?,
            customer_name: field(3)?.to_string(),
            amount_words: field(4)?.to_string(),
            amount_numeric: decode_amount(field(5)?)?,
            tracking_number: field(6)?.to_string(),
            purpose: field(7)?.to_string(),
            carrier: field(8)?.to_string(),
            created_at: decode_instant(field(9)?)?,
        })
    }

    fn read_receipts(&self) -> Result<Vec<ReceiptRecord>> {
        self.read_rows()?
            .iter()
            .enumerate()
            .map(|(line, row)| {
                Self::row_to_receipt(row).with_context(|| format!("receipts file record {}", line + 1))
            })
            .collect()
    }
}

#[async_trait]
impl ReceiptStorage for ReceiptRepository {
    async fn store_receipt(&self, receipt: &ReceiptRecord) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;
        self.connection.ensure_receipts_file_exists()?;

        let mut rows = self.read_rows()?;
        let id = receipt.id.to_string();
        if rows.iter().any(|row| row.get(0) == Some(id.as_str())) {
            return Err(anyhow!("receipt {} already exists", id));
        }

        rows.push(Self::receipt_to_row(receipt));
        self.write_rows(&rows)?;

        info!("Stored receipt {} in CSV ({} total)", receipt.id, rows.len());
        Ok(())
    }

    async fn get_receipt(&self, receipt_id: &Uuid) -> Result<Option<ReceiptRecord>> {
        let id = receipt_id.to_string();
        self.read_rows()?
            .iter()
            .find(|row| row.get(0) == Some(id.as_str()))
            .map(Self::row_to_receipt)
            .transpose()
    }

    async fn list_receipts(&self) -> Result<Vec<ReceiptRecord>> {
        let mut receipts = self.read_receipts()?;

        // Latest insert first, then a stable sort keeps that order for equal instants
        receipts.reverse();
        receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!("Read {} receipts from CSV", receipts.len());
        Ok(receipts)
    }
}
