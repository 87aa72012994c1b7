use anyhow::Result;
use csv::Writer;
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use super::receipt_repository::ReceiptRepository;
use crate::storage::traits::Connection;

/// Name of the receipts file inside the data directory
pub const RECEIPTS_FILE_NAME: &str = "receipts.csv";

/// Column order of the receipts file
pub const RECEIPT_HEADERS: [&str; 10] = [
    "id",
    "receipt_number",
    "date",
    "customer_name",
    "amount_words",
    "amount_numeric",
    "tracking_number",
    "purpose",
    "carrier",
    "created_at",
];

/// CsvConnection manages the data directory and serializes writers to the receipts file
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created receipt data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn receipts_file_path(&self) -> PathBuf {
        self.base_directory.join(RECEIPTS_FILE_NAME)
    }

    /// Hold this guard for the whole read-modify-write of the receipts file
    pub async fn lock_for_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Create the receipts file with its header row if it doesn't exist yet.
    /// Call with the write lock held.
    pub fn ensure_receipts_file_exists(&self) -> Result<()> {
        let file_path = self.receipts_file_path();
        if file_path.exists() {
            return Ok(());
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)?;
        let mut csv_writer = Writer::from_writer(BufWriter::new(file));
        csv_writer.write_record(RECEIPT_HEADERS)?;
        csv_writer.flush()?;

        info!("Created receipts file: {}", file_path.display());
        Ok(())
    }
}

impl Connection for CsvConnection {
    type ReceiptRepository = ReceiptRepository;

    fn create_receipt_repository(&self) -> Self::ReceiptRepository {
        ReceiptRepository::new(self.clone())
    }
}
