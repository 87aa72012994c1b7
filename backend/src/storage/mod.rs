//! # Storage Layer
//!
//! Receipt persistence behind the [`ReceiptStorage`] trait. Three backends are
//! available and chosen at start-up from [`StorageConfig`]:
//!
//! - `sqlite`: a SQLx pool over a single `receipts` table
//! - `csv`: one `receipts.csv` file in a data directory
//! - `memory`: a process-local vector, lost on restart
//!
//! All three encode instants and amounts through [`encoding`] so that a record
//! reads back exactly as it was written.

pub mod csv;
pub mod encoding;
pub mod memory;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

pub use self::csv::CsvConnection;
pub use memory::MemoryReceiptRepository;
pub use sqlite::DbConnection;
pub use traits::{Connection, ReceiptStorage};

/// Open the configured backend and hand back a shared repository for it
pub async fn open_storage(config: &StorageConfig) -> Result<Arc<dyn ReceiptStorage>> {
    let storage: Arc<dyn ReceiptStorage> = match config.backend {
        StorageBackend::Sqlite => {
            let db = DbConnection::new(&config.database_url, config.max_connections).await?;
            Arc::new(db.create_receipt_repository())
        }
        StorageBackend::Csv => {
            let connection = CsvConnection::new(&config.data_dir)?;
            Arc::new(connection.create_receipt_repository())
        }
        StorageBackend::Memory => Arc::new(MemoryReceiptRepository::new()),
    };

    info!("Receipt storage ready ({})", config.backend);
    Ok(storage)
}
