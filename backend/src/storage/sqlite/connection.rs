use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::receipt_repository::ReceiptRepository;
use crate::storage::traits::Connection;

// The database URL for the production database
pub const DATABASE_URL: &str = "sqlite:receipts.db";

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection, creating the database file if needed
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        info!("Connected to receipt database at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL, 5).await
    }

    /// Initialize a private in-memory database for tests.
    /// A single connection keeps every query on the same memory database.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS receipts (
                id TEXT PRIMARY KEY,
                receipt_number TEXT NOT NULL,
                date TEXT NOT NULL,
                customer_name TEXT NOT NULL,
                amount_words TEXT NOT NULL,
                amount_numeric TEXT NOT NULL,
                tracking_number TEXT NOT NULL,
                purpose TEXT NOT NULL,
                carrier TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // History is always read newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_receipts_created_at
            ON receipts(created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // Receipt numbers come from the caller and are not unique
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_receipts_receipt_number
            ON receipts(receipt_number);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type ReceiptRepository = ReceiptRepository;

    fn create_receipt_repository(&self) -> Self::ReceiptRepository {
        ReceiptRepository::new(self.clone())
    }
}
