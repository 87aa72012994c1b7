//! Test utilities for storage tests.
//!
//! `TestEnvironment` owns a temporary directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

use super::csv::CsvConnection;
use crate::domain::models::ReceiptRecord;

/// Temporary data directory plus a CSV connection rooted in it
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// A receipt created now
pub fn sample_receipt(receipt_number: &str) -> ReceiptRecord {
    sample_receipt_at(receipt_number, Utc::now())
}

/// A receipt created at `created_at`, truncated to the precision the backends keep
pub fn sample_receipt_at(receipt_number: &str, created_at: DateTime<Utc>) -> ReceiptRecord {
    ReceiptRecord {
        id: Uuid::new_v4(),
        receipt_number: receipt_number.to_string(),
        date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        customer_name: "Ada Okafor".to_string(),
        amount_words: "Fifteen thousand naira only".to_string(),
        amount_numeric: Decimal::new(1500050, 2),
        tracking_number: "LL99887766".to_string(),
        purpose: "Logistic Service".to_string(),
        carrier: "DHL".to_string(),
        created_at: created_at.trunc_subsecs(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
        }
        assert!(!base_path.exists());
        Ok(())
    }
}
