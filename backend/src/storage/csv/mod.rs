//! # CSV Storage Backend
//!
//! Keeps every receipt in a single `receipts.csv` file at the root of the data
//! directory.
//!
//! ```text
//! data/
//! └── receipts.csv
//! ```
//!
//! Writes go to a temporary file that is renamed over the original, so readers
//! see either the old file or the new one, never a half-written row.

pub mod connection;
pub mod receipt_repository;

pub use connection::CsvConnection;
pub use receipt_repository::ReceiptRepository;
