//! SQLite storage backend built on SQLx.

pub mod connection;
pub mod receipt_repository;

pub use connection::DbConnection;
pub use receipt_repository::ReceiptRepository;
