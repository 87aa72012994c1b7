//! # Domain Module
//!
//! Business logic for issuing and reproducing receipts. Nothing here knows
//! about HTTP, and storage is reached only through [`ReceiptGateway`].
//!
//! ## Module Organization
//!
//! - **models**: the receipt record, carriers and the display derivations
//! - **validation**: raw form fields to a validated receipt or per-field errors
//! - **receipt_gateway**: create, list and look up stored receipts
//! - **rendering**: stored receipt to display-ready strings
//! - **export_service**: printable documents and the history CSV
//! - **receipt_service**: the submit / history / preview workflow
//!
//! ## Business Rules
//!
//! - Receipts are never updated or deleted
//! - `id` and `created_at` are assigned by the gateway, never by the caller
//! - Receipt numbers are caller-supplied and may repeat
//! - Rendering the same receipt always yields the same output

pub mod export_service;
pub mod models;
pub mod receipt_gateway;
pub mod receipt_service;
pub mod rendering;
pub mod validation;

pub use export_service::{ExportService, FileDocumentTarget};
pub use receipt_gateway::{ReceiptGateway, StoreError};
pub use receipt_service::{ReceiptPreview, ReceiptService, SubmitError};
pub use rendering::ReceiptFormatter;
pub use validation::ReceiptValidator;
