//! # REST API Interface Layer
//!
//! HTTP endpoints for the receipt desk. Handlers translate between JSON and
//! the domain services held in [`crate::AppState`] and map domain errors to
//! status codes:
//!
//! - validation failures: `422` with a per-field message map
//! - missing receipts: `404`
//! - storage and export failures: `500` with a short summary; the cause is logged

pub mod export_apis;
pub mod mappers;
pub mod receipt_apis;
