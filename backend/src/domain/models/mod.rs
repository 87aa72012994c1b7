pub mod receipt;

pub use receipt::{display_amount, display_date, Carrier, ReceiptRecord, UnknownCarrier, ValidatedReceipt};
