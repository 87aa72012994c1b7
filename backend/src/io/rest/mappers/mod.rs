pub mod receipt_mapper;

pub use receipt_mapper::ReceiptMapper;
