//! Receipt rendering.
//!
//! Maps a stored receipt to the strings a receipt page shows. The mapping is
//! pure: the same record always renders to the same output.

use shared::{CarrierBadge, RenderedReceipt, PLACEHOLDER_LINE};

use super::models::{Carrier, ReceiptRecord};

/// Prefix of printed document titles
pub const DOCUMENT_TITLE_PREFIX: &str = "Receipt-";

#[derive(Debug, Clone, Default)]
pub struct ReceiptFormatter;

impl ReceiptFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, record: &ReceiptRecord) -> RenderedReceipt {
        RenderedReceipt {
            receipt_id: record.id.to_string(),
            receipt_number: text_or_placeholder(&record.receipt_number),
            display_date: record.display_date(),
            customer_name: text_or_placeholder(&record.customer_name.to_uppercase()),
            amount_words: text_or_placeholder(&record.amount_words.to_uppercase()),
            display_amount: record.display_amount(),
            tracking_number: text_or_placeholder(&record.tracking_number),
            purpose: text_or_placeholder(&record.purpose),
            carrier: record.carrier.clone(),
            carrier_badge: Self::badge_for(&record.carrier),
            document_title: document_title(&record.receipt_number),
        }
    }

    pub fn format_all(&self, records: &[ReceiptRecord]) -> Vec<RenderedReceipt> {
        records.iter().map(|record| self.format(record)).collect()
    }

    /// Badge for a stored carrier code. Codes outside the known set get the UPS badge.
    pub fn badge_for(carrier: &str) -> CarrierBadge {
        match carrier.parse::<Carrier>() {
            Ok(Carrier::Ups) => CarrierBadge::Ups,
            Ok(Carrier::Dhl) => CarrierBadge::Dhl,
            Ok(Carrier::Fedex) => CarrierBadge::Fedex,
            Ok(Carrier::Aramex) => CarrierBadge::Aramex,
            Err(_) => CarrierBadge::default(),
        }
    }
}

pub fn document_title(receipt_number: &str) -> String {
    format!("{}{}", DOCUMENT_TITLE_PREFIX, receipt_number.trim())
}

fn text_or_placeholder(value: &str) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER_LINE.to_string()
    } else {
        value.to_string()
    }
}
